//! chaintx CLI: look up transactions, balances and token precision.
//!
//! Usage:
//! ```bash
//! # Resolve a transaction
//! chaintx tx --url https://mainnet.infura.io/v3/KEY --hash 0x5c50...
//!
//! # USDT balance of an address on Tron
//! chaintx balance --platform tron --address TJRab... --contract USDT
//!
//! # Precision of any ERC-20 contract
//! chaintx decimals --config chaintx.json --contract 0x1f98...
//!
//! # List the contract registry
//! chaintx contracts
//! ```

mod logging;

use std::env;
use std::process;

use chaintx_core::{
    Config, Contract, CurrencyService, EvmConfig, Platform, ServiceError, TronscanConfig,
};
use chaintx_evm::EvmService;
use chaintx_tron::TronscanService;

use crate::logging::{init_tracing, LogConfig};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    init_tracing(&log_config(&args));

    let result = match args[1].as_str() {
        "tx" => cmd_tx(&args[2..]).await,
        "balance" => cmd_balance(&args[2..]).await,
        "decimals" => cmd_decimals(&args[2..]).await,
        "contracts" => cmd_contracts(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("chaintx {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("chaintx {}", env!("CARGO_PKG_VERSION"));
    println!("Cross-chain transaction and balance lookups\n");
    println!("USAGE:");
    println!("    chaintx <COMMAND> [FLAGS]\n");
    println!("COMMANDS:");
    println!("    tx         Resolve a transaction by hash");
    println!("    balance    Raw and scaled balance of an address");
    println!("    decimals   Precision of a contract");
    println!("    contracts  List known contracts");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("FLAGS:");
    println!("    --platform <ethereum|tron>       Target platform  [default: ethereum]");
    println!("    --url <URL>                      JSON-RPC URL (ethereum) or explorer endpoint (tron)");
    println!("    --config <FILE>                  JSON config with `ethereum` / `tron` sections");
    println!("    --hash <HASH>                    Transaction hash (tx)");
    println!("    --address <ADDR>                 Account address (balance)");
    println!("    --contract <SYMBOL|ADDRESS>      Token (balance, decimals)  [default: native coin]");
    println!("    --log-level <FILTER>             Log filter, e.g. debug or warn,chaintx_evm=debug  [default: info]");
    println!("    --json-logs                      Emit logs as JSON on stderr");
}

fn log_config(args: &[String]) -> LogConfig {
    let defaults = LogConfig::default();
    LogConfig {
        level: parse_flag(args, "--log-level").unwrap_or(defaults.level),
        json: has_flag(args, "--json-logs"),
    }
}

/// A service for the selected platform.
enum Service {
    Evm(EvmService),
    Tron(TronscanService),
}

impl Service {
    fn as_dyn(&self) -> &dyn CurrencyService {
        match self {
            Service::Evm(s) => s,
            Service::Tron(s) => s,
        }
    }

    async fn decimals_of_address(&self, address: &str) -> Result<u32, ServiceError> {
        match self {
            Service::Evm(s) => s.decimals_of_address(address).await,
            Service::Tron(s) => s.decimals_of_address(address).await,
        }
    }

    fn policy(&self) -> &chaintx_core::ScalePolicy {
        match self {
            Service::Evm(s) => s.policy(),
            Service::Tron(s) => s.policy(),
        }
    }
}

fn platform(args: &[String]) -> Result<Platform, String> {
    match parse_flag(args, "--platform") {
        Some(p) => p.parse(),
        None => Ok(Platform::Ethereum),
    }
}

fn build_service(args: &[String]) -> Result<Service, String> {
    let platform = platform(args)?;
    let config = match parse_flag(args, "--config") {
        Some(path) => Config::from_file(&path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    let url = parse_flag(args, "--url");

    let service = match platform {
        Platform::Ethereum => {
            let evm = match (url, config.ethereum) {
                (Some(url), Some(section)) => EvmConfig { rpc_url: url, ..section },
                (Some(url), None) => EvmConfig::new(url),
                (None, Some(section)) => section,
                (None, None) => return Err("ethereum needs --url or a config with an `ethereum` section".into()),
            };
            Service::Evm(EvmService::from_config(&evm).map_err(|e| e.to_string())?)
        }
        Platform::Tron => {
            let mut tron = config.tron.unwrap_or_default();
            if let Some(url) = url {
                tron = TronscanConfig { endpoint: url, ..tron };
            }
            Service::Tron(TronscanService::from_config(&tron).map_err(|e| e.to_string())?)
        }
    };
    tracing::debug!(%platform, "service ready");
    Ok(service)
}

/// A registered symbol or address; `Err` carries an unregistered address.
fn resolve_contract(platform: Platform, arg: &str) -> Result<Contract, String> {
    Contract::from_symbol(platform, arg)
        .or_else(|| Contract::lookup(platform, arg))
        .ok_or_else(|| arg.to_string())
}

async fn cmd_tx(args: &[String]) -> Result<(), String> {
    let hash = parse_flag(args, "--hash").ok_or("--hash is required")?;
    let service = build_service(args)?;

    match service.as_dyn().transaction_by_hash(&hash).await.map_err(|e| e.to_string())? {
        Some(tx) => println!("{}", serde_json::to_string_pretty(&tx).map_err(|e| e.to_string())?),
        None => println!("not found"),
    }
    Ok(())
}

async fn cmd_balance(args: &[String]) -> Result<(), String> {
    let address = parse_flag(args, "--address").ok_or("--address is required")?;
    let service = build_service(args)?;
    let platform = service.as_dyn().platform();

    let contract = match parse_flag(args, "--contract") {
        Some(c) => resolve_contract(platform, &c).map_err(|c| format!("unknown {platform} contract: {c}"))?,
        None => Contract::native(platform),
    };

    let svc = service.as_dyn();
    let raw = svc.balance_of(&address, contract).await.map_err(|e| e.to_string())?;
    let scaled = svc
        .to_display_value(raw, Some(contract), service.policy())
        .await
        .map_err(|e| e.to_string())?;

    println!("  Address:  {address}");
    println!("  Contract: {contract} ({})", contract.address());
    println!("  Raw:      {raw}");
    println!("  Balance:  {scaled}");
    Ok(())
}

async fn cmd_decimals(args: &[String]) -> Result<(), String> {
    let arg = parse_flag(args, "--contract").ok_or("--contract is required")?;
    let service = build_service(args)?;
    let platform = service.as_dyn().platform();

    let decimals = match resolve_contract(platform, &arg) {
        Ok(contract) => service.as_dyn().decimals_of(Some(contract)).await,
        Err(address) => service.decimals_of_address(&address).await,
    }
    .map_err(|e| e.to_string())?;

    println!("{decimals}");
    Ok(())
}

fn cmd_contracts(args: &[String]) -> Result<(), String> {
    let platforms = match parse_flag(args, "--platform") {
        Some(p) => vec![p.parse::<Platform>()?],
        None => vec![Platform::Ethereum, Platform::Tron],
    };

    for platform in platforms {
        println!("{platform}:");
        for contract in Contract::all(platform) {
            let decimals = contract
                .native_decimals()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into());
            println!("  {:<6} {:<44} {decimals}", contract.symbol(), contract.address());
        }
        println!();
    }
    Ok(())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_are_found_anywhere() {
        let a = args(&["--platform", "tron", "--hash", "abc"]);
        assert_eq!(parse_flag(&a, "--hash").as_deref(), Some("abc"));
        assert_eq!(platform(&a).unwrap(), Platform::Tron);
        assert!(parse_flag(&a, "--url").is_none());
        assert!(!has_flag(&a, "--json-logs"));
    }

    #[test]
    fn log_flags() {
        assert_eq!(log_config(&args(&["tx"])), LogConfig::default());
        let config = log_config(&args(&["tx", "--log-level", "warn,chaintx_evm=debug", "--json-logs"]));
        assert_eq!(config.level, "warn,chaintx_evm=debug");
        assert!(config.json);
    }

    #[test]
    fn contracts_resolve_by_symbol_or_address() {
        assert_eq!(resolve_contract(Platform::Ethereum, "usdt"), Ok(Contract::Usdt));
        assert_eq!(
            resolve_contract(Platform::Ethereum, "0xDAC17F958D2EE523A2206206994597C13D831EC7"),
            Ok(Contract::Usdt)
        );
        assert_eq!(
            resolve_contract(Platform::Ethereum, "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984"),
            Err("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984".to_string())
        );
    }

    #[test]
    fn ethereum_requires_an_endpoint() {
        assert!(build_service(&args(&["--platform", "ethereum"])).is_err());
        assert!(build_service(&args(&["--platform", "tron"])).is_ok());
        assert!(build_service(&args(&["--url", "http://localhost:8545"])).is_ok());
    }
}
