//! Explorer HTTP access.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use chaintx_core::{ServiceError, TronscanConfig};

pub const TRANSACTION_PATH: &str = "/api/transaction-info";
pub const ACCOUNT_PATH: &str = "/api/account";
pub const TOKEN_PATH: &str = "/api/token_trc20";

/// A read-only explorer endpoint.
///
/// Implementations must be `Send + Sync`; one instance serves concurrent
/// lookups.
#[async_trait]
pub trait ExplorerTransport: Send + Sync + 'static {
    /// `GET {endpoint}{path}?{query}` and return the JSON body.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ServiceError>;

    /// Base URL, for logging.
    fn endpoint(&self) -> &str;
}

/// `reqwest`-backed explorer client. One attempt per request.
pub struct HttpExplorer {
    endpoint: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpExplorer {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http,
            request_timeout,
        })
    }

    pub fn from_config(config: &TronscanConfig) -> Result<Self, ServiceError> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    fn map_reqwest(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Transport(format!("timed out after {}ms", self.request_timeout.as_millis()))
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ExplorerTransport for HttpExplorer {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ServiceError> {
        let url = format!("{}{path}", self.endpoint);
        tracing::trace!(%url, ?query, "tronscan request");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "tronscan returned non-success status");
            return Err(ServiceError::Transport(format!("HTTP {status} from {url}")));
        }

        let body = resp.text().await.map_err(|e| self.map_reqwest(e))?;
        serde_json::from_str(&body).map_err(|e| ServiceError::decode(format!("tronscan body: {e}")))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
