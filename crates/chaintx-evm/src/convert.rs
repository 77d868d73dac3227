//! Transport errors → service errors.

use chaintx_core::ServiceError;
use chaintx_rpc::TransportError;

pub(crate) fn service_error(e: TransportError) -> ServiceError {
    match e {
        TransportError::Rpc(err) => ServiceError::Remote {
            code: err.code,
            message: err.message,
        },
        TransportError::Deserialization(err) => ServiceError::Decode {
            reason: format!("unexpected RPC result shape: {err}"),
        },
        other => ServiceError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaintx_rpc::JsonRpcError;

    #[test]
    fn maps_each_kind() {
        let remote = service_error(TransportError::Rpc(JsonRpcError {
            code: -32000,
            message: "header not found".into(),
            data: None,
        }));
        assert!(remote.is_remote());

        let transport = service_error(TransportError::Timeout { ms: 10 });
        assert!(transport.is_transport());

        let bad = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        assert!(matches!(
            service_error(TransportError::Deserialization(bad)),
            ServiceError::Decode { .. }
        ));
    }
}
