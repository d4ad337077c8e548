// src/infra/errors.rs - Error types for unibot

use std::time::Duration;

use thiserror::Error;

/// Failure of the remote generation backend.
///
/// Only `Misconfigured` is fatal, and only at construction time. Every
/// other variant is absorbed per request by the orchestrator's fallback.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway '{gateway}' is misconfigured: {message}")]
    Misconfigured { gateway: String, message: String },

    #[error("Gateway '{gateway}' rejected the request (HTTP {status}): {message}")]
    Rejected {
        gateway: String,
        status: u16,
        message: String,
    },

    #[error("Gateway '{gateway}' unavailable: {message}")]
    Unavailable { gateway: String, message: String },

    #[error("Gateway timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Gateway '{gateway}' returned an unusable response: {message}")]
    InvalidResponse { gateway: String, message: String },
}

impl GatewayError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, GatewayError::Misconfigured { .. })
    }
}

#[derive(Error, Debug)]
pub enum UnibotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<toml::de::Error> for UnibotError {
    fn from(err: toml::de::Error) -> Self {
        UnibotError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Rejected {
            gateway: "gemini".into(),
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(
            err.to_string(),
            "Gateway 'gemini' rejected the request (HTTP 403): forbidden"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = GatewayError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Gateway timed out after 10000ms");
    }

    #[test]
    fn test_only_misconfiguration_is_fatal() {
        assert!(GatewayError::Misconfigured {
            gateway: "gemini".into(),
            message: "no key".into()
        }
        .is_fatal());
        assert!(!GatewayError::Timeout(Duration::from_secs(1)).is_fatal());
        assert!(!GatewayError::Unavailable {
            gateway: "gemini".into(),
            message: "down".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: Result<toml::Value, _> = toml::from_str("bad = [[[");
        let err: UnibotError = err.unwrap_err().into();
        assert!(matches!(err, UnibotError::Config(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: UnibotError = io.into();
        assert!(err.to_string().contains("missing"));
    }
}
