use thiserror::Error;

use crate::config::InvalidSettings;
use crate::handle::TransportError;

/// Local code for a request body that could not be encoded
pub const PAYLOAD_ERROR_CODE: u16 = 60;

/// Everything that can stop a handle operation
///
/// Codes below 100 are local (configuration 1-11, transport 50-59,
/// payload 60); API failures carry the HTTP status.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error(transparent)]
    Configuration(#[from] InvalidSettings),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Handle API returned {status}: {reason}")]
    Api { status: u16, reason: String },

    #[error("Failed to encode handle payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl HandleError {
    pub fn code(&self) -> u16 {
        match self {
            HandleError::Configuration(err) => err.first_code(),
            HandleError::Transport(err) => err.code(),
            HandleError::Api { status, .. } => *status,
            HandleError::Payload(_) => PAYLOAD_ERROR_CODE,
        }
    }

    /// Caller-facing message: the bare reason phrase for API failures
    pub fn message(&self) -> String {
        match self {
            HandleError::Api { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandleConfig;

    #[test]
    fn test_api_error_keeps_status_and_reason() {
        let err = HandleError::Api {
            status: 409,
            reason: "Conflict".to_string(),
        };

        assert_eq!(err.code(), 409);
        assert_eq!(err.message(), "Conflict");
        assert_eq!(err.to_string(), "Handle API returned 409: Conflict");
    }

    #[test]
    fn test_configuration_error_uses_first_code() {
        let invalid = HandleConfig::default().ensure_valid().unwrap_err();
        let err = HandleError::from(invalid);

        assert_eq!(err.code(), 1);
        assert!(err.message().starts_with("settings invalid"));
    }

    #[test]
    fn test_transport_error_code() {
        let err = HandleError::from(TransportError::Timeout);
        assert_eq!(err.code(), 54);
        assert_eq!(err.message(), "Request timed out");
    }
}
