use serde::Serialize;

use super::transport::TransportResponse;
use crate::error::HandleError;

/// Outcome of one handle operation, the only thing callers get back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    /// HTTP status, or a local code below 100 when nothing reached the API
    pub code: u16,
    pub message: String,
    /// All validation messages when the configuration was rejected
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl OperationResult {
    /// `success` is true only for the statuses the operation accepts
    pub fn from_response(response: TransportResponse, accepted: &[u16]) -> Self {
        Self {
            success: accepted.contains(&response.status),
            code: response.status,
            message: response.reason,
            failures: Vec::new(),
        }
    }

    /// The request never reached the API
    pub fn is_local_failure(&self) -> bool {
        !self.success && self.code < 100
    }
}

impl From<HandleError> for OperationResult {
    fn from(error: HandleError) -> Self {
        let failures = match &error {
            HandleError::Configuration(invalid) => invalid.messages(),
            _ => Vec::new(),
        };

        Self {
            success: false,
            code: error.code(),
            message: error.message(),
            failures,
        }
    }
}
