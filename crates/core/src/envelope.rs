//! Uniform failure envelope returned by both tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// `{ "success": false, "error": { "code": ..., "message": ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    /// Stable error code such as `INVALID_URL`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { success: false, error: ErrorBody { code: code.into(), message: message.into() } }
    }
}

impl From<&Error> for ErrorEnvelope {
    fn from(err: &Error) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<Error> for ErrorEnvelope {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_from_error() {
        let envelope = ErrorEnvelope::from(Error::InvalidUrl("host not allowed".into()));
        assert!(!envelope.success);
        assert_eq!(envelope.error.code, "INVALID_URL");
        assert_eq!(envelope.error.message, "host not allowed");
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = ErrorEnvelope::new("MISSING_INPUT", "content is required");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "MISSING_INPUT");
        assert_eq!(json["error"]["message"], "content is required");
    }
}
