//! Failure taxonomy for the submission flow.
//!
//! Every variant is recoverable: the caller reports the message and the form
//! stays usable. Section-extraction misses are deliberately absent here, they
//! degrade to a placeholder instead of failing.

use crate::form::FormField;

/// Generic message used when the backend rejects a request without a
/// `detail` field.
pub const GENERIC_BACKEND_ERROR: &str = "Backend error";

/// Errors surfaced by [`submit`](crate::submit::submit) and the backend client.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A required form field is empty. No network call was made.
    #[error("Please fill in: {label}")]
    Validation {
        field: FormField,
        label: &'static str,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    /// The backend answered 2xx but broke the `{"result": ...}` contract.
    #[error("Invalid response format: {0}")]
    Format(String),

    /// The request could not complete at all.
    #[error("request failed: {0}")]
    Network(String),
}

impl SimulationError {
    pub fn validation(field: FormField) -> Self {
        Self::Validation {
            field,
            label: field.label(),
        }
    }

    /// Short kind tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Backend { .. } => "backend",
            Self::Format(_) => "format",
            Self::Network(_) => "network",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_label() {
        let err = SimulationError::validation(FormField::FastingGlucose);
        assert_eq!(err.to_string(), "Please fill in: Fasting Glucose (mg/dL)");
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn backend_message_is_the_detail() {
        let err = SimulationError::Backend {
            status: 400,
            detail: "No prompt provided".into(),
        };
        assert_eq!(err.to_string(), "No prompt provided");
    }

    #[test]
    fn format_and_network_messages() {
        let fmt = SimulationError::Format("missing result field".into());
        assert_eq!(
            fmt.to_string(),
            "Invalid response format: missing result field"
        );
        let net = SimulationError::Network("connection refused".into());
        assert_eq!(net.to_string(), "request failed: connection refused");
    }
}
