//! Error types for the `agentdesk-models` crate.
//!
//! All fallible constructors in this crate return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A chat message was empty once surrounding whitespace was trimmed.
    #[error("message is empty")]
    EmptyMessage,

    /// Record data supplied by the user was not a JSON object.
    #[error("invalid record data \"{value}\": {reason}")]
    InvalidRecordData {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_empty_message() {
        assert_eq!(ModelError::EmptyMessage.to_string(), "message is empty");
    }

    #[test]
    fn error_display_record_data() {
        let err = ModelError::InvalidRecordData {
            value: "[]".into(),
            reason: "must be a JSON object".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid record data \"[]\": must be a JSON object"
        );
    }
}
