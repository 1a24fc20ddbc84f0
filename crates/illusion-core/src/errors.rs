//! Error types for majority-illusion analysis.

use thiserror::Error;

/// Unified error type for the graph model, the evaluator and the synthesizer.
#[derive(Error, Debug)]
pub enum IllusionError {
    /// Malformed or mismatched graph/coloring input (a caller bug)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The synthesizer could not complete a construction phase
    #[error("Construction failed in phase '{phase}': {message}")]
    ConstructionFailed { phase: String, message: String },

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors (graph files, report output)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl IllusionError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        IllusionError::InvalidInput(message.into())
    }

    /// Creates a construction failure tagged with the phase that gave up.
    pub fn construction_failed(phase: impl Into<String>, message: impl Into<String>) -> Self {
        IllusionError::ConstructionFailed {
            phase: phase.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        IllusionError::ConfigError(message.into())
    }

    /// Returns the failing phase for construction errors.
    pub fn phase(&self) -> Option<&str> {
        match self {
            IllusionError::ConstructionFailed { phase, .. } => Some(phase),
            _ => None,
        }
    }

    /// Checks if the caller can recover by choosing different parameters.
    ///
    /// Only construction failures qualify; invalid input always signals a caller bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IllusionError::ConstructionFailed { .. })
    }

    /// Returns a user-friendly error message with actionable guidance.
    pub fn user_message(&self) -> String {
        match self {
            IllusionError::ConstructionFailed { phase, message } => {
                format!(
                    "Construction failed in phase '{}': {}\n\
                     → The regular illusion construction only covers low degrees relative to the node count.\n\
                     → Retry with a smaller degree or more nodes (e.g. n=14, k=4).",
                    phase, message
                )
            }
            IllusionError::InvalidInput(msg) => {
                format!(
                    "Invalid input: {}\n\
                     → Ensure the coloring assigns exactly one color to every node of the graph.",
                    msg
                )
            }
            IllusionError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n\
                     → Review your configuration file and check that numeric values are within valid ranges.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for illusion operations.
pub type Result<T> = std::result::Result<T, IllusionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let invalid = IllusionError::invalid_input("coloring misses node 3");
        assert!(matches!(invalid, IllusionError::InvalidInput(_)));

        let failed = IllusionError::construction_failed("verification", "node 4 has degree 3");
        assert!(matches!(failed, IllusionError::ConstructionFailed { .. }));
        assert_eq!(failed.phase(), Some("verification"));
        assert!(failed.to_string().contains("verification"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(IllusionError::construction_failed("intra-class", "too small").is_recoverable());
        assert!(!IllusionError::invalid_input("empty").is_recoverable());
        assert!(!IllusionError::config("quota").is_recoverable());
    }
}
