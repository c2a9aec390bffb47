//! Error types for Omni operations

use thiserror::Error;

/// Main error type for Omni operations
#[derive(Error, Debug)]
pub enum OmniError {
    /// Persistence collaborator failure
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Model API failure (network, malformed response, ...)
    #[error("Model error: {0}")]
    Model(String),

    /// Persona key not present in the registry
    #[error("Unknown persona '{0}'")]
    UnknownPersona(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for OmniError {
    fn from(err: serde_json::Error) -> Self {
        OmniError::Serialization(err.to_string())
    }
}

/// Result type alias for Omni operations
pub type OmniResult<T> = Result<T, OmniError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OmniError::UnknownPersona("pirate".to_string());
        assert_eq!(err.to_string(), "Unknown persona 'pirate'");

        let err = OmniError::Model("connection reset".to_string());
        assert_eq!(err.to_string(), "Model error: connection reset");
    }

    #[test]
    fn test_source_conversions() {
        let err: OmniError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, OmniError::Storage(_)));
        let err: OmniError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: OmniError = parse.into();
        assert!(matches!(err, OmniError::Serialization(_)));
    }
}
