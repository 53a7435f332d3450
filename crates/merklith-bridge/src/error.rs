use thiserror::Error;

/// Errors that can occur in bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid authority: expected {expected}, got {actual}")]
    InvalidAuthority { expected: String, actual: String },

    #[error("Invalid ISM metadata: {0}")]
    InvalidMetadata(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unable to verify: {0}")]
    UnableToVerify(String),

    #[error("Transient error: {0}")]
    Transient(String),

    #[error("Storage error: {0}")]
    Storage(#[from] merklith_storage::StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_authority_display() {
        let err = BridgeError::InvalidAuthority {
            expected: "merk1abc".to_string(),
            actual: "merk1xyz".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("merk1abc"));
        assert!(msg.contains("merk1xyz"));
    }

    #[test]
    fn test_not_found_display() {
        let err = BridgeError::NotFound("no finalized epoch".to_string());
        assert!(err.to_string().contains("no finalized epoch"));
    }
}
