//! Unified error type for the comments widget.
//!
//! Collaborator failures (identity, store, attestation) are transient from
//! the widget's point of view; tree errors are structural. Both end up at
//! the widget's fault boundary, nothing here is retried.

use crate::tree::TreeError;

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, ParleyError>;

/// Unified error type for the comments widget.
#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    // ============================================================
    // Structural errors
    // ============================================================
    /// The comment collection could not be arranged into a tree.
    #[error("Comment tree error: {0}")]
    Tree(#[from] TreeError),

    // ============================================================
    // Collaborator errors
    // ============================================================
    /// The identity provider failed to sign in or out.
    #[error("Identity error: {0}")]
    Identity(String),

    /// The document store rejected or failed a write.
    #[error("Store error: {0}")]
    Store(String),

    /// No attestation token could be obtained, or the store required one.
    #[error("Attestation error: {0}")]
    Attestation(String),

    /// A write was attempted without a signed-in user.
    #[error("Not signed in")]
    NotSignedIn,

    // ============================================================
    // Setup errors
    // ============================================================
    /// Widget configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ParleyError {
    /// Whether this error came from a collaborator rather than from the data.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ParleyError::Identity(_) | ParleyError::Store(_) | ParleyError::Attestation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParleyError::Store("quota exceeded".to_string());
        assert!(err.to_string().contains("quota exceeded"));

        let err = ParleyError::from(TreeError::DuplicateId { id: "abc".to_string() });
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ParleyError::Identity("popup closed".into()).is_transient());
        assert!(ParleyError::Attestation("no token".into()).is_transient());
        assert!(!ParleyError::NotSignedIn.is_transient());
        assert!(!ParleyError::from(TreeError::Cycle { ids: vec!["a".into()] }).is_transient());
    }
}
