//! Document-store collaborator contract.
//!
//! Comments live in a `comments` sub-collection nested under one page/post
//! document: `{collection}/{document_id}/comments`. The store pushes the
//! whole collection, in arrival order, every time it changes; appends are
//! answered with the store-assigned id while the creation time resolves
//! later.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::attestation::AttestationToken;
use crate::error::{ParleyError, Result};
use crate::model::{CommentId, CommentRecord, NewComment};
use crate::stream::BoxStream;

/// Full contents of a comments collection, in arrival order.
pub type Snapshot = Vec<CommentRecord>;

/// Live snapshots of one collection. The first item is the current state.
pub type SnapshotStream = BoxStream<Snapshot>;

/// Address of the comments sub-collection of one page/post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPath {
    /// Top-level collection holding page/post documents.
    pub collection: String,
    /// The page/post document.
    pub document_id: String,
}

impl CollectionPath {
    /// Name of the nested sub-collection holding comments.
    pub const COMMENTS: &'static str = "comments";

    pub fn new(collection: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }

    /// Path of the page/post document the comments hang under.
    pub fn document_path(&self) -> String {
        format!("{}/{}", self.collection, self.document_id)
    }

    /// Reject empty segments and segments containing `/`.
    pub fn validate(&self) -> Result<()> {
        for (name, segment) in [
            ("collection", &self.collection),
            ("document id", &self.document_id),
        ] {
            if segment.trim().is_empty() {
                return Err(ParleyError::Config(format!("{name} must not be empty")));
            }
            if segment.contains('/') {
                return Err(ParleyError::Config(format!(
                    "{name} must be a single path segment: {segment:?}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.document_path(), Self::COMMENTS)
    }
}

/// A write as handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendRequest {
    pub comment: NewComment,
    /// Bot-attestation token, when attestation is configured.
    pub attestation: Option<AttestationToken>,
}

impl AppendRequest {
    pub fn new(comment: NewComment) -> Self {
        Self {
            comment,
            attestation: None,
        }
    }
}

/// Document-store collaborator.
#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    /// Live snapshots of the collection at `path`.
    fn subscribe(&self, path: &CollectionPath) -> SnapshotStream;

    /// Append a comment. The store assigns the id and, asynchronously, the
    /// creation time.
    async fn append(&self, path: &CollectionPath, request: AppendRequest) -> Result<CommentId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = CollectionPath::new("posts", "hello-world");
        assert_eq!(path.document_path(), "posts/hello-world");
        assert_eq!(path.to_string(), "posts/hello-world/comments");
    }

    #[test]
    fn test_path_validation() {
        assert!(CollectionPath::new("posts", "p1").validate().is_ok());
        assert!(CollectionPath::new("", "p1").validate().is_err());
        assert!(CollectionPath::new("posts", "  ").validate().is_err());
        assert!(CollectionPath::new("posts", "a/b").validate().is_err());
    }
}
