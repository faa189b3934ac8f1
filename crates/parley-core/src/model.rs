//! Comment and user records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned comment identifier.
pub type CommentId = String;

/// Id of the synthetic node every thread hangs from.
pub const ROOT_ID: &str = "root";

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Provider-issued user id.
    pub id: String,
    /// Name shown next to the user's comments.
    pub display_name: String,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A stored comment.
///
/// Records are immutable once written. `created_at` stays `None` until the
/// store has resolved its server timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    /// Parent comment, absent for top-level comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub text: String,
}

impl CommentRecord {
    /// Create a record whose timestamp has not resolved yet.
    pub fn new(
        id: impl Into<CommentId>,
        parent_id: Option<&str>,
        author_id: impl Into<String>,
        author_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            author_id: author_id.into(),
            author_name: author_name.into(),
            created_at: None,
            text: text.into(),
        }
    }

    /// Set the creation time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The parent id, treating an empty string the same as no parent.
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether the store has not yet stamped this record.
    pub fn is_pending(&self) -> bool {
        self.created_at.is_none()
    }
}

/// A comment as produced by the composer, before the store assigns its id
/// and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    pub author_id: String,
    pub author_name: String,
    pub text: String,
}

impl NewComment {
    /// Turn into a stored record with the store-assigned id and timestamp.
    pub fn into_record(self, id: CommentId, created_at: Option<DateTime<Utc>>) -> CommentRecord {
        CommentRecord {
            id,
            parent_id: self.parent_id,
            author_id: self.author_id,
            author_name: self.author_name,
            created_at,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parent_is_no_parent() {
        let mut record = CommentRecord::new("a", Some(""), "u1", "Ada", "hi");
        assert_eq!(record.parent(), None);

        record.parent_id = Some("b".into());
        assert_eq!(record.parent(), Some("b"));
    }

    #[test]
    fn test_top_level_serializes_without_parent() {
        let comment = NewComment {
            parent_id: None,
            author_id: "u1".into(),
            author_name: "Ada".into(),
            text: "hello".into(),
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert!(json.get("parentId").is_none());
        assert_eq!(json["authorName"], "Ada");
    }

    #[test]
    fn test_record_without_parent_field_deserializes() {
        let record: CommentRecord = serde_json::from_str(
            r#"{"id":"x","authorId":"u1","authorName":"Ada","createdAt":null,"text":"hi"}"#,
        )
        .unwrap();
        assert_eq!(record.parent_id, None);
        assert!(record.is_pending());
    }
}
