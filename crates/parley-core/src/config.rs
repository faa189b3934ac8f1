//! Widget configuration.
//!
//! Everything the host passes at mount time, with builder-style setters,
//! JSON loading and an environment-variable reader for the demo binary.

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};
use crate::store::CollectionPath;

/// Default id of the element the widget renders into.
pub const DEFAULT_TARGET: &str = "parley";

/// Document-store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Project/database the store connects to.
    pub project_id: String,
    /// Snapshots buffered per subscriber before slow readers skip ahead.
    pub snapshot_channel_capacity: usize,
    /// Leave server timestamps unresolved until the store is told to stamp
    /// them (used to exercise the pending-write rendering).
    pub deferred_timestamps: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: "parley-local".to_string(),
            snapshot_channel_capacity: 64,
            deferred_timestamps: false,
        }
    }
}

/// What the host hands to `mount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Collection holding page/post documents.
    pub collection: String,
    /// The page/post whose comments are shown.
    pub document_id: String,
    /// Id of the element to render into.
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub store: StoreConfig,
    /// Site key for bot attestation; attestation is off when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation_site_key: Option<String>,
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl WidgetConfig {
    pub fn new(collection: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
            target: default_target(),
            store: StoreConfig::default(),
            attestation_site_key: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn with_attestation(mut self, site_key: impl Into<String>) -> Self {
        self.attestation_site_key = Some(site_key.into());
        self
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `PARLEY_COLLECTION`, `PARLEY_DOCUMENT_ID`, and optionally
    /// `PARLEY_TARGET` and `PARLEY_ATTESTATION_SITE_KEY`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let collection = var("PARLEY_COLLECTION")
            .ok_or_else(|| ParleyError::Config("PARLEY_COLLECTION is not set".into()))?;
        let document_id = var("PARLEY_DOCUMENT_ID")
            .ok_or_else(|| ParleyError::Config("PARLEY_DOCUMENT_ID is not set".into()))?;

        let mut config = Self::new(collection, document_id);
        if let Some(target) = var("PARLEY_TARGET") {
            config.target = target;
        }
        config.attestation_site_key = var("PARLEY_ATTESTATION_SITE_KEY");
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.comments_path().validate()?;
        if self.target.trim().is_empty() {
            return Err(ParleyError::Config("target element must not be empty".into()));
        }
        if self.store.snapshot_channel_capacity == 0 {
            return Err(ParleyError::Config(
                "snapshot channel capacity must be at least 1".into(),
            ));
        }
        if matches!(&self.attestation_site_key, Some(k) if k.trim().is_empty()) {
            return Err(ParleyError::Config("attestation site key is empty".into()));
        }
        Ok(())
    }

    /// Where this widget's comments live.
    pub fn comments_path(&self) -> CollectionPath {
        CollectionPath::new(&self.collection, &self.document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = WidgetConfig::new("posts", "hello");
        assert_eq!(config.target, DEFAULT_TARGET);
        assert_eq!(config.attestation_site_key, None);
        assert!(config.validate().is_ok());
        assert_eq!(config.comments_path().to_string(), "posts/hello/comments");
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = WidgetConfig::from_json(
            r#"{"collection":"posts","documentId":"p1","attestationSiteKey":"6Lc-key"}"#,
        )
        .unwrap();
        assert_eq!(config.target, "parley");
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.attestation_site_key.as_deref(), Some("6Lc-key"));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(WidgetConfig::new("", "p1").validate().is_err());
        assert!(WidgetConfig::new("posts", "a/b").validate().is_err());
        assert!(WidgetConfig::new("posts", "p1").with_target(" ").validate().is_err());
        assert!(WidgetConfig::new("posts", "p1").with_attestation("").validate().is_err());

        let mut config = WidgetConfig::new("posts", "p1");
        config.store.snapshot_channel_capacity = 0;
        assert!(config.validate().is_err());

        assert!(matches!(
            WidgetConfig::from_json("{not json"),
            Err(ParleyError::Serialization(_))
        ));
    }
}
