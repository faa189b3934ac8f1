//! Optional bot attestation.
//!
//! When a site key is configured, every write carries a token issued by an
//! [`Attestor`]. [`AttestedStore`] wraps any store and attaches the token,
//! so the rest of the widget never sees it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::model::CommentId;
use crate::store::{AppendRequest, CollectionPath, CommentStore, SnapshotStream};

/// Opaque attestation token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AttestationToken(String);

impl AttestationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AttestationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttestationToken(<{} bytes>)", self.0.len())
    }
}

/// Bot-attestation collaborator.
#[async_trait]
pub trait Attestor: Send + Sync + 'static {
    /// Site key this attestor was configured with.
    fn site_key(&self) -> &str;

    /// Issue a token for the next write.
    async fn token(&self) -> Result<AttestationToken>;
}

/// Store decorator that attaches an attestation token to every write.
pub struct AttestedStore {
    inner: Arc<dyn CommentStore>,
    attestor: Arc<dyn Attestor>,
}

impl AttestedStore {
    pub fn new(inner: Arc<dyn CommentStore>, attestor: Arc<dyn Attestor>) -> Self {
        Self { inner, attestor }
    }
}

#[async_trait]
impl CommentStore for AttestedStore {
    fn subscribe(&self, path: &CollectionPath) -> SnapshotStream {
        self.inner.subscribe(path)
    }

    async fn append(&self, path: &CollectionPath, mut request: AppendRequest) -> Result<CommentId> {
        let token = self.attestor.token().await?;
        debug!(site_key = %self.attestor.site_key(), path = %path, "Attaching attestation token");
        request.attestation = Some(token);
        self.inner.append(path, request).await
    }
}

/// Wrap `store` in an [`AttestedStore`] when an attestor is configured.
pub fn with_optional_attestation(
    store: Arc<dyn CommentStore>,
    attestor: Option<Arc<dyn Attestor>>,
) -> Arc<dyn CommentStore> {
    match attestor {
        Some(attestor) => Arc::new(AttestedStore::new(store, attestor)),
        None => store,
    }
}
