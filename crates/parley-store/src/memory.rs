//! In-memory document store.
//!
//! Each comments collection is a `Vec` of records in arrival order plus a
//! broadcast channel of full snapshots. A write is published twice, the
//! way a hosted store with latency compensation behaves: first with
//! `created_at: None`, then again once the server timestamp is stamped.
//! With `deferred_timestamps` the second step waits for
//! [`MemoryStore::resolve_pending`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use parley_core::stream::broadcast_to_stream;
use parley_core::{
    AppendRequest, CollectionPath, CommentId, CommentRecord, CommentStore, ParleyError, Result,
    Snapshot, SnapshotStream, StoreConfig,
};

/// Length of generated document ids.
const ID_LEN: usize = 20;

/// Source of server timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// One comments collection.
struct Collection {
    records: RwLock<Vec<CommentRecord>>,
    tx: broadcast::Sender<Snapshot>,
}

impl Collection {
    fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            records: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Mutate under the write lock and publish the result before releasing
    /// it, so subscribers see snapshots in write order.
    fn update<R>(&self, f: impl FnOnce(&mut Vec<CommentRecord>) -> R) -> R {
        let mut records = self.records.write();
        let out = f(&mut records);
        let _ = self.tx.send(records.clone());
        out
    }
}

/// In-memory [`CommentStore`].
pub struct MemoryStore {
    collections: DashMap<CollectionPath, Arc<Collection>>,
    config: StoreConfig,
    require_attestation: bool,
    clock: Clock,
    fail_next_write: Mutex<Option<String>>,
    writes: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("collections", &self.collections.len())
            .field("config", &self.config)
            .field("require_attestation", &self.require_attestation)
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            collections: DashMap::new(),
            config,
            require_attestation: false,
            clock: Arc::new(Utc::now),
            fail_next_write: Mutex::new(None),
            writes: AtomicU64::new(0),
        }
    }

    /// Reject writes that carry no attestation token.
    pub fn require_attestation(mut self, required: bool) -> Self {
        self.require_attestation = required;
        self
    }

    /// Use a fixed or scripted clock for server timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Make the next append fail with `message`.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        *self.fail_next_write.lock() = Some(message.into());
    }

    /// Successful appends so far, across all collections.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents of a collection.
    pub fn records(&self, path: &CollectionPath) -> Snapshot {
        self.collections
            .get(path)
            .map(|c| c.records.read().clone())
            .unwrap_or_default()
    }

    /// Insert records as-is, ids and timestamps included.
    pub fn seed(&self, path: &CollectionPath, records: impl IntoIterator<Item = CommentRecord>) {
        let records: Vec<_> = records.into_iter().collect();
        debug!(path = %path, count = records.len(), "Seeding collection");
        self.collection(path).update(|existing| existing.extend(records));
    }

    /// Stamp every pending record in `path` with the current server time.
    /// Returns how many were stamped.
    pub fn resolve_pending(&self, path: &CollectionPath) -> usize {
        let Some(collection) = self.collections.get(path).map(|c| Arc::clone(c.value())) else {
            return 0;
        };
        let now = (self.clock)();
        stamp_pending(&collection, now)
    }

    fn collection(&self, path: &CollectionPath) -> Arc<Collection> {
        let entry = self
            .collections
            .entry(path.clone())
            .or_insert_with(|| Arc::new(Collection::new(self.config.snapshot_channel_capacity)));
        Arc::clone(entry.value())
    }
}

fn stamp_pending(collection: &Collection, now: DateTime<Utc>) -> usize {
    if !collection.records.read().iter().any(|r| r.is_pending()) {
        return 0;
    }
    collection.update(|records| {
        let mut stamped = 0;
        for record in records.iter_mut().filter(|r| r.is_pending()) {
            record.created_at = Some(now);
            stamped += 1;
        }
        stamped
    })
}

fn new_document_id() -> CommentId {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

#[async_trait]
impl CommentStore for MemoryStore {
    fn subscribe(&self, path: &CollectionPath) -> SnapshotStream {
        let collection = self.collection(path);
        // Snapshot and subscribe under the read lock: no write can slip in
        // between, so nothing is missed or delivered twice.
        let (current, rx) = {
            let records = collection.records.read();
            (records.clone(), collection.tx.subscribe())
        };
        trace!(path = %path, records = current.len(), "New subscriber");
        Box::pin(futures::stream::once(async move { current }).chain(broadcast_to_stream(rx)))
    }

    async fn append(&self, path: &CollectionPath, request: AppendRequest) -> Result<CommentId> {
        path.validate()?;

        if let Some(message) = self.fail_next_write.lock().take() {
            return Err(ParleyError::Store(message));
        }
        if request.comment.author_id.trim().is_empty() {
            return Err(ParleyError::NotSignedIn);
        }
        if self.require_attestation && request.attestation.is_none() {
            return Err(ParleyError::Attestation(
                "write rejected: attestation token required".into(),
            ));
        }

        let id = new_document_id();
        let collection = self.collection(path);
        let record = request.comment.into_record(id.clone(), None);
        collection.update(|records| records.push(record));
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(path = %path, comment_id = %id, "Appended comment");

        if !self.config.deferred_timestamps {
            stamp_pending(&collection, (self.clock)());
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{AttestationToken, NewComment};

    fn path() -> CollectionPath {
        CollectionPath::new("posts", "p1")
    }

    fn comment(text: &str, parent: Option<&str>) -> NewComment {
        NewComment {
            parent_id: parent.map(str::to_string),
            author_id: "u1".into(),
            author_name: "Ada".into(),
            text: text.into(),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_subscribe_replays_current_then_changes() {
        let store = MemoryStore::default().with_clock(fixed_time);
        store.seed(&path(), [CommentRecord::new("seed", None, "u0", "Bo", "hi")]);

        let mut snapshots = store.subscribe(&path());
        let first = snapshots.next().await.unwrap();
        assert_eq!(first.len(), 1);

        let id = store.append(&path(), AppendRequest::new(comment("hello", None))).await.unwrap();
        assert_eq!(id.len(), ID_LEN);

        let pending = snapshots.next().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[1].id, id);
        assert!(pending[1].is_pending());

        let stamped = snapshots.next().await.unwrap();
        assert_eq!(stamped[1].created_at, Some(fixed_time()));
    }

    #[tokio::test]
    async fn test_deferred_timestamps() {
        let config = StoreConfig {
            deferred_timestamps: true,
            ..StoreConfig::default()
        };
        let store = MemoryStore::new(config).with_clock(fixed_time);
        store.append(&path(), AppendRequest::new(comment("a", None))).await.unwrap();
        assert!(store.records(&path())[0].is_pending());

        assert_eq!(store.resolve_pending(&path()), 1);
        assert_eq!(store.records(&path())[0].created_at, Some(fixed_time()));
        assert_eq!(store.resolve_pending(&path()), 0);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryStore::default();
        let other = CollectionPath::new("posts", "p2");
        store.append(&path(), AppendRequest::new(comment("a", None))).await.unwrap();

        assert_eq!(store.records(&path()).len(), 1);
        assert!(store.records(&other).is_empty());
    }

    #[tokio::test]
    async fn test_reply_keeps_parent() {
        let store = MemoryStore::default();
        store
            .append(&path(), AppendRequest::new(comment("r", Some("parent"))))
            .await
            .unwrap();
        assert_eq!(store.records(&path())[0].parent_id.as_deref(), Some("parent"));
    }

    #[tokio::test]
    async fn test_attestation_required() {
        let store = MemoryStore::default().require_attestation(true);

        let err = store
            .append(&path(), AppendRequest::new(comment("a", None)))
            .await
            .unwrap_err();
        assert!(matches!(err, ParleyError::Attestation(_)));

        let mut request = AppendRequest::new(comment("a", None));
        request.attestation = Some(AttestationToken::new("tok"));
        store.append(&path(), request).await.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = MemoryStore::default();
        store.fail_next_write("backend unavailable");

        let err = store
            .append(&path(), AppendRequest::new(comment("a", None)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("backend unavailable"));
        assert!(store.append(&path(), AppendRequest::new(comment("a", None))).await.is_ok());
    }

    #[tokio::test]
    async fn test_anonymous_write_rejected() {
        let store = MemoryStore::default();
        let mut anonymous = comment("a", None);
        anonymous.author_id.clear();
        assert!(matches!(
            store.append(&path(), AppendRequest::new(anonymous)).await,
            Err(ParleyError::NotSignedIn)
        ));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_path_rejected() {
        let store = MemoryStore::default();
        let bad = CollectionPath::new("posts", "a/b");
        assert!(matches!(
            store.append(&bad, AppendRequest::new(comment("a", None))).await,
            Err(ParleyError::Config(_))
        ));
    }
}
