//! Fault reporting for the widget's top-level boundary.
//!
//! Collaborator calls run detached from the UI, so their errors cannot be
//! returned to a caller. They are reported to a shared [`FaultSink`]
//! instead; the widget watches it and replaces its whole output with the
//! first fault it sees.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;

use crate::error::ParleyError;

/// Where a fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Identity, store or attestation call failed.
    Collaborator,
    /// The comment collection could not be arranged into a tree.
    Structural,
    /// Anything else (configuration, serialization, missing user).
    Internal,
}

/// A fault shown by the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl From<&ParleyError> for Fault {
    fn from(err: &ParleyError) -> Self {
        let kind = match err {
            ParleyError::Tree(_) => FaultKind::Structural,
            e if e.is_transient() => FaultKind::Collaborator,
            _ => FaultKind::Internal,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Shared, cloneable fault channel. The first fault wins.
#[derive(Clone)]
pub struct FaultSink {
    tx: Arc<watch::Sender<Option<Fault>>>,
}

impl Default for FaultSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FaultSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultSink")
            .field("current", &*self.tx.borrow())
            .finish()
    }
}

impl FaultSink {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Record a fault. Ignored if one is already showing.
    pub fn report(&self, err: ParleyError) {
        let fault = Fault::from(&err);
        error!(kind = ?fault.kind, error = %err, "Widget fault");
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(fault);
            true
        });
    }

    /// The fault currently showing, if any.
    pub fn current(&self) -> Option<Fault> {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified when a fault is reported.
    pub fn subscribe(&self) -> watch::Receiver<Option<Fault>> {
        self.tx.subscribe()
    }
}
