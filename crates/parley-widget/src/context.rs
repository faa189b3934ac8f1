//! Collaborators handed to the widget and the state it shares through
//! Dioxus context.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use parley_core::{
    with_optional_attestation, Attestor, CollectionPath, CommentStore, CurrentUser, FaultSink,
    IdentityGate, IdentityProvider, LiveThread, ParleyError, Result, WidgetConfig,
};

/// The identity, store and attestation services one widget talks to.
///
/// Equality is by pointer identity so it can be passed as a component prop.
#[derive(Clone)]
pub struct WidgetServices {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn CommentStore>,
    pub attestor: Option<Arc<dyn Attestor>>,
}

impl WidgetServices {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn CommentStore>) -> Self {
        Self {
            identity,
            store,
            attestor: None,
        }
    }

    pub fn with_attestor(mut self, attestor: Arc<dyn Attestor>) -> Self {
        self.attestor = Some(attestor);
        self
    }

    /// The store as the widget writes to it: wrapped so every append
    /// carries an attestation token when an attestor is configured.
    pub fn write_store(&self) -> Arc<dyn CommentStore> {
        with_optional_attestation(Arc::clone(&self.store), self.attestor.clone())
    }

    /// Check that the attestor agrees with the site key in `config`.
    ///
    /// A configured key needs an attestor for that same key, and an
    /// attestor is only accepted when a key is configured.
    pub fn check_attestation(&self, config: &WidgetConfig) -> Result<()> {
        match (config.attestation_site_key.as_deref(), &self.attestor) {
            (None, None) => Ok(()),
            (Some(key), Some(attestor)) if attestor.site_key() == key => Ok(()),
            (Some(key), Some(attestor)) => Err(ParleyError::Config(format!(
                "attestor is for site key {:?}, widget is configured for {:?}",
                attestor.site_key(),
                key
            ))),
            (Some(key), None) => Err(ParleyError::Config(format!(
                "attestation site key {key:?} is configured but no attestor was supplied"
            ))),
            (None, Some(attestor)) => Err(ParleyError::Config(format!(
                "attestor for site key {:?} supplied without an attestation site key",
                attestor.site_key()
            ))),
        }
    }
}

impl PartialEq for WidgetServices {
    fn eq(&self, other: &Self) -> bool {
        let attestor_eq = match (&self.attestor, &other.attestor) {
            (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (None, None) => true,
            _ => false,
        };
        std::ptr::addr_eq(Arc::as_ptr(&self.identity), Arc::as_ptr(&other.identity))
            && std::ptr::addr_eq(Arc::as_ptr(&self.store), Arc::as_ptr(&other.store))
            && attestor_eq
    }
}

impl std::fmt::Debug for WidgetServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetServices")
            .field("attestation", &self.attestor.as_ref().map(|a| a.site_key().to_string()))
            .finish_non_exhaustive()
    }
}

/// Shared widget state provided via Dioxus context.
#[derive(Clone, Copy)]
pub struct WidgetContext {
    pub gate: Signal<IdentityGate>,
    /// Store used for writes (attested when configured).
    pub store: Signal<Arc<dyn CommentStore>>,
    pub path: Signal<CollectionPath>,
    pub faults: Signal<FaultSink>,
    pub auth: Signal<CurrentUser>,
    pub thread: Signal<LiveThread>,
    /// Reference instant for relative time labels, ticked periodically.
    pub now: Signal<DateTime<Utc>>,
}

impl WidgetContext {
    /// Must be called inside a component.
    pub fn new(config: &WidgetConfig, services: &WidgetServices) -> Self {
        let faults = FaultSink::new();
        let gate = IdentityGate::new(Arc::clone(&services.identity), faults.clone());
        let auth = gate.current_user();
        Self {
            gate: Signal::new(gate),
            store: Signal::new(services.write_store()),
            path: Signal::new(config.comments_path()),
            faults: Signal::new(faults),
            auth: Signal::new(auth),
            thread: Signal::new(LiveThread::new()),
            now: Signal::new(Utc::now()),
        }
    }
}
