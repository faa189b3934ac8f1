//! Identity gate: who is looking at the thread.
//!
//! The identity provider pushes [`AuthState`] changes over a watch channel;
//! the gate turns them into [`CurrentUser`] snapshots and a [`GateView`] the
//! widget renders. Login and logout are fire-and-forget: success shows up
//! later as a state change, failure goes to the [`FaultSink`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::Result;
use crate::fault::FaultSink;
use crate::model::User;
use crate::stream::{watch_to_stream, BoxStream};

/// Authentication state as pushed by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The provider has not resolved the session yet.
    #[default]
    Loading,
    /// Resolved, nobody is signed in.
    SignedOut,
    /// Resolved, a user is signed in.
    SignedIn(User),
}

/// Whether the identity provider has answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Loading,
    Resolved,
}

/// Result of `current_user()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub status: AuthStatus,
    pub user: Option<User>,
}

impl CurrentUser {
    pub fn loading() -> Self {
        Self {
            status: AuthStatus::Loading,
            user: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == AuthStatus::Loading
    }

    /// The signed-in user, if any.
    pub fn signed_in(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl From<&AuthState> for CurrentUser {
    fn from(state: &AuthState) -> Self {
        match state {
            AuthState::Loading => CurrentUser::loading(),
            AuthState::SignedOut => CurrentUser {
                status: AuthStatus::Resolved,
                user: None,
            },
            AuthState::SignedIn(user) => CurrentUser {
                status: AuthStatus::Resolved,
                user: Some(user.clone()),
            },
        }
    }
}

/// What the identity bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Loading,
    /// Nobody signed in: offer to log in.
    LoginPrompt,
    /// "Logged in as ..." with a logout link.
    SignedIn { display_name: String },
}

impl From<&CurrentUser> for GateView {
    fn from(current: &CurrentUser) -> Self {
        match (&current.status, &current.user) {
            (AuthStatus::Loading, _) => GateView::Loading,
            (AuthStatus::Resolved, None) => GateView::LoginPrompt,
            (AuthStatus::Resolved, Some(user)) => GateView::SignedIn {
                display_name: user.display_name.clone(),
            },
        }
    }
}

/// Identity collaborator.
///
/// Implementations own the session lifecycle; the widget only observes it.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Receiver for the live authentication state.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// Start an interactive sign-in.
    async fn begin_login(&self) -> Result<()>;

    /// End the current session.
    async fn end_session(&self) -> Result<()>;
}

/// Current-user state plus login/logout actions.
#[derive(Clone)]
pub struct IdentityGate {
    provider: Arc<dyn IdentityProvider>,
    faults: FaultSink,
}

impl std::fmt::Debug for IdentityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityGate")
            .field("current", &self.current_user())
            .finish_non_exhaustive()
    }
}

impl IdentityGate {
    pub fn new(provider: Arc<dyn IdentityProvider>, faults: FaultSink) -> Self {
        Self { provider, faults }
    }

    /// The provider's state right now.
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser::from(&*self.provider.subscribe().borrow())
    }

    /// Current user first, then every change pushed by the provider.
    pub fn changes(&self) -> BoxStream<CurrentUser> {
        use futures::StreamExt;
        Box::pin(watch_to_stream(self.provider.subscribe()).map(|state| {
            let current = CurrentUser::from(&state);
            debug!(status = ?current.status, signed_in = current.user.is_some(), "Identity changed");
            current
        }))
    }

    pub fn view(&self) -> GateView {
        GateView::from(&self.current_user())
    }

    /// Start an interactive login. Errors are reported to the fault sink.
    pub fn login(&self) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let faults = self.faults.clone();
        info!("Login requested");
        tokio::spawn(async move {
            if let Err(e) = provider.begin_login().await {
                faults.report(e);
            }
        })
    }

    /// Sign out. Errors are reported to the fault sink.
    pub fn logout(&self) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let faults = self.faults.clone();
        info!("Logout requested");
        tokio::spawn(async move {
            if let Err(e) = provider.end_session().await {
                faults.report(e);
            }
        })
    }
}
