//! In-memory identity provider.
//!
//! Holds the auth state in a watch channel. "Interactive" login signs in
//! the configured account; without one, or after `fail_next_login`, it
//! fails the way a dismissed sign-in popup would.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::info;

use parley_core::{AuthState, IdentityProvider, ParleyError, Result, User};

/// In-memory [`IdentityProvider`].
pub struct MemoryIdentity {
    state: watch::Sender<AuthState>,
    account: Mutex<Option<User>>,
    fail_next_login: Mutex<Option<String>>,
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentity {
    /// Starts unresolved (`Loading`) with no account to sign in as.
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            state,
            account: Mutex::new(None),
            fail_next_login: Mutex::new(None),
        }
    }

    /// Already resolved to signed-out; login signs in as `account`.
    pub fn signed_out(account: User) -> Self {
        let identity = Self::new().with_account(account);
        identity.resolve(None);
        identity
    }

    /// Already resolved to `user`.
    pub fn signed_in(user: User) -> Self {
        let identity = Self::new().with_account(user.clone());
        identity.resolve(Some(user));
        identity
    }

    /// Account used by the next interactive login.
    pub fn with_account(self, account: User) -> Self {
        *self.account.lock() = Some(account);
        self
    }

    /// Finish the initial session lookup.
    pub fn resolve(&self, user: Option<User>) {
        let state = match user {
            Some(user) => AuthState::SignedIn(user),
            None => AuthState::SignedOut,
        };
        self.state.send_replace(state);
    }

    /// Make the next login fail with `message`.
    pub fn fail_next_login(&self, message: impl Into<String>) {
        *self.fail_next_login.lock() = Some(message.into());
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn begin_login(&self) -> Result<()> {
        if let Some(message) = self.fail_next_login.lock().take() {
            return Err(ParleyError::Identity(message));
        }
        let account = self
            .account
            .lock()
            .clone()
            .ok_or_else(|| ParleyError::Identity("no account available to sign in".into()))?;
        info!(user_id = %account.id, "Signed in");
        self.state.send_replace(AuthState::SignedIn(account));
        Ok(())
    }

    async fn end_session(&self) -> Result<()> {
        info!("Signed out");
        self.state.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lifecycle() {
        let identity = MemoryIdentity::new().with_account(User::new("u1", "Ada"));
        let mut rx = identity.subscribe();
        assert_eq!(*rx.borrow_and_update(), AuthState::Loading);

        identity.resolve(None);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);

        identity.begin_login().await.unwrap();
        assert_eq!(identity.state(), AuthState::SignedIn(User::new("u1", "Ada")));

        identity.end_session().await.unwrap();
        assert_eq!(identity.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_login_without_account_fails() {
        let identity = MemoryIdentity::new();
        identity.resolve(None);
        assert!(matches!(identity.begin_login().await, Err(ParleyError::Identity(_))));
        assert_eq!(identity.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_injected_login_failure() {
        let identity = MemoryIdentity::signed_out(User::new("u1", "Ada"));
        identity.fail_next_login("popup closed by user");
        assert!(identity.begin_login().await.is_err());
        assert!(identity.begin_login().await.is_ok());
    }
}
