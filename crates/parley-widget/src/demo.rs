//! In-memory services for running the widget stand-alone.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use parley_core::{Attestor, CommentRecord, Result, User, WidgetConfig};
use parley_store::{MemoryIdentity, MemoryStore, SiteKeyAttestor};

use crate::context::WidgetServices;

/// How the demo collaborators start out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoOptions {
    /// Display name used when logging in.
    pub user: String,
    /// Start already signed in instead of at the login prompt.
    pub signed_in: bool,
    /// Pre-fill the thread with a short conversation.
    pub seed: bool,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            user: "Guest".to_string(),
            signed_in: false,
            seed: false,
        }
    }
}

impl DemoOptions {
    pub fn account(&self) -> User {
        let slug: String = self
            .user
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect();
        User::new(format!("demo-{slug}"), self.user.trim())
    }
}

/// Memory-backed services for `config`. When an attestation site key is
/// set, the store refuses writes without a token and an attestor is
/// attached.
pub fn demo_services(config: &WidgetConfig, options: &DemoOptions) -> Result<WidgetServices> {
    config.validate()?;

    let store = MemoryStore::new(config.store.clone())
        .require_attestation(config.attestation_site_key.is_some());
    if options.seed {
        store.seed(&config.comments_path(), sample_thread(Utc::now()));
    }

    let account = options.account();
    let identity = if options.signed_in {
        MemoryIdentity::signed_in(account)
    } else {
        MemoryIdentity::signed_out(account)
    };

    let mut services = WidgetServices::new(Arc::new(identity), Arc::new(store));
    if let Some(site_key) = &config.attestation_site_key {
        let attestor: Arc<dyn Attestor> = Arc::new(SiteKeyAttestor::new(site_key.as_str())?);
        services = services.with_attestor(attestor);
    }
    Ok(services)
}

/// A short conversation with one nested reply chain.
pub fn sample_thread(now: DateTime<Utc>) -> Vec<CommentRecord> {
    vec![
        CommentRecord::new("welcome", None, "demo-ada", "Ada", "Nice write-up, thanks for sharing.")
            .with_created_at(now - Duration::days(2)),
        CommentRecord::new("question", None, "demo-bo", "Bo", "Does this work with nested replies?")
            .with_created_at(now - Duration::hours(5)),
        CommentRecord::new("answer", Some("question"), "demo-ada", "Ada", "It does, as deep as you like.")
            .with_created_at(now - Duration::hours(4)),
        CommentRecord::new("follow-up", Some("answer"), "demo-bo", "Bo", "Perfect.")
            .with_created_at(now - Duration::minutes(12)),
    ]
}
