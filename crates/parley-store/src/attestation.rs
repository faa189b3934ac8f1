//! Local attestation service keyed by site key.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::trace;

use parley_core::{AttestationToken, Attestor, ParleyError, Result};

/// Issues a fresh token per write for one site key.
#[derive(Debug)]
pub struct SiteKeyAttestor {
    site_key: String,
    issued: AtomicU64,
}

impl SiteKeyAttestor {
    pub fn new(site_key: impl Into<String>) -> Result<Self> {
        let site_key = site_key.into();
        if site_key.trim().is_empty() {
            return Err(ParleyError::Config("attestation site key is empty".into()));
        }
        Ok(Self {
            site_key,
            issued: AtomicU64::new(0),
        })
    }

    /// Tokens issued so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Attestor for SiteKeyAttestor {
    fn site_key(&self) -> &str {
        &self.site_key
    }

    async fn token(&self) -> Result<AttestationToken> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(site_key = %self.site_key, n, "Issuing attestation token");
        Ok(AttestationToken::new(format!("{}.{:08x}", self.site_key, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokens_are_fresh() {
        let attestor = SiteKeyAttestor::new("site").unwrap();
        let a = attestor.token().await.unwrap();
        let b = attestor.token().await.unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("site."));
        assert_eq!(attestor.issued(), 2);
    }

    #[test]
    fn test_empty_site_key_rejected() {
        assert!(SiteKeyAttestor::new("  ").is_err());
    }
}
