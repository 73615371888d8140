//! Bearer token storage shared by every clone of a client.
//!
//! The vendor expires profile API tokens after roughly eight hours. No
//! expiry is tracked here: a stale token is discovered when the profile API
//! answers `401`, and replaced wholesale by the next successful exchange.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Where a bearer token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Supplied up front in the credentials.
    Configured,
    /// Minted by an OAuth client-credentials exchange.
    Exchanged,
}

/// An opaque bearer token for the profile API.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    value: String,
    source: TokenSource,
    obtained_at: DateTime<Utc>,
}

impl BearerToken {
    /// A token taken from configuration.
    pub fn configured(value: impl Into<String>) -> Self {
        Self::with_source(value, TokenSource::Configured)
    }

    /// A token returned by the OAuth endpoint.
    pub fn exchanged(value: impl Into<String>) -> Self {
        Self::with_source(value, TokenSource::Exchanged)
    }

    fn with_source(value: impl Into<String>, source: TokenSource) -> Self {
        Self {
            value: value.into(),
            source,
            obtained_at: Utc::now(),
        }
    }

    /// The raw token, for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.value
    }

    /// Where the token came from.
    pub fn source(&self) -> TokenSource {
        self.source
    }

    /// When this process obtained the token.
    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Shared, lock-protected slot holding the current token.
///
/// Cloning is cheap and every clone sees the same slot. Concurrent
/// replacements are last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    slot: Arc<RwLock<Option<BearerToken>>>,
}

impl TokenStore {
    /// A store pre-filled with `token`.
    pub fn with_token(token: Option<BearerToken>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(token)),
        }
    }

    /// Snapshot of the current token.
    pub async fn current(&self) -> Option<BearerToken> {
        self.slot.read().await.clone()
    }

    /// Overwrite the current token.
    pub async fn replace(&self, token: BearerToken) {
        *self.slot.write().await = Some(token);
    }

    /// `true` once a token is held.
    pub async fn is_present(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_value() {
        let token = BearerToken::exchanged("abc.def.ghi");
        let out = format!("{token:?}");
        assert!(!out.contains("abc.def.ghi"));
        assert!(out.contains("Exchanged"));
    }

    #[test]
    fn source_is_recorded() {
        assert_eq!(BearerToken::configured("a").source(), TokenSource::Configured);
        assert_eq!(BearerToken::exchanged("a").source(), TokenSource::Exchanged);
    }

    #[tokio::test]
    async fn empty_store_has_no_token() {
        let store = TokenStore::default();
        assert!(!store.is_present().await);
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn replace_overwrites() {
        let store = TokenStore::with_token(Some(BearerToken::configured("first")));
        store.replace(BearerToken::exchanged("second")).await;
        let current = store.current().await.unwrap();
        assert_eq!(current.secret(), "second");
        assert_eq!(current.source(), TokenSource::Exchanged);
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let store = TokenStore::default();
        let other = store.clone();
        other.replace(BearerToken::exchanged("shared")).await;
        assert_eq!(store.current().await.unwrap().secret(), "shared");
    }
}
