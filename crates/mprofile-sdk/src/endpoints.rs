//! Canonical URLs of the vendor APIs.
//!
//! Every request URL the client sends is built through [`Endpoints`], so the
//! path layout is defined in exactly one place.
//!
//! # URL layout
//!
//! ```text
//! POST {oauth}                                                  ← client-credentials grant
//! POST {identity_api}                                           ← identity search
//! GET  {profile_api}/{org}/{acct}/{workspace}/{mpid}?fields=…   ← profile fetch
//! ```
//!
//! Ids are percent-encoded, so each one always stays a single path segment.

use mprofile_models::{MpId, ProfileScope, PROFILE_FIELDS};
use reqwest::Url;

use crate::error::SdkError;

/// Default base URL of the user-profile API.
pub const PROFILE_API_URL: &str = "https://api.mparticle.com/userprofile/v1";
/// Default identity search URL.
pub const IDENTITY_API_URL: &str = "https://identity.mparticle.com/v1/search";
/// Default OAuth token URL.
pub const OAUTH_URL: &str = "https://sso.auth.mparticle.com/oauth/token";
/// Audience requested in every client-credentials grant.
pub const PROFILE_API_AUDIENCE: &str = "https://api.mparticle.com";

/// Base URLs of the three vendor endpoints.
///
/// # Examples
///
/// ```
/// use mprofile_models::{MpId, ProfileScope};
/// use mprofile_sdk::Endpoints;
///
/// let endpoints = Endpoints::default();
/// let scope = ProfileScope::new("1", "2", "3");
///
/// assert_eq!(
///     endpoints.profile_url(&scope, &MpId::new("456")).unwrap().as_str(),
///     "https://api.mparticle.com/userprofile/v1/1/2/3/456\
///      ?fields=user_identities,user_attributes,audience_memberships,attribution",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base URL of the user-profile API.
    pub profile_api: String,
    /// Full URL of the identity search endpoint.
    pub identity_api: String,
    /// Full URL of the OAuth token endpoint.
    pub oauth: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            profile_api: PROFILE_API_URL.to_string(),
            identity_api: IDENTITY_API_URL.to_string(),
            oauth: OAUTH_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints rooted at a single host, laid out like the vendor's:
    /// `{base}/userprofile/v1`, `{base}/identity/v1/search` and
    /// `{base}/oauth/token`.
    ///
    /// Used to point the client at a local mock server.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            profile_api: format!("{base}/userprofile/v1"),
            identity_api: format!("{base}/identity/v1/search"),
            oauth: format!("{base}/oauth/token"),
        }
    }

    /// Parsed profile API base.
    ///
    /// # Errors
    ///
    /// [`SdkError::InvalidUrl`] when `profile_api` is not an absolute URL
    /// that can take path segments.
    pub fn profile_base(&self) -> Result<Url, SdkError> {
        let url = Url::parse(&self.profile_api)
            .map_err(|e| SdkError::InvalidUrl(format!("{}: {e}", self.profile_api)))?;
        if url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(self.profile_api.clone()));
        }
        Ok(url)
    }

    /// URL of a single profile.
    ///
    /// An empty `mpid` yields an empty trailing path segment.
    ///
    /// # Errors
    ///
    /// [`SdkError::InvalidUrl`] when the profile API base is unusable.
    pub fn profile_url(&self, scope: &ProfileScope, mpid: &MpId) -> Result<Url, SdkError> {
        let mut url = self.profile_base()?;
        url.path_segments_mut()
            .map_err(|()| SdkError::InvalidUrl(self.profile_api.clone()))?
            .pop_if_empty()
            .extend([
                scope.org_id.as_str(),
                scope.acct_id.as_str(),
                scope.workspace_id.as_str(),
                mpid.as_str(),
            ]);
        url.set_query(Some(&format!("fields={}", PROFILE_FIELDS.join(","))));
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
