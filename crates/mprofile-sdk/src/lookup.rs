//! Typed outcomes of identity resolution and profile fetches.
//!
//! The collapsing client methods turn every non-found outcome into an empty
//! profile. These types keep the cause so it can be logged and, for callers
//! that care, inspected.

use mprofile_models::Profile;

/// Why a lookup produced no profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupFailure {
    /// Identity resolution yielded no MPID.
    #[error("no mpid could be resolved for the given identities")]
    Unresolved,

    /// The profile API rejected the token again after a refresh.
    #[error("profile API rejected the refreshed bearer token")]
    Unauthorized,

    /// The bearer token could not be refreshed.
    #[error("bearer token refresh failed: {0}")]
    TokenRefresh(String),

    /// The vendor answered with an unexpected HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The request never got a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Outcome of a profile fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLookup {
    /// The profile was returned.
    Found(Profile),
    /// The vendor has no profile for this MPID.
    NotFound,
    /// The lookup failed; see the cause.
    Failed(LookupFailure),
}

impl ProfileLookup {
    /// `true` for [`ProfileLookup::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The profile, if one was found.
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Found(p) => Some(p),
            _ => None,
        }
    }

    /// The failure cause, if the lookup failed.
    pub fn failure(&self) -> Option<&LookupFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// Collapse to the found profile, or the empty profile otherwise.
    pub fn into_profile(self) -> Profile {
        match self {
            Self::Found(p) => p,
            Self::NotFound | Self::Failed(_) => Profile::empty(),
        }
    }
}
