//! # mProfile SDK
//!
//! Client for resolving known identities to an mParticle profile.
//!
//! The SDK provides:
//!
//! * [`ProfileClient`]: resolves identities to an MPID, fetches the
//!   profile, and refreshes its bearer token once when the profile API
//!   answers `401`.
//! * [`Endpoints`]: base URLs of the OAuth, identity and profile APIs and
//!   the request URLs derived from them.
//! * [`ProfileLookup`] / [`LookupFailure`]: typed lookup outcomes for
//!   callers that need to tell "no profile" apart from "request failed".
//! * [`SdkError`]: unified error type for fallible SDK operations.
//! * [`config`]: credential and endpoint loading from environment
//!   variables.
//!
//! Types from [`mprofile_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mprofile_sdk::{Environment, IdOverrides, KnownIdentities, ProfileClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ProfileClient::from_env().await?;
//!
//! let identities = KnownIdentities::new().with("customerid", "123");
//! let profile = client
//!     .get_profile(&identities, &IdOverrides::none(), Environment::Production)
//!     .await;
//!
//! println!("{}", serde_json::to_string_pretty(&profile)?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod lookup;
pub mod token;

pub use client::ProfileClient;
pub use endpoints::Endpoints;
pub use error::SdkError;
pub use lookup::{LookupFailure, ProfileLookup};
pub use token::{BearerToken, TokenSource};

pub use mprofile_models::{
    Credentials, Environment, IdOverrides, KnownIdentities, ModelError, MpId, Profile,
    ProfileScope,
};
