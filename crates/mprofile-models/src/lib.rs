#![deny(missing_docs)]

//! # mProfile Models
//!
//! Plain data types used to talk to the mParticle identity and user-profile
//! APIs. Nothing in this crate performs I/O.
//!
//! ## Lookup pipeline
//!
//! ```text
//! KnownIdentities + Environment
//!        │  identity search (basic auth)
//!        ▼
//!      MpId + ProfileScope (Credentials defaults ⊕ IdOverrides)
//!        │  profile fetch (bearer auth)
//!        ▼
//!     Profile
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`credentials`] | `Credentials` and their validation |
//! | [`identity`] | `KnownIdentities`, `MpId` |
//! | [`environment`] | `Environment` tag sent with identity searches |
//! | [`scope`] | `IdOverrides` and the merged `ProfileScope` |
//! | [`profile`] | Opaque `Profile` payload |
//! | [`error`] | `ModelError` |

pub mod credentials;
pub mod environment;
pub mod error;
pub mod identity;
pub mod profile;
pub mod scope;

// Re-export all public types at crate root for convenience.
pub use credentials::*;
pub use environment::*;
pub use error::*;
pub use identity::*;
pub use profile::*;
pub use scope::*;
