//! Error types for the `mprofile-models` crate.
//!
//! Validation and parsing in this crate return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// One or more required configuration fields were empty or absent.
    ///
    /// Every missing field is listed, not just the first one found.
    #[error("missing required profile client configuration: {}", fields.join(", "))]
    MissingConfiguration {
        /// Names of the missing fields, in declaration order.
        fields: Vec<&'static str>,
    },

    /// An environment tag other than `development` or `production`.
    #[error("invalid environment \"{0}\": expected development or production")]
    InvalidEnvironment(String),

    /// An identity argument that is not of the form `type=value`.
    #[error("invalid identity \"{0}\": expected type=value")]
    InvalidIdentity(String),
}
