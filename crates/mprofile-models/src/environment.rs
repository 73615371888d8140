//! Deployment environment tag sent with identity searches.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The mParticle environment an identity search runs against.
///
/// Defaults to [`Environment::Development`].
///
/// # Examples
///
/// ```
/// use mprofile_models::Environment;
///
/// let env: Environment = "production".parse().unwrap();
/// assert_eq!(env, Environment::Production);
/// assert_eq!(Environment::default().to_string(), "development");
/// ```
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Development data set.
    #[default]
    Development,
    /// Production data set.
    Production,
}

impl Environment {
    /// Parse an environment tag, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEnvironment`] for anything other than
    /// `development` or `production`.
    pub fn parse_tag(tag: &str) -> Result<Self, ModelError> {
        Self::from_str(&tag.trim().to_ascii_lowercase())
            .map_err(|_| ModelError::InvalidEnvironment(tag.to_string()))
    }

    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Production.as_str(), "production");
    }

    #[test]
    fn parse_tag_is_case_insensitive() {
        assert_eq!(Environment::parse_tag("Production").unwrap(), Environment::Production);
        assert_eq!(Environment::parse_tag(" development ").unwrap(), Environment::Development);
    }

    #[test]
    fn parse_tag_rejects_unknown() {
        assert_eq!(
            Environment::parse_tag("staging"),
            Err(ModelError::InvalidEnvironment("staging".into()))
        );
    }

    #[test]
    fn serializes_as_lowercase_string() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
    }

    #[test]
    fn enum_iter_lists_both() {
        use strum::IntoEnumIterator;
        let variants: Vec<_> = Environment::iter().collect();
        assert_eq!(variants, vec![Environment::Development, Environment::Production]);
    }
}
