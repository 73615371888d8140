//! Identity types: the caller's known identities and the vendor's MPID.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// KnownIdentities
// ---------------------------------------------------------------------------

/// Identity type → value pairs used to look up a profile
/// (e.g. `customerid → "123"`, `email → "a@b.c"`).
///
/// Serializes as a flat JSON object, which is the shape the identity search
/// API expects under `known_identities`.
///
/// # Examples
///
/// ```
/// use mprofile_models::KnownIdentities;
///
/// let ids = KnownIdentities::new().with("customerid", "123");
/// assert_eq!(ids.get("customerid"), Some("123"));
/// assert_eq!(serde_json::to_string(&ids).unwrap(), r#"{"customerid":"123"}"#);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct KnownIdentities(BTreeMap<String, String>);

impl KnownIdentities {
    /// An empty identity set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, identity_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(identity_type, value);
        self
    }

    /// Insert or replace one identity.
    pub fn insert(&mut self, identity_type: impl Into<String>, value: impl Into<String>) {
        self.0.insert(identity_type.into(), value.into());
    }

    /// Value for an identity type, if present.
    pub fn get(&self, identity_type: &str) -> Option<&str> {
        self.0.get(identity_type).map(String::as_str)
    }

    /// Identity type names, without their values.
    ///
    /// Used for logging so identity values never reach log output.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `true` when no identity is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a single `type=value` argument.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidIdentity`] when there is no `=` or
    /// either side is empty.
    pub fn parse_pair(arg: &str) -> Result<(String, String), ModelError> {
        match arg.split_once('=') {
            Some((ty, value)) if !ty.trim().is_empty() && !value.is_empty() => {
                Ok((ty.trim().to_string(), value.to_string()))
            }
            _ => Err(ModelError::InvalidIdentity(arg.to_string())),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KnownIdentities {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// MpId
// ---------------------------------------------------------------------------

/// The vendor-assigned internal profile identifier.
///
/// # Examples
///
/// ```
/// use mprofile_models::MpId;
///
/// let id: MpId = "456".into();
/// assert_eq!(id.to_string(), "456");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MpId(String);

impl MpId {
    /// Create a new `MpId` from a string slice.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the empty id used when resolution produced nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MpId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MpId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for MpId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_serialize_flat() {
        let ids = KnownIdentities::new()
            .with("email", "a@example.com")
            .with("customerid", "123");
        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"customerid": "123", "email": "a@example.com"})
        );
    }

    #[test]
    fn insert_replaces_value() {
        let mut ids = KnownIdentities::new().with("customerid", "1");
        ids.insert("customerid", "2");
        assert_eq!(ids.types().collect::<Vec<_>>(), vec!["customerid"]);
        assert_eq!(ids.get("customerid"), Some("2"));
    }

    #[test]
    fn types_exclude_values() {
        let ids = KnownIdentities::new().with("email", "secret@example.com");
        let types: Vec<_> = ids.types().collect();
        assert_eq!(types, vec!["email"]);
    }

    #[test]
    fn from_iterator_collects() {
        let ids: KnownIdentities = [("customerid", "123")].into_iter().collect();
        assert_eq!(ids.get("customerid"), Some("123"));
        assert!(!ids.is_empty());
    }

    #[test]
    fn parse_pair_valid() {
        assert_eq!(
            KnownIdentities::parse_pair("email=a=b@example.com").unwrap(),
            ("email".to_string(), "a=b@example.com".to_string())
        );
    }

    #[test]
    fn parse_pair_invalid() {
        assert!(KnownIdentities::parse_pair("customerid").is_err());
        assert!(KnownIdentities::parse_pair("=123").is_err());
        assert!(KnownIdentities::parse_pair("customerid=").is_err());
    }

    #[test]
    fn mpid_display_and_equality() {
        let a = MpId::new("456");
        let b: MpId = "456".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "456");
        assert!(!a.is_empty());
        assert!(MpId::default().is_empty());
    }
}
