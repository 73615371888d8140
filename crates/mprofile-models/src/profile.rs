//! The profile payload returned by the user-profile API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields requested on every profile fetch.
pub const PROFILE_FIELDS: [&str; 4] = [
    "user_identities",
    "user_attributes",
    "audience_memberships",
    "attribution",
];

/// A user profile as returned by the vendor.
///
/// The client never interprets the contents; it only guarantees the payload
/// is a JSON object. The empty profile is `{}`, which is what lookups
/// collapse to when nothing was found or the fetch failed.
///
/// # Examples
///
/// ```
/// use mprofile_models::Profile;
///
/// let empty = Profile::empty();
/// assert!(empty.is_empty());
/// assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    /// The empty profile, `{}`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` for `{}`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A top-level field of the profile.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Consume into a [`serde_json::Value`].
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
