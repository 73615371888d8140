//! Organization / account / workspace addressing for profile fetches.

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;

/// Per-call replacements for the default profile scope.
///
/// `None` (or an empty string) keeps the default from [`Credentials`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IdOverrides {
    /// Organization id override.
    pub org_id: Option<String>,
    /// Account id override.
    pub acct_id: Option<String>,
    /// Workspace id override.
    pub workspace_id: Option<String>,
}

impl IdOverrides {
    /// No overrides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Override the organization id.
    pub fn org_id(mut self, id: impl Into<String>) -> Self {
        self.org_id = Some(id.into());
        self
    }

    /// Override the account id.
    pub fn acct_id(mut self, id: impl Into<String>) -> Self {
        self.acct_id = Some(id.into());
        self
    }

    /// Override the workspace id.
    pub fn workspace_id(mut self, id: impl Into<String>) -> Self {
        self.workspace_id = Some(id.into());
        self
    }
}

/// The fully-resolved scope a profile is fetched from.
///
/// # Examples
///
/// ```
/// use mprofile_models::{IdOverrides, ProfileScope};
///
/// let defaults = ProfileScope::new("1", "2", "3");
/// let scope = defaults.merged(&IdOverrides::none().workspace_id("9"));
/// assert_eq!(scope, ProfileScope::new("1", "2", "9"));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileScope {
    /// Organization id.
    pub org_id: String,
    /// Account id.
    pub acct_id: String,
    /// Workspace id.
    pub workspace_id: String,
}

impl ProfileScope {
    /// Build a scope from its three ids.
    pub fn new(org_id: &str, acct_id: &str, workspace_id: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            acct_id: acct_id.to_string(),
            workspace_id: workspace_id.to_string(),
        }
    }

    /// The default scope carried by a set of credentials.
    pub fn from_credentials(creds: &Credentials) -> Self {
        Self::new(&creds.org_id, &creds.acct_id, &creds.workspace_id)
    }

    /// Apply overrides on top of this scope. Overrides win.
    pub fn merged(&self, overrides: &IdOverrides) -> Self {
        fn pick(default: &str, over: Option<&String>) -> String {
            over.filter(|v| !v.is_empty())
                .map_or_else(|| default.to_string(), Clone::clone)
        }

        Self {
            org_id: pick(&self.org_id, overrides.org_id.as_ref()),
            acct_id: pick(&self.acct_id, overrides.acct_id.as_ref()),
            workspace_id: pick(&self.workspace_id, overrides.workspace_id.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ProfileScope {
        ProfileScope::new("org", "acct", "ws")
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        assert_eq!(defaults().merged(&IdOverrides::none()), defaults());
    }

    #[test]
    fn overrides_win_on_collision() {
        let overrides = IdOverrides::none().org_id("o2").acct_id("a2").workspace_id("w2");
        assert_eq!(defaults().merged(&overrides), ProfileScope::new("o2", "a2", "w2"));
    }

    #[test]
    fn partial_override() {
        let scope = defaults().merged(&IdOverrides::none().acct_id("a2"));
        assert_eq!(scope, ProfileScope::new("org", "a2", "ws"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let scope = defaults().merged(&IdOverrides::none().org_id(""));
        assert_eq!(scope.org_id, "org");
    }

    #[test]
    fn from_credentials_uses_ids() {
        let creds = Credentials {
            org_id: "1".into(),
            acct_id: "2".into(),
            workspace_id: "3".into(),
            ..Default::default()
        };
        assert_eq!(ProfileScope::from_credentials(&creds), ProfileScope::new("1", "2", "3"));
    }
}
