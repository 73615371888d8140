//! Client credentials for the mParticle identity and profile APIs.

use std::fmt;

use serde::Deserialize;

use crate::error::ModelError;

/// Everything a profile client needs to authenticate and address a workspace.
///
/// * `identity_input_key` / `identity_input_secret` – basic-auth pair for the
///   identity search API.
/// * `profile_api_client_id` / `profile_api_client_secret` – OAuth client
///   used to mint bearer tokens for the profile API.
/// * `org_id` / `acct_id` / `workspace_id` – default profile scope.
/// * `profile_bearer_token` – optional pre-issued bearer token.
///
/// Every field except `profile_bearer_token` is required; see
/// [`Credentials::validate`].
///
/// Missing fields deserialize to empty strings so that validation can report
/// all of them at once.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Identity API key (basic-auth username).
    pub identity_input_key: String,
    /// Identity API secret (basic-auth password).
    pub identity_input_secret: String,
    /// Pre-issued bearer token for the profile API, if any.
    pub profile_bearer_token: Option<String>,
    /// OAuth client id for the profile API.
    pub profile_api_client_id: String,
    /// OAuth client secret for the profile API.
    pub profile_api_client_secret: String,
    /// Default organization id.
    pub org_id: String,
    /// Default account id.
    pub acct_id: String,
    /// Default workspace id.
    pub workspace_id: String,
}

impl Credentials {
    /// Check that every required field is present.
    ///
    /// A field counts as missing when it is the empty string. Whitespace is
    /// passed through untouched. The bearer token is never required.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingConfiguration`] listing *all* missing
    /// field names.
    ///
    /// # Examples
    ///
    /// ```
    /// use mprofile_models::{Credentials, ModelError};
    ///
    /// let creds = Credentials {
    ///     identity_input_key: "key".into(),
    ///     identity_input_secret: "secret".into(),
    ///     profile_api_client_id: "client".into(),
    ///     profile_api_client_secret: "client-secret".into(),
    ///     org_id: "1".into(),
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(
    ///     creds.validate(),
    ///     Err(ModelError::MissingConfiguration { fields: vec!["acct_id", "workspace_id"] }),
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ModelError> {
        let missing: Vec<&'static str> = self
            .required_fields()
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::MissingConfiguration { fields: missing })
        }
    }

    /// The supplied bearer token, ignoring empty values.
    pub fn bearer_token(&self) -> Option<&str> {
        self.profile_bearer_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    fn required_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("identity_input_key", &self.identity_input_key),
            ("identity_input_secret", &self.identity_input_secret),
            ("profile_api_client_id", &self.profile_api_client_id),
            ("profile_api_client_secret", &self.profile_api_client_secret),
            ("org_id", &self.org_id),
            ("acct_id", &self.acct_id),
            ("workspace_id", &self.workspace_id),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity_input_key", &self.identity_input_key)
            .field("identity_input_secret", &"<redacted>")
            .field(
                "profile_bearer_token",
                &self.profile_bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("profile_api_client_id", &self.profile_api_client_id)
            .field("profile_api_client_secret", &"<redacted>")
            .field("org_id", &self.org_id)
            .field("acct_id", &self.acct_id)
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}
