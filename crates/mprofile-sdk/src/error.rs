//! SDK error types.
//!
//! [`SdkError`] is returned by the operations that are allowed to fail:
//! client construction, profile URL building and the OAuth token exchange. Identity resolution and
//! profile fetch failures are reported as [`crate::LookupFailure`] values
//! instead.

use mprofile_models::ModelError;

/// Error type for fallible SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration. Fatal, not retriable.
    #[error("configuration error: {0}")]
    Config(#[from] ModelError),

    /// The OAuth client-credentials exchange failed.
    ///
    /// Treated as wrong client id / secret and never retried automatically.
    #[error("unable to refresh bearer token, check the profile API client id and secret: {0}")]
    OAuthExchange(String),

    /// HTTP client construction failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An endpoint base URL that cannot carry a request path.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl SdkError {
    /// `true` for [`SdkError::Config`].
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// `true` for [`SdkError::OAuthExchange`].
    pub fn is_oauth_exchange(&self) -> bool {
        matches!(self, Self::OAuthExchange(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_wraps_model_error() {
        let err: SdkError = ModelError::MissingConfiguration {
            fields: vec!["org_id"],
        }
        .into();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "configuration error: missing required profile client configuration: org_id"
        );
    }

    #[test]
    fn oauth_exchange_display() {
        let err = SdkError::OAuthExchange("token endpoint returned 401".into());
        assert!(err.is_oauth_exchange());
        assert!(err.to_string().starts_with("unable to refresh bearer token"));
        assert!(err.to_string().ends_with("token endpoint returned 401"));
    }

    #[test]
    fn invalid_url_display() {
        let err = SdkError::InvalidUrl("not a url".into());
        assert_eq!(err.to_string(), "invalid endpoint URL: not a url");
        assert!(!err.is_config());
    }
}
