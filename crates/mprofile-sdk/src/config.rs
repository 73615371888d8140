//! Client configuration from environment variables.
//!
//! | Variable                       | Required | Description                        |
//! |--------------------------------|----------|------------------------------------|
//! | `mp_identity_input_key`        | yes      | Identity API key                   |
//! | `mp_identity_input_secret`     | yes      | Identity API secret                |
//! | `mp_profile_bearer_token`      | no       | Pre-issued profile API token       |
//! | `mp_profile_api_client_id`     | yes      | Profile API OAuth client id        |
//! | `mp_profile_api_client_secret` | yes      | Profile API OAuth client secret    |
//! | `mp_org_id`                    | yes      | Default organization id            |
//! | `mp_acct_id`                   | yes      | Default account id                 |
//! | `mp_workspace_id`              | yes      | Default workspace id               |
//! | `MP_PROFILE_API_URL`           | no       | Profile API base URL override      |
//! | `MP_IDENTITY_API_URL`          | no       | Identity search URL override       |
//! | `MP_OAUTH_URL`                 | no       | OAuth token URL override           |
//!
//! Loading never fails: unset required variables become empty strings and
//! are reported together by [`mprofile_models::Credentials::validate`].

use mprofile_models::Credentials;

use crate::endpoints::Endpoints;

/// Identity API key variable.
pub const IDENTITY_INPUT_KEY: &str = "mp_identity_input_key";
/// Identity API secret variable.
pub const IDENTITY_INPUT_SECRET: &str = "mp_identity_input_secret";
/// Optional bearer token variable.
pub const PROFILE_BEARER_TOKEN: &str = "mp_profile_bearer_token";
/// OAuth client id variable.
pub const PROFILE_API_CLIENT_ID: &str = "mp_profile_api_client_id";
/// OAuth client secret variable.
pub const PROFILE_API_CLIENT_SECRET: &str = "mp_profile_api_client_secret";
/// Organization id variable.
pub const ORG_ID: &str = "mp_org_id";
/// Account id variable.
pub const ACCT_ID: &str = "mp_acct_id";
/// Workspace id variable.
pub const WORKSPACE_ID: &str = "mp_workspace_id";

/// Profile API base URL override.
pub const PROFILE_API_URL_VAR: &str = "MP_PROFILE_API_URL";
/// Identity search URL override.
pub const IDENTITY_API_URL_VAR: &str = "MP_IDENTITY_API_URL";
/// OAuth token URL override.
pub const OAUTH_URL_VAR: &str = "MP_OAUTH_URL";

/// Read credentials from the process environment.
pub fn credentials_from_env() -> Credentials {
    credentials_from_lookup(|name| std::env::var(name).ok())
}

/// Read endpoint overrides from the process environment.
pub fn endpoints_from_env() -> Endpoints {
    endpoints_from_lookup(|name| std::env::var(name).ok())
}

/// Build credentials from an arbitrary variable lookup.
pub fn credentials_from_lookup<F>(lookup: F) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).unwrap_or_default();

    Credentials {
        identity_input_key: var(IDENTITY_INPUT_KEY),
        identity_input_secret: var(IDENTITY_INPUT_SECRET),
        profile_bearer_token: lookup(PROFILE_BEARER_TOKEN).filter(|t| !t.trim().is_empty()),
        profile_api_client_id: var(PROFILE_API_CLIENT_ID),
        profile_api_client_secret: var(PROFILE_API_CLIENT_SECRET),
        org_id: var(ORG_ID),
        acct_id: var(ACCT_ID),
        workspace_id: var(WORKSPACE_ID),
    }
}

/// Build endpoints from an arbitrary variable lookup, keeping the vendor
/// defaults for anything unset or empty.
pub fn endpoints_from_lookup<F>(lookup: F) -> Endpoints
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Endpoints::default();
    let var = |name: &str, default: String| {
        lookup(name)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    };

    Endpoints {
        profile_api: var(PROFILE_API_URL_VAR, defaults.profile_api),
        identity_api: var(IDENTITY_API_URL_VAR, defaults.identity_api),
        oauth: var(OAUTH_URL_VAR, defaults.oauth),
    }
}
