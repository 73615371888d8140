//! High-level client for the mParticle identity and profile APIs.
//!
//! [`ProfileClient`] resolves known identities to an MPID, fetches the
//! matching profile, and keeps the profile API bearer token fresh.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use mprofile_sdk::{Credentials, Environment, IdOverrides, KnownIdentities, ProfileClient};
//!
//! # async fn run(creds: Credentials) -> Result<(), mprofile_sdk::SdkError> {
//! // Validates the credentials and, without a configured token, performs
//! // the first OAuth exchange before returning.
//! let client = ProfileClient::connect(creds).await?;
//!
//! let identities = KnownIdentities::new().with("email", "pilot@example.com");
//! let lookup = client
//!     .lookup_profile(&identities, &IdOverrides::none(), Environment::Development)
//!     .await;
//!
//! if let Some(profile) = lookup.profile() {
//!     println!("{:?}", profile.get("user_attributes"));
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use mprofile_models::{
    Credentials, Environment, IdOverrides, KnownIdentities, MpId, Profile, ProfileScope,
};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config;
use crate::endpoints::{Endpoints, PROFILE_API_AUDIENCE};
use crate::error::SdkError;
use crate::lookup::{LookupFailure, ProfileLookup};
use crate::token::{BearerToken, TokenStore};

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

/// Body of the client-credentials grant.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Body of an identity search.
#[derive(Serialize)]
struct IdentitySearchRequest<'a> {
    environment: Environment,
    known_identities: &'a KnownIdentities,
}

#[derive(Deserialize)]
struct IdentitySearchResponse {
    /// Sent as a string, but tolerate a bare number.
    #[serde(default)]
    mpid: Option<serde_json::Value>,
}

impl IdentitySearchResponse {
    fn into_mpid(self) -> Option<MpId> {
        match self.mpid? {
            serde_json::Value::String(s) if !s.is_empty() => Some(MpId::from(s)),
            serde_json::Value::Number(n) => Some(MpId::from(n.to_string())),
            _ => None,
        }
    }
}

/// Result of a single profile request.
enum Attempt {
    Done(ProfileLookup),
    Unauthorized,
}

// ---------------------------------------------------------------------------
// ProfileClient
// ---------------------------------------------------------------------------

/// An authenticated client for one mParticle workspace.
///
/// Cloning is cheap: clones share the HTTP connection pool and the bearer
/// token, so a refresh made through one clone is seen by all of them.
#[derive(Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
    creds: Arc<Credentials>,
    endpoints: Arc<Endpoints>,
    default_scope: ProfileScope,
    token: TokenStore,
}

impl ProfileClient {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build a client against the vendor's production endpoints without
    /// touching the network.
    ///
    /// When the credentials carry no bearer token the client starts without
    /// one (see [`has_token`](Self::has_token)); the first profile fetch
    /// then gets a `401`, refreshes, and retries. Use
    /// [`connect`](Self::connect) to obtain a token up front instead.
    ///
    /// # Errors
    ///
    /// [`SdkError::Config`] listing every missing required field.
    /// [`SdkError::InvalidUrl`] when the profile API base is unusable.
    pub fn new(creds: Credentials) -> Result<Self, SdkError> {
        Self::with_endpoints(creds, Endpoints::default())
    }

    /// Like [`new`](Self::new), against custom endpoints.
    pub fn with_endpoints(creds: Credentials, endpoints: Endpoints) -> Result<Self, SdkError> {
        creds.validate()?;
        endpoints.profile_base()?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("mprofile-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let token = TokenStore::with_token(creds.bearer_token().map(BearerToken::configured));
        let default_scope = ProfileScope::from_credentials(&creds);

        Ok(Self {
            http,
            creds: Arc::new(creds),
            endpoints: Arc::new(endpoints),
            default_scope,
            token,
        })
    }

    /// Validate the credentials and return a ready client.
    ///
    /// Without a configured bearer token, one OAuth exchange is awaited
    /// before returning.
    ///
    /// # Errors
    ///
    /// [`SdkError::Config`] for missing fields, [`SdkError::OAuthExchange`]
    /// when the initial exchange fails.
    pub async fn connect(creds: Credentials) -> Result<Self, SdkError> {
        Self::connect_with_endpoints(creds, Endpoints::default()).await
    }

    /// Like [`connect`](Self::connect), against custom endpoints.
    pub async fn connect_with_endpoints(
        creds: Credentials,
        endpoints: Endpoints,
    ) -> Result<Self, SdkError> {
        let client = Self::with_endpoints(creds, endpoints)?;
        if !client.has_token().await {
            client.refresh_token().await?;
        }
        Ok(client)
    }

    /// [`connect`](Self::connect) with credentials and endpoints read from
    /// the environment (see [`crate::config`]).
    pub async fn from_env() -> Result<Self, SdkError> {
        Self::connect_with_endpoints(config::credentials_from_env(), config::endpoints_from_env())
            .await
    }

    // ------------------------------------------------------------------
    // Token lifecycle
    // ------------------------------------------------------------------

    /// Exchange the OAuth client id / secret for a new bearer token and
    /// store it, replacing any previous token.
    ///
    /// # Errors
    ///
    /// [`SdkError::OAuthExchange`] on any failure: transport error, non-2xx
    /// answer, undecodable body, or a missing `access_token`. Never retried.
    pub async fn refresh_token(&self) -> Result<(), SdkError> {
        let body = TokenRequest {
            client_id: &self.creds.profile_api_client_id,
            client_secret: &self.creds.profile_api_client_secret,
            audience: PROFILE_API_AUDIENCE,
            grant_type: "client_credentials",
        };

        let res = self
            .http
            .post(&self.endpoints.oauth)
            .json(&body)
            .send()
            .await
            .map_err(|e| SdkError::OAuthExchange(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(SdkError::OAuthExchange(format!(
                "token endpoint returned {status}: {text}"
            )));
        }

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| SdkError::OAuthExchange(format!("undecodable token response: {e}")))?;
        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SdkError::OAuthExchange("missing `access_token` in token response".into()))?;

        self.token.replace(BearerToken::exchanged(access_token)).await;
        info!("profile bearer token refreshed");
        Ok(())
    }

    /// `true` once a bearer token is held, either configured or exchanged.
    pub async fn has_token(&self) -> bool {
        self.token.is_present().await
    }

    /// Snapshot of the current bearer token.
    pub async fn token(&self) -> Option<BearerToken> {
        self.token.current().await
    }

    // ------------------------------------------------------------------
    // Identity resolution
    // ------------------------------------------------------------------

    /// Resolve identities to an MPID, keeping the failure cause.
    ///
    /// Failures are logged here; callers need not log them again.
    pub async fn resolve(
        &self,
        identities: &KnownIdentities,
        environment: Environment,
    ) -> Result<MpId, LookupFailure> {
        let outcome = self.search_identity(identities, environment).await;
        if let Err(failure) = &outcome {
            let types: Vec<&str> = identities.types().collect();
            warn!(
                identity_types = ?types,
                environment = %environment,
                error = %failure,
                "identity resolution failed"
            );
        }
        outcome
    }

    /// Resolve identities to an MPID. Any failure yields `None`.
    pub async fn resolve_id(
        &self,
        identities: &KnownIdentities,
        environment: Environment,
    ) -> Option<MpId> {
        self.resolve(identities, environment).await.ok()
    }

    async fn search_identity(
        &self,
        identities: &KnownIdentities,
        environment: Environment,
    ) -> Result<MpId, LookupFailure> {
        let body = IdentitySearchRequest {
            environment,
            known_identities: identities,
        };

        let res = self
            .http
            .post(&self.endpoints.identity_api)
            .basic_auth(&self.creds.identity_input_key, Some(&self.creds.identity_input_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| LookupFailure::Transport(e.to_string()))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupFailure::Unresolved);
        }
        if !status.is_success() {
            return Err(LookupFailure::Status(status.as_u16()));
        }

        let body: IdentitySearchResponse = res
            .json()
            .await
            .map_err(|e| LookupFailure::Malformed(e.to_string()))?;
        body.into_mpid().ok_or(LookupFailure::Unresolved)
    }

    // ------------------------------------------------------------------
    // Profile fetch
    // ------------------------------------------------------------------

    /// Fetch a profile by MPID, keeping the outcome typed.
    ///
    /// A `401` on the first request refreshes the token and retries exactly
    /// once. A `401` on the retry ends the lookup as
    /// [`LookupFailure::Unauthorized`]; no second refresh happens.
    ///
    /// # Errors
    ///
    /// [`SdkError::OAuthExchange`] when the refresh itself fails, and
    /// [`SdkError::InvalidUrl`] when the profile URL cannot be built. Every
    /// other failure is reported in the returned [`ProfileLookup`].
    pub async fn lookup_profile_from_id(
        &self,
        mpid: &MpId,
        overrides: &IdOverrides,
    ) -> Result<ProfileLookup, SdkError> {
        let scope = self.default_scope.merged(overrides);
        let url = self.endpoints.profile_url(&scope, mpid)?;

        debug!(mpid = %mpid, workspace_id = %scope.workspace_id, "fetching profile");
        let outcome = match self.fetch_once(&url).await {
            Attempt::Done(outcome) => outcome,
            Attempt::Unauthorized => {
                debug!(mpid = %mpid, "profile API returned 401, refreshing bearer token");
                self.refresh_token().await?;
                match self.fetch_once(&url).await {
                    Attempt::Done(outcome) => outcome,
                    Attempt::Unauthorized => ProfileLookup::Failed(LookupFailure::Unauthorized),
                }
            }
        };

        match &outcome {
            ProfileLookup::Found(_) => debug!(mpid = %mpid, "profile found"),
            ProfileLookup::NotFound => debug!(mpid = %mpid, "no profile for mpid"),
            ProfileLookup::Failed(failure) => {
                warn!(mpid = %mpid, error = %failure, "profile fetch failed");
            }
        }
        Ok(outcome)
    }

    /// Fetch a profile by MPID.
    ///
    /// Returns the empty profile when nothing was found or the request
    /// failed for any reason other than a failed token refresh.
    ///
    /// # Errors
    ///
    /// [`SdkError::OAuthExchange`] when a refresh was needed and failed.
    pub async fn get_profile_from_id(
        &self,
        mpid: &MpId,
        overrides: &IdOverrides,
    ) -> Result<Profile, SdkError> {
        Ok(self.lookup_profile_from_id(mpid, overrides).await?.into_profile())
    }

    async fn fetch_once(&self, url: &Url) -> Attempt {
        let mut req = self.http.get(url.clone());
        if let Some(token) = self.token.current().await {
            req = req.bearer_auth(token.secret());
        }

        let res = match req.send().await {
            Ok(res) => res,
            Err(e) => return Attempt::Done(ProfileLookup::Failed(LookupFailure::Transport(e.to_string()))),
        };

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return Attempt::Unauthorized;
        }
        if status == StatusCode::NOT_FOUND {
            return Attempt::Done(ProfileLookup::NotFound);
        }
        if !status.is_success() {
            return Attempt::Done(ProfileLookup::Failed(LookupFailure::Status(status.as_u16())));
        }

        Attempt::Done(match res.json::<Profile>().await {
            Ok(profile) => ProfileLookup::Found(profile),
            Err(e) => ProfileLookup::Failed(LookupFailure::Malformed(e.to_string())),
        })
    }

    // ------------------------------------------------------------------
    // Full pipeline
    // ------------------------------------------------------------------

    /// Resolve identities, then fetch the profile, keeping the outcome typed.
    ///
    /// When resolution yields nothing the fetch is still attempted with an
    /// empty MPID; unless that somehow finds a profile, the outcome is
    /// [`LookupFailure::Unresolved`]. A failed token refresh becomes
    /// [`LookupFailure::TokenRefresh`].
    pub async fn lookup_profile(
        &self,
        identities: &KnownIdentities,
        overrides: &IdOverrides,
        environment: Environment,
    ) -> ProfileLookup {
        let resolved = self.resolve_id(identities, environment).await;
        let unresolved = resolved.is_none();
        let mpid = resolved.unwrap_or_else(|| {
            warn!("no mpid resolved, fetching profile with an empty id");
            MpId::default()
        });

        match self.lookup_profile_from_id(&mpid, overrides).await {
            Ok(found @ ProfileLookup::Found(_)) => found,
            Ok(_) if unresolved => ProfileLookup::Failed(LookupFailure::Unresolved),
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "error occurred when getting profile");
                if e.is_oauth_exchange() {
                    ProfileLookup::Failed(LookupFailure::TokenRefresh(e.to_string()))
                } else {
                    ProfileLookup::Failed(LookupFailure::Transport(e.to_string()))
                }
            }
        }
    }

    /// Resolve identities, then fetch the profile.
    ///
    /// Never fails: any problem yields the empty profile and a log line.
    pub async fn get_profile(
        &self,
        identities: &KnownIdentities,
        overrides: &IdOverrides,
        environment: Environment,
    ) -> Profile {
        self.lookup_profile(identities, overrides, environment)
            .await
            .into_profile()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The validated credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.creds
    }

    /// The endpoints this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The org / account / workspace used when no override is given.
    pub fn default_scope(&self) -> &ProfileScope {
        &self.default_scope
    }
}

impl std::fmt::Debug for ProfileClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileClient")
            .field("endpoints", &self.endpoints)
            .field("default_scope", &self.default_scope)
            .finish_non_exhaustive()
    }
}
