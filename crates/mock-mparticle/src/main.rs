//! Mock mParticle: serves the three vendor endpoints locally.
//!
//! * `POST /oauth/token`: client-credentials grant for `mock-client` /
//!   `mock-secret`. Every grant invalidates the previous token.
//! * `POST /identity/v1/search`: basic auth `mock-key:mock-secret`;
//!   resolves a few fixed identities to MPID `456`.
//! * `GET /userprofile/v1/{org}/{acct}/{workspace}/{mpid}`: requires the
//!   most recently issued token; MPID `456` has a profile.
//! * `POST /mock/expire`: drop the current token, so the next profile
//!   fetch gets a `401`.
//!
//! Point the CLI at it with `mprofile --base-url http://localhost:4100 …`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::info;

const CLIENT_ID: &str = "mock-client";
const CLIENT_SECRET: &str = "mock-secret";
const IDENTITY_KEY: &str = "mock-key";
const IDENTITY_SECRET: &str = "mock-secret";
const KNOWN_MPID: &str = "456";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// The only bearer token currently accepted.
#[derive(Default)]
struct MockState {
    current_token: RwLock<Option<String>>,
}

type SharedState = Arc<MockState>;

fn app(state: SharedState) -> Router {
    Router::new()
        .route("/oauth/token", post(token))
        .route("/identity/v1/search", post(identity_search))
        .route(
            "/userprofile/v1/{org}/{acct}/{workspace}/{mpid}",
            axum::routing::get(profile),
        )
        .route("/mock/expire", post(expire))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("MOCK_MPARTICLE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(4100);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    info!(address = %addr, "mock mParticle listening");
    axum::serve(listener, app(SharedState::default()))
        .await
        .expect("server error");
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TokenRequest {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    audience: String,
    grant_type: String,
}

async fn token(State(state): State<SharedState>, Json(req): Json<TokenRequest>) -> Response {
    if req.grant_type != "client_credentials"
        || req.client_id != CLIENT_ID
        || req.client_secret != CLIENT_SECRET
    {
        info!(client_id = %req.client_id, "token request rejected");
        return error(StatusCode::UNAUTHORIZED, "access_denied");
    }

    let access_token = format!("mock-token-{}", uuid::Uuid::new_v4());
    *state.current_token.write().await = Some(access_token.clone());
    info!(audience = %req.audience, "token issued");

    Json(json!({
        "access_token": access_token,
        "expires_in": 28800,
        "token_type": "Bearer",
    }))
    .into_response()
}

#[derive(Deserialize)]
struct IdentitySearchRequest {
    #[serde(default)]
    environment: String,
    #[serde(default)]
    known_identities: Map<String, Value>,
}

async fn identity_search(headers: HeaderMap, Json(req): Json<IdentitySearchRequest>) -> Response {
    match basic_credentials(&headers) {
        Some((key, secret)) if key == IDENTITY_KEY && secret == IDENTITY_SECRET => {}
        _ => return error(StatusCode::UNAUTHORIZED, "invalid identity credentials"),
    }

    let matched = req.known_identities.iter().any(|(ty, value)| {
        matches!(
            (ty.as_str(), value.as_str()),
            ("customerid", Some("123")) | ("email", Some("pilot@example.com"))
        )
    });
    info!(environment = %req.environment, matched, "identity search");

    if matched {
        Json(json!({ "mpid": KNOWN_MPID })).into_response()
    } else {
        error(StatusCode::NOT_FOUND, "no matching user")
    }
}

async fn profile(
    State(state): State<SharedState>,
    Path((org, acct, workspace, mpid)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let current = state.current_token.read().await.clone();
    let presented = bearer_token(&headers);
    if current.is_none() || presented != current {
        return error(StatusCode::UNAUTHORIZED, "invalid or expired token");
    }

    if mpid != KNOWN_MPID {
        return error(StatusCode::NOT_FOUND, "profile not found");
    }

    Json(json!({
        "mpid": mpid,
        "org_id": org,
        "acct_id": acct,
        "workspace_id": workspace,
        "user_identities": [
            { "type": "customer_id", "value": "123" },
            { "type": "email", "value": "pilot@example.com" },
        ],
        "user_attributes": { "tier": "gold", "$country": "FR" },
        "audience_memberships": [ { "audience_id": 1001, "audience_name": "Frequent flyers" } ],
        "attribution": [],
    }))
    .into_response()
}

async fn expire(State(state): State<SharedState>) -> StatusCode {
    *state.current_token.write().await = None;
    info!("current token expired");
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let decoded = STANDARD.decode(value.strip_prefix("Basic ")?).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (key, secret) = decoded.split_once(':')?;
    Some((key.to_string(), secret.to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(String::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum_test::TestServer;

    use super::*;

    fn server() -> TestServer {
        TestServer::new(app(SharedState::default())).unwrap()
    }

    fn basic(key: &str, secret: &str) -> HeaderValue {
        let encoded = STANDARD.encode(format!("{key}:{secret}"));
        HeaderValue::from_str(&format!("Basic {encoded}")).unwrap()
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    async fn issue_token(server: &TestServer) -> String {
        let res = server
            .post("/oauth/token")
            .json(&json!({
                "client_id": CLIENT_ID,
                "client_secret": CLIENT_SECRET,
                "audience": "https://api.mparticle.com",
                "grant_type": "client_credentials",
            }))
            .await;
        res.assert_status_ok();
        res.json::<Value>()["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn token_rejects_wrong_secret() {
        let res = server()
            .post("/oauth/token")
            .json(&json!({
                "client_id": CLIENT_ID,
                "client_secret": "nope",
                "grant_type": "client_credentials",
            }))
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn identity_search_resolves_known_customer() {
        let res = server()
            .post("/identity/v1/search")
            .add_header(header::AUTHORIZATION, basic(IDENTITY_KEY, IDENTITY_SECRET))
            .json(&json!({
                "environment": "production",
                "known_identities": { "customerid": "123" },
            }))
            .await;
        res.assert_status_ok();
        assert_eq!(res.json::<Value>()["mpid"], KNOWN_MPID);
    }

    #[tokio::test]
    async fn identity_search_requires_basic_auth() {
        let res = server()
            .post("/identity/v1/search")
            .add_header(header::AUTHORIZATION, basic(IDENTITY_KEY, "wrong"))
            .json(&json!({ "environment": "development", "known_identities": {} }))
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn identity_search_unknown_is_not_found() {
        let res = server()
            .post("/identity/v1/search")
            .add_header(header::AUTHORIZATION, basic(IDENTITY_KEY, IDENTITY_SECRET))
            .json(&json!({
                "environment": "development",
                "known_identities": { "customerid": "999" },
            }))
            .await;
        res.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn profile_requires_latest_token() {
        let server = server();
        let first = issue_token(&server).await;
        let second = issue_token(&server).await;
        assert_ne!(first, second);

        server
            .get("/userprofile/v1/1/2/3/456")
            .add_header(header::AUTHORIZATION, bearer(&first))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let res = server
            .get("/userprofile/v1/1/2/3/456")
            .add_header(header::AUTHORIZATION, bearer(&second))
            .await;
        res.assert_status_ok();
        let body = res.json::<Value>();
        assert_eq!(body["user_attributes"]["tier"], "gold");
        assert_eq!(body["workspace_id"], "3");
    }

    #[tokio::test]
    async fn profile_unknown_mpid_is_not_found() {
        let server = server();
        let token = issue_token(&server).await;
        server
            .get("/userprofile/v1/1/2/3/789")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn expire_invalidates_token() {
        let server = server();
        let token = issue_token(&server).await;
        server.post("/mock/expire").await.assert_status(StatusCode::NO_CONTENT);
        server
            .get("/userprofile/v1/1/2/3/456")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn basic_credentials_parse() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, basic("k", "s:with:colons"));
        assert_eq!(
            basic_credentials(&headers),
            Some(("k".to_string(), "s:with:colons".to_string()))
        );
    }
}
