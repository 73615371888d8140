//! Subcommand handlers.

use anyhow::{Context, Result, bail};
use mprofile_sdk::{Endpoints, ProfileClient, ProfileLookup, config};
use tracing::info;

use crate::args::{FetchArgs, IdentityArgs, LookupArgs};

/// Build a ready client: credentials from the environment, first token
/// exchanged up front when none is configured.
async fn connect(endpoints: Endpoints) -> Result<ProfileClient> {
    ProfileClient::connect_with_endpoints(config::credentials_from_env(), endpoints)
        .await
        .context("failed to initialise profile client")
}

/// Print a lookup outcome; a missing profile is an error exit.
fn report(lookup: ProfileLookup) -> Result<()> {
    match lookup {
        ProfileLookup::Found(profile) => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(())
        }
        ProfileLookup::NotFound => bail!("no profile found"),
        ProfileLookup::Failed(failure) => bail!("profile lookup failed: {failure}"),
    }
}

pub async fn lookup(endpoints: Endpoints, args: LookupArgs) -> Result<()> {
    let client = connect(endpoints).await?;
    let lookup = client
        .lookup_profile(
            &args.identity.known_identities(),
            &args.scope.overrides(),
            args.identity.environment,
        )
        .await;
    report(lookup)
}

pub async fn resolve(endpoints: Endpoints, args: IdentityArgs) -> Result<()> {
    // Identity search only needs the basic-auth pair; skip the token exchange.
    let client = ProfileClient::with_endpoints(config::credentials_from_env(), endpoints)?;
    let mpid = client
        .resolve(&args.known_identities(), args.environment)
        .await?;
    println!("{mpid}");
    Ok(())
}

pub async fn fetch(endpoints: Endpoints, args: FetchArgs) -> Result<()> {
    let client = connect(endpoints).await?;
    let lookup = client
        .lookup_profile_from_id(&args.mpid, &args.scope.overrides())
        .await?;
    report(lookup)
}

pub async fn token(endpoints: Endpoints) -> Result<()> {
    let client = ProfileClient::with_endpoints(config::credentials_from_env(), endpoints)?;
    client.refresh_token().await?;
    if let Some(token) = client.token().await {
        info!(obtained_at = %token.obtained_at(), "bearer token obtained");
    }
    println!("ok");
    Ok(())
}
