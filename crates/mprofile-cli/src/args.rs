//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use mprofile_models::{Environment, IdOverrides, KnownIdentities, ModelError, MpId};
use mprofile_sdk::{config, Endpoints};

#[derive(Parser, Debug)]
#[command(name = "mprofile")]
#[command(about = "Resolve identities and fetch mParticle user profiles")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Root URL serving all three APIs (e.g. a local mock-mparticle).
    /// Overrides the MP_*_URL variables.
    #[arg(long, env = "MP_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Endpoints from `--base-url`, or from the environment.
    pub fn endpoints(&self) -> Endpoints {
        match &self.base_url {
            Some(base) => Endpoints::rooted_at(base),
            None => config::endpoints_from_env(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve identities, then fetch the matching profile
    Lookup(LookupArgs),
    /// Resolve identities to an MPID
    Resolve(IdentityArgs),
    /// Fetch a profile by MPID
    Fetch(FetchArgs),
    /// Check the profile API client id / secret with one OAuth exchange
    Token,
}

#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Known identity as type=value (repeatable), e.g. customerid=123
    #[arg(short, long = "identity", value_parser = parse_identity, required = true)]
    pub identities: Vec<(String, String)>,

    /// development or production
    #[arg(short, long, value_parser = Environment::parse_tag, default_value_t = Environment::Development)]
    pub environment: Environment,
}

impl IdentityArgs {
    pub fn known_identities(&self) -> KnownIdentities {
        self.identities.iter().cloned().collect()
    }
}

#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Organization id override
    #[arg(long)]
    pub org_id: Option<String>,

    /// Account id override
    #[arg(long)]
    pub acct_id: Option<String>,

    /// Workspace id override
    #[arg(long)]
    pub workspace_id: Option<String>,
}

impl ScopeArgs {
    pub fn overrides(&self) -> IdOverrides {
        IdOverrides {
            org_id: self.org_id.clone(),
            acct_id: self.acct_id.clone(),
            workspace_id: self.workspace_id.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// The MPID to fetch
    pub mpid: MpId,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

fn parse_identity(arg: &str) -> Result<(String, String), ModelError> {
    KnownIdentities::parse_pair(arg)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_parses_identities_and_scope() {
        let cli = Cli::try_parse_from([
            "mprofile",
            "lookup",
            "-i",
            "customerid=123",
            "--identity",
            "email=a@example.com",
            "--environment",
            "production",
            "--workspace-id",
            "9",
        ])
        .unwrap();

        let Command::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        let ids = args.identity.known_identities();
        assert_eq!(ids.get("customerid"), Some("123"));
        assert_eq!(ids.get("email"), Some("a@example.com"));
        assert_eq!(args.identity.environment, Environment::Production);
        assert_eq!(args.scope.overrides(), IdOverrides::none().workspace_id("9"));
    }

    #[test]
    fn environment_defaults_to_development() {
        let cli = Cli::try_parse_from(["mprofile", "resolve", "-i", "customerid=1"]).unwrap();
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.environment, Environment::Development);
    }

    #[test]
    fn malformed_identity_is_rejected() {
        assert!(Cli::try_parse_from(["mprofile", "resolve", "-i", "customerid"]).is_err());
    }

    #[test]
    fn identity_is_required() {
        assert!(Cli::try_parse_from(["mprofile", "lookup"]).is_err());
    }

    #[test]
    fn fetch_takes_mpid() {
        let cli = Cli::try_parse_from(["mprofile", "fetch", "456", "--org-id", "7"]).unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.mpid, MpId::new("456"));
        assert_eq!(args.scope.overrides().org_id.as_deref(), Some("7"));
    }

    #[test]
    fn base_url_roots_all_endpoints() {
        let cli =
            Cli::try_parse_from(["mprofile", "--base-url", "http://localhost:4100", "token"]).unwrap();
        assert_eq!(cli.endpoints(), Endpoints::rooted_at("http://localhost:4100"));
    }
}
