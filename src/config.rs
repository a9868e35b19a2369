use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
}

/// What the binary should do after configuration is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Migrate,
    IssueToken(String),
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Wine cellar inventory API")]
pub struct Args {
    /// Host to bind to (overrides CELLAR_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CELLAR_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides CELLAR_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Secret shared with the identity service (overrides CELLAR_JWT_SECRET)
    #[arg(long)]
    pub jwt_secret: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,

    /// Print a 24h token for USER and exit
    #[arg(long, value_name = "USER", conflicts_with = "migrate")]
    pub issue_token: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the command to run.
    pub fn from_env_and_args() -> Result<(Self, Command)> {
        Self::resolve(Args::parse(), |key| env::var(key).ok())
    }

    /// Merge parsed args over values from `lookup` (the process environment in production).
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<(Self, Command)> {
        // --- Environment fallback ---
        let env_host = lookup("CELLAR_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = match lookup("CELLAR_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing CELLAR_PORT value `{}`", value))?,
            None => 3000,
        };
        let env_db =
            lookup("CELLAR_DATABASE_URL").unwrap_or_else(|| "sqlite://./data/cellar.db".into());

        let jwt_secret = match args.jwt_secret.or_else(|| lookup("CELLAR_JWT_SECRET")) {
            Some(secret) if !secret.is_empty() => secret,
            _ => bail!("a JWT secret is required (set CELLAR_JWT_SECRET or --jwt-secret)"),
        };

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            jwt_secret,
        };

        let command = match (args.migrate, args.issue_token) {
            (true, _) => Command::Migrate,
            (false, Some(user)) => Command::IssueToken(user),
            (false, None) => Command::Serve,
        };

        Ok((cfg, command))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
