//! # Token Subcommand
//!
//! Issues and verifies bearer tokens with the same secret and format the
//! API server uses. Intended for development and smoke tests; production
//! tokens come from the registration service.

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Args, Subcommand};

use saathi_api::config::DEFAULT_JWT_SECRET;
use saathi_core::UserId;
use saathi_token::{TokenIssuer, TokenSecret, TokenVerifier};

/// Arguments for the `saathi token` subcommand.
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// HMAC secret. Falls back to the development default when unset.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, global = true)]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Sign a new token for a user.
    Issue {
        /// Value of the `userId` claim.
        #[arg(long)]
        user_id: String,
        /// Lifetime in seconds.
        #[arg(long, default_value_t = 3600, conflicts_with = "no_expiry")]
        ttl_secs: u64,
        /// Omit the `exp` claim entirely.
        #[arg(long)]
        no_expiry: bool,
    },

    /// Verify a token and print its claims as JSON.
    Verify {
        /// The compact JWT, without a scheme prefix.
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

/// Execute the token subcommand.
pub fn run_token(args: &TokenArgs) -> Result<u8> {
    let secret = resolve_secret(args.secret.as_deref())?;
    match &args.command {
        TokenCommand::Issue {
            user_id,
            ttl_secs,
            no_expiry,
        } => {
            let ttl = (!no_expiry).then_some(*ttl_secs);
            println!("{}", issue_token(&secret, user_id, ttl)?);
            Ok(0)
        }
        TokenCommand::Verify { token } => match verify_token(&secret, token) {
            Ok(claims) => {
                println!("{claims}");
                Ok(0)
            }
            Err(e) => {
                eprintln!("FAIL: {e:#}");
                Ok(1)
            }
        },
    }
}

fn resolve_secret(explicit: Option<&str>) -> Result<TokenSecret> {
    let raw = match explicit.filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => {
            tracing::warn!("JWT_SECRET not set; using the development default");
            DEFAULT_JWT_SECRET.to_string()
        }
    };
    TokenSecret::new(raw).context("invalid secret")
}

/// Sign a token for `user_id`, expiring after `ttl_secs` (never if `None`).
pub fn issue_token(secret: &TokenSecret, user_id: &str, ttl_secs: Option<u64>) -> Result<String> {
    let user_id = UserId::new(user_id).context("invalid --user-id")?;
    let ttl = ttl_secs
        .map(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .context("--ttl-secs out of range")
        })
        .transpose()?;
    TokenIssuer::new(secret)
        .issue(&user_id, ttl)
        .context("failed to sign token")
}

/// Verify `token` and render its identity claim as pretty JSON.
pub fn verify_token(secret: &TokenSecret, token: &str) -> Result<String> {
    let claim = TokenVerifier::new(secret)
        .verify(token.trim())
        .context("token rejected")?;
    serde_json::to_string_pretty(&claim).context("failed to render claims")
}
