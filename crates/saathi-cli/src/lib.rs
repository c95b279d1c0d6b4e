//! # saathi-cli — Development CLI for Safar Saathi
//!
//! Provides the `saathi` command-line interface for working against a
//! local or staging deployment of the location API.
//!
//! ## Subcommands
//!
//! - `saathi token issue`: Sign a token in the registration service's format.
//! - `saathi token verify`: Verify a token and print its claims.
//! - `saathi config check`: Load the server configuration and print it, redacted.
//!
//! ```bash
//! saathi token issue --user-id u1 --ttl-secs 3600
//! saathi token verify eyJhbGciOi...
//! SAATHI_ENV=production saathi config check
//! ```

pub mod config;
pub mod token;
