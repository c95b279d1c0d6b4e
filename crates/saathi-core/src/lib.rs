#![deny(missing_docs)]

//! # saathi-core — Foundational Types for Safar Saathi
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`UserId`] is validated
//!    once at construction and can never be empty afterwards.
//!
//! 2. **Parse, don't inspect.** Upload bodies arrive as untyped JSON. They
//!    are converted into a [`LocationReport`] by explicit schema validation
//!    before any field is read; handlers never touch raw JSON fields.
//!
//! 3. **[`ValidationError`] hierarchy.** Structured errors with `thiserror`:
//!    no `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod location;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use identity::UserId;
pub use location::{LocationRecord, LocationReport, NewLocation};
pub use temporal::parse_client_timestamp;
