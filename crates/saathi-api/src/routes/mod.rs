//! # API Route Modules
//!
//! - `location`: authenticated location upload.
//!
//! Health probes, metrics and the OpenAPI document are wired directly in
//! [`crate::app`].

pub mod location;
