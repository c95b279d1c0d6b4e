//! # Middleware
//!
//! Request-counting middleware. Authentication lives in [`crate::auth`];
//! tracing, CORS and timeouts come from `tower-http` and are wired in
//! [`crate::app`].

pub mod metrics;
