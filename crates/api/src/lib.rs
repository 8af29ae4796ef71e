//! HTTP API layer for mingle.
//!
//! This crate provides the REST API surface:
//!
//! - **Endpoints**: Social-graph mutations, feed/profile reads, and the
//!   identity-provider webhook receiver
//! - **Extractors**: The authenticated external identity
//! - **Middleware**: Session-token verification
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod auth;
pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use auth::TokenVerifier;
pub use endpoints::router;
