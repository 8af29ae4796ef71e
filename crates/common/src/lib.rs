//! Common utilities and shared types for mingle.
//!
//! This crate provides foundational components used across all mingle crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Webhook signatures**: Verification of identity-provider webhook
//!   signatures via [`webhook_signature`]
//!
//! # Example
//!
//! ```no_run
//! use mingle_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod webhook_signature;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use webhook_signature::{WebhookVerifier, sign_payload};
