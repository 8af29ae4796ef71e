//! Core business logic for mingle.

pub mod services;

pub use services::*;
