//! # Domain Layer
//!
//! Chat messages, transcripts, sessions and the error taxonomy.
//! This layer is independent of HTTP frameworks and provider clients.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
