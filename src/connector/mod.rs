//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion clients (Groq's OpenAI-compatible API, plus a mock)
//! - Session storage (in-memory)
//! - CLI routing and the HTTP chat page

pub mod adapter;
pub mod api;
pub mod web;

pub use adapter::*;
pub use api::*;
pub use web::*;
