//! Triage Common - Shared types and schemas for the ticket triage service
//!
//! Everything the daemon and the CLI exchange lives here: the closed
//! category/severity enumerations, the wire schemas of the HTTP API,
//! the LLM chat-completion shapes, and the service configuration.

pub mod categories;
pub mod config;
pub mod llm;
pub mod schemas;

pub use categories::*;
pub use config::*;
pub use llm::*;
pub use schemas::*;
