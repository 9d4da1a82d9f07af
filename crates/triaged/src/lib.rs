//! Triage Daemon - support ticket intake pipeline
//!
//! Classifies tickets, extracts structured fields, detects duplicate
//! submissions by content signature, proposes reply drafts, and routes
//! tickets to handling teams. Served over a localhost HTTP API.

pub mod classify;
pub mod dedupe;
pub mod draft;
pub mod extract;
pub mod llm_client;
pub mod pipeline;
pub mod router;
pub mod routes;
pub mod server;
