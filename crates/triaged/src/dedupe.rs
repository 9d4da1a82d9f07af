//! Content signatures and the in-memory duplicate registry.
//!
//! A signature is the SHA-256 of the normalized ticket text, hex encoded.
//! Only the text feeds the hash: extracted fields vary run to run, which
//! would break the same-text-same-signature invariant.
//!
//! The registry maps signature -> first-seen ticket. Entries live for the
//! process lifetime: no eviction, no persistence. The counter resets on
//! restart, so ids are unique within one process only.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use triage_common::DeduplicationResult;

/// Lowercase, trim, collapse every whitespace run (including newlines and
/// tabs) to a single space.
fn normalize_ticket_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the deduplication signature for a ticket.
///
/// Returns the empty string for empty/whitespace-only text, meaning
/// "no signature / not deduplicable". Otherwise a 64-char hex SHA-256
/// of the normalized text. Pure and deterministic.
pub fn build_signature(ticket_text: &str) -> String {
    let normalized = normalize_ticket_text(ticket_text);
    if normalized.is_empty() {
        return String::new();
    }
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// First ticket recorded for a signature. Owned exclusively by the
/// registry; never mutated after insertion.
#[derive(Debug, Clone)]
struct StoredTicket {
    ticket_id: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    entries: HashMap<String, StoredTicket>,
    counter: u64,
}

impl RegistryInner {
    fn next_ticket_id(&mut self) -> String {
        self.counter += 1;
        format!(
            "TKT-{}-{}",
            to_base36_upper(Utc::now().timestamp_millis()),
            self.counter
        )
    }

    fn record(&mut self, signature: &str) -> String {
        if let Some(existing) = self.entries.get(signature) {
            return existing.ticket_id.clone();
        }
        let ticket_id = self.next_ticket_id();
        self.entries.insert(
            signature.to_string(),
            StoredTicket {
                ticket_id: ticket_id.clone(),
                created_at: Utc::now(),
            },
        );
        ticket_id
    }
}

/// In-memory duplicate registry, constructed at bootstrap and injected
/// into the pipeline. The mutex makes check-then-record atomic, so two
/// concurrent submissions of the same text get one ticket id.
#[derive(Debug, Default)]
pub struct DuplicateRegistry {
    inner: Mutex<RegistryInner>,
}

impl DuplicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// First-recorded ticket id for this signature, or None when unseen
    /// or when the signature is empty.
    pub fn find_possible_duplicate(&self, signature: &str) -> Option<String> {
        if signature.is_empty() {
            return None;
        }
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner.entries.get(signature).map(|t| t.ticket_id.clone())
    }

    /// Record a ticket by signature and return its id. Idempotent: an
    /// already-present signature returns the existing id and leaves the
    /// entry untouched.
    pub fn record_ticket(&self, signature: &str) -> String {
        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        inner.record(signature)
    }

    /// The check-then-record sequence under one lock acquisition. Empty
    /// signatures record nothing and carry no id.
    pub fn resolve(&self, signature: &str) -> DeduplicationResult {
        if signature.is_empty() {
            return DeduplicationResult {
                is_possible_duplicate: false,
                related_ticket_id: None,
                current_ticket_id: None,
            };
        }

        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        if let Some(existing) = inner.entries.get(signature) {
            return DeduplicationResult {
                is_possible_duplicate: true,
                related_ticket_id: Some(existing.ticket_id.clone()),
                current_ticket_id: None,
            };
        }

        let ticket_id = inner.record(signature);
        DeduplicationResult {
            is_possible_duplicate: false,
            related_ticket_id: None,
            current_ticket_id: Some(ticket_id),
        }
    }

    /// Number of distinct signatures recorded.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry mutex poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Uppercase base36 rendering of a non-negative timestamp.
fn to_base36_upper(mut value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}
