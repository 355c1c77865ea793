//! Optional side-table lookup applied to each candidate string a match
//! pipeline run produces. A real concept database (e.g. a biomedical
//! vocabulary's metadata) is an external collaborator; this crate only
//! defines the seam and a minimal in-memory implementation for tests and
//! demos.

use std::collections::HashMap;

/// Arbitrary decoration payload attached to a matched dictionary entry.
/// Kept as a JSON value so a caller's schema doesn't leak into this
/// crate's types.
pub type Payload = serde_json::Value;

/// Looks up decoration for a candidate string. A candidate absent from
/// the store causes the pipeline to drop that hit (§4.6: "hit-drop-on-
/// absent"), not to fail.
pub trait DecorationStore: Send + Sync {
    fn get(&self, candidate: &str) -> Option<Payload>;
}

/// In-memory `DecorationStore`, suitable for tests and small demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryDecorationStore {
    entries: HashMap<String, Payload>,
}

impl MemoryDecorationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, candidate: impl Into<String>, payload: Payload) {
        self.entries.insert(candidate.into(), payload);
    }
}

impl DecorationStore for MemoryDecorationStore {
    fn get(&self, candidate: &str) -> Option<Payload> {
        self.entries.get(candidate).cloned()
    }
}

/// A `DecorationStore` that keeps every candidate, decorating with
/// `null`. Used when a pipeline run has no side-table configured but
/// callers still want every match surfaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDecorationStore;

impl DecorationStore for NullDecorationStore {
    fn get(&self, _candidate: &str) -> Option<Payload> {
        Some(Payload::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_candidate_is_none() {
        let store = MemoryDecorationStore::new();
        assert_eq!(store.get("acetate"), None);
    }

    #[test]
    fn present_candidate_returns_payload() {
        let mut store = MemoryDecorationStore::new();
        store.insert("acetate", serde_json::json!({"cui": "C0001117"}));
        assert_eq!(store.get("acetate"), Some(serde_json::json!({"cui": "C0001117"})));
    }

    #[test]
    fn null_store_keeps_everything() {
        let store = NullDecorationStore;
        assert_eq!(store.get("anything"), Some(Payload::Null));
    }
}
