use serde::{Deserialize, Serialize};

use super::IndexStore;
use crate::error::Result;

/// One posting document as stored by the external search engine:
/// `{"term": s, "sz": l, "ng": f}`, matching the reference's Elasticsearch
/// simstring mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingDoc {
    pub term: String,
    pub sz: u32,
    pub ng: String,
}

/// The wire contract an `HttpIndexStore` talks to: a minimal
/// document-store HTTP API shaped like Elasticsearch's `_search`/`_doc`
/// endpoints. A full production search engine is an external
/// collaborator (spec §1); this trait is the seam a caller implements
/// against their actual deployment (Elasticsearch, OpenSearch, or a
/// bespoke service) while `HttpIndexStore` supplies the CPMerge-facing
/// `IndexStore` semantics on top.
pub trait HttpIndexBackend: Send + Sync {
    /// Fetch postings where `sz == l AND ng == f`.
    fn query(&self, l: u32, f: &str) -> Result<Vec<PostingDoc>>;

    /// Index one posting document, avoiding duplicates either by a
    /// pre-insert existence check or by construction (idempotent write).
    fn index(&mut self, doc: &PostingDoc) -> Result<()>;

    /// Count of distinct terms indexed.
    fn count_terms(&self) -> Result<usize>;

    /// Delete the whole index.
    fn delete_all(&mut self) -> Result<()>;
}

/// `IndexStore` backed by an external document-store search engine,
/// reached over HTTP via a blocking client (matching the single-threaded-
/// per-query concurrency model — suspension only happens inside this
/// call, never across it).
pub struct HttpIndexStore<B: HttpIndexBackend> {
    backend: B,
    global_max_features: Option<u32>,
}

impl<B: HttpIndexBackend> HttpIndexStore<B> {
    pub fn new(backend: B) -> Self {
        HttpIndexStore {
            backend,
            global_max_features: None,
        }
    }
}

impl<B: HttpIndexBackend> IndexStore for HttpIndexStore<B> {
    fn get_strings(&self, l: u32, f: &str) -> Result<Vec<String>> {
        Ok(self
            .backend
            .query(l, f)?
            .into_iter()
            .map(|doc| doc.term)
            .collect())
    }

    fn insert(&mut self, s: &str, l: u32, f: &str) -> Result<()> {
        self.backend.index(&PostingDoc {
            term: s.to_string(),
            sz: l,
            ng: f.to_string(),
        })
    }

    fn len(&self) -> Result<usize> {
        self.backend.count_terms()
    }

    fn clear(&mut self) -> Result<()> {
        self.backend.delete_all()
    }

    fn commit(&mut self) -> Result<()> {
        // Documents are indexed eagerly; nothing to flush.
        Ok(())
    }

    fn set_global_max_features(&mut self, value: u32) -> Result<()> {
        self.global_max_features = Some(value);
        Ok(())
    }

    fn global_max_features(&self) -> Result<Option<u32>> {
        Ok(self.global_max_features)
    }
}

/// Minimal [`HttpIndexBackend`] that talks to a REST endpoint exposing
/// `GET {base_url}/_search?sz=..&ng=..`, `PUT {base_url}/_doc`, `GET
/// {base_url}/_count`, and `POST {base_url}/_delete_all`, mirroring the
/// reference's Elasticsearch-shaped document store closely enough to sit
/// in front of a real search engine's query layer without vendoring one.
pub struct RestIndexBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl RestIndexBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        RestIndexBackend {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl HttpIndexBackend for RestIndexBackend {
    fn query(&self, l: u32, f: &str) -> Result<Vec<PostingDoc>> {
        let resp = self
            .client
            .get(format!("{}/_search", self.base_url))
            .query(&[("sz", l.to_string()), ("ng", f.to_string())])
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    fn index(&mut self, doc: &PostingDoc) -> Result<()> {
        self.client
            .put(format!("{}/_doc", self.base_url))
            .json(doc)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn count_terms(&self) -> Result<usize> {
        let resp = self
            .client
            .get(format!("{}/_count", self.base_url))
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    fn delete_all(&mut self) -> Result<()> {
        self.client
            .post(format!("{}/_delete_all", self.base_url))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) struct MockHttpBackend {
    docs: Vec<PostingDoc>,
}

#[cfg(test)]
impl MockHttpBackend {
    pub(crate) fn new() -> Self {
        MockHttpBackend { docs: Vec::new() }
    }
}

#[cfg(test)]
impl HttpIndexBackend for MockHttpBackend {
    fn query(&self, l: u32, f: &str) -> Result<Vec<PostingDoc>> {
        Ok(self.docs.iter().filter(|d| d.sz == l && d.ng == f).cloned().collect())
    }

    fn index(&mut self, doc: &PostingDoc) -> Result<()> {
        if !self.docs.iter().any(|d| d.term == doc.term && d.sz == doc.sz && d.ng == doc.ng) {
            self.docs.push(doc.clone());
        }
        Ok(())
    }

    fn count_terms(&self) -> Result<usize> {
        let distinct: std::collections::HashSet<&str> = self.docs.iter().map(|d| d.term.as_str()).collect();
        Ok(distinct.len())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.docs.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_backend_roundtrips_postings() {
        let mut store = HttpIndexStore::new(MockHttpBackend::new());
        store.insert("hello", 3, "hel\u{0}0").unwrap();
        store.insert("hello", 3, "hel\u{0}0").unwrap();
        assert_eq!(store.get_strings(3, "hel\u{0}0").unwrap(), vec!["hello"]);
        assert_eq!(store.len().unwrap(), 1);
    }
}
