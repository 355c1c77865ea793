//! Drives a [`crate::tokenizer::Tokenizer`] over a corpus, issuing one
//! `search` per window and decorating hits via an optional side-table.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{instrument, warn};

use crate::decoration::DecorationStore;
use crate::error::{MatchError, Result};
use crate::matcher::{ApproximateMatcher, SearchOptions};
use crate::tokenizer::{Span, Tokenizer};

/// One corpus item to run through the pipeline.
pub enum CorpusSource {
    /// A single file, or a directory walked non-recursively (one source
    /// per regular file it directly contains).
    Path(PathBuf),
    /// Programmatic `(source_id, text)` pairs, bypassing the filesystem
    /// entirely.
    Pairs(Vec<(String, String)>),
}

/// One match produced for a single window span.
#[derive(Debug, Clone)]
pub struct Match {
    pub source_id: String,
    pub begin: usize,
    pub end: usize,
    pub ngram: String,
    pub candidate: String,
    pub similarity: f64,
    pub decoration: Option<serde_json::Value>,
}

/// Resolve a [`CorpusSource`] into a list of `(source_id, text-or-error)`
/// pairs. A directory is walked non-recursively: subdirectories are
/// skipped, one source per regular file it directly contains. Every
/// failure to read a path is captured per source rather than aborting
/// resolution, consistent with the pipeline's batch-survives-per-source-
/// failure contract.
fn resolve_source(source: CorpusSource) -> Vec<(String, Result<String>)> {
    match source {
        CorpusSource::Pairs(pairs) => pairs.into_iter().map(|(id, text)| (id, Ok(text))).collect(),
        CorpusSource::Path(path) => resolve_path(&path),
    }
}

fn resolve_path(path: &Path) -> Vec<(String, Result<String>)> {
    if path.is_dir() {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![(
                    path.display().to_string(),
                    Err(MatchError::BackendUnavailable(format!("reading directory {path:?}: {e}"))),
                )]
            }
        };
        let mut out = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    out.push((
                        path.display().to_string(),
                        Err(MatchError::BackendUnavailable(format!("reading directory entry: {e}"))),
                    ));
                    continue;
                }
            };
            let entry_path = entry.path();
            if entry_path.is_file() {
                let id = entry_path.display().to_string();
                let read = fs::read_to_string(&entry_path)
                    .map_err(|e| MatchError::BackendUnavailable(format!("reading {entry_path:?}: {e}")));
                out.push((id, read));
            }
        }
        out
    } else {
        let id = path.display().to_string();
        let read = fs::read_to_string(path)
            .map_err(|e| MatchError::BackendUnavailable(format!("reading {path:?}: {e}")));
        vec![(id, read)]
    }
}

/// Drives `Tokenizer` -> window -> `ApproximateMatcher::search` -> decorate
/// -> per-source result collection over a corpus.
pub struct MatchPipeline<'a, T: Tokenizer, D: DecorationStore> {
    matcher: &'a ApproximateMatcher,
    tokenizer: T,
    decoration: D,
    search_opts: SearchOptions,
}

impl<'a, T: Tokenizer, D: DecorationStore> MatchPipeline<'a, T, D> {
    pub fn new(matcher: &'a ApproximateMatcher, tokenizer: T, decoration: D) -> Self {
        MatchPipeline {
            matcher,
            tokenizer,
            decoration,
            search_opts: SearchOptions::default(),
        }
    }

    pub fn with_search_options(mut self, opts: SearchOptions) -> Self {
        self.search_opts = opts;
        self
    }

    /// Run the pipeline over every source in `source`, returning a
    /// per-source result map. A source that fails (e.g. a file that
    /// cannot be read, or a backend error raised from a `search` call
    /// within it) is captured as an `Err` entry rather than aborting the
    /// whole batch; only construction-time configuration errors are
    /// fatal to the call.
    #[instrument(skip(self, source))]
    pub fn run(&self, source: CorpusSource) -> Result<HashMap<String, Result<Vec<Match>>>> {
        let pairs = resolve_source(source);
        let mut results = HashMap::with_capacity(pairs.len());
        for (source_id, text) in pairs {
            let outcome = text.and_then(|text| self.run_one(&source_id, &text));
            if let Err(err) = &outcome {
                warn!(source_id, error = %err, "source failed, continuing batch");
            }
            results.insert(source_id, outcome);
        }
        Ok(results)
    }

    fn run_one(&self, source_id: &str, text: &str) -> Result<Vec<Match>> {
        let spans: Vec<Span> = self.tokenizer.tokenize(text);
        let mut matches = Vec::new();
        for span in spans {
            let hits = self.matcher.search(&span.text, self.search_opts)?;
            for (candidate, similarity) in hits {
                let Some(decoration) = self.decoration.get(&candidate) else {
                    continue;
                };
                matches.push(Match {
                    source_id: source_id.to_string(),
                    begin: span.begin,
                    end: span.end,
                    ngram: span.text.clone(),
                    candidate,
                    similarity,
                    decoration: Some(decoration),
                });
            }
        }
        Ok(matches)
    }
}

#[cfg(feature = "rayon")]
impl<'a, T: Tokenizer + Sync, D: DecorationStore + Sync> MatchPipeline<'a, T, D> {
    /// Like [`Self::run`], but resolves corpus sources and fans them out
    /// across a rayon thread pool, one `ApproximateMatcher::search` chain
    /// per source running concurrently against the shared, read-only
    /// index.
    pub fn run_parallel(&self, source: CorpusSource) -> Result<HashMap<String, Result<Vec<Match>>>> {
        use rayon::prelude::*;

        let pairs = resolve_source(source);
        let results: Vec<(String, Result<Vec<Match>>)> = pairs
            .into_par_iter()
            .map(|(source_id, text)| {
                let outcome = text.and_then(|text| self.run_one(&source_id, &text));
                (source_id, outcome)
            })
            .collect();
        Ok(results.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{MemoryDecorationStore, NullDecorationStore};
    use crate::feature::FeatureExtractor;
    use crate::index::MemoryIndexStore;
    use crate::similarity::Similarity;
    use crate::tokenizer::{Case, TokenizerConfig, WhitespaceTokenizer};

    fn build_matcher() -> ApproximateMatcher {
        let mut m = ApproximateMatcher::new(
            Box::new(MemoryIndexStore::new()),
            FeatureExtractor::default(),
            Similarity::Jaccard,
        );
        for s in ["quick", "brown", "fox", "quick brown", "brown fox"] {
            m.insert(s).unwrap();
        }
        m
    }

    #[test]
    fn pipeline_span_fidelity() {
        let matcher = build_matcher();
        let cfg = TokenizerConfig {
            window: 2,
            min_token_length: 3,
            case: Case::Lower,
            ..TokenizerConfig::default()
        };
        let tokenizer = WhitespaceTokenizer::new(cfg);
        let pipeline = MatchPipeline::new(&matcher, tokenizer, NullDecorationStore)
            .with_search_options(SearchOptions { alpha: 1.0, ..Default::default() });

        let corpus = "the quick brown fox".to_string();
        let results = pipeline
            .run(CorpusSource::Pairs(vec![("doc1".to_string(), corpus.clone())]))
            .unwrap();
        let matches = results.get("doc1").unwrap().as_ref().unwrap();
        assert!(!matches.is_empty());
        for m in matches {
            let original = &corpus[m.begin..m.end];
            assert_eq!(original.to_lowercase(), m.ngram);
        }
    }

    #[test]
    fn decoration_suppression_drops_undecorated_hits() {
        let matcher = build_matcher();
        let tokenizer = WhitespaceTokenizer::new(TokenizerConfig {
            case: Case::Lower,
            ..TokenizerConfig::default()
        });
        let mut decoration = MemoryDecorationStore::new();
        decoration.insert("fox", serde_json::json!({"ok": true}));

        let pipeline = MatchPipeline::new(&matcher, tokenizer, decoration)
            .with_search_options(SearchOptions { alpha: 1.0, ..Default::default() });
        let results = pipeline
            .run(CorpusSource::Pairs(vec![("doc1".to_string(), "fox brown".to_string())]))
            .unwrap();
        let matches = results.get("doc1").unwrap().as_ref().unwrap();
        assert!(matches.iter().all(|m| m.candidate == "fox"));
        assert!(!matches.is_empty());
    }

    #[test]
    fn missing_file_is_captured_as_per_source_error() {
        let matcher = build_matcher();
        let tokenizer = WhitespaceTokenizer::default();
        let pipeline = MatchPipeline::new(&matcher, tokenizer, NullDecorationStore);
        let results = pipeline
            .run(CorpusSource::Path(PathBuf::from("/nonexistent/path/xyz")))
            .unwrap();
        assert_eq!(results.len(), 1);
        let outcome = results.values().next().unwrap();
        assert!(matches!(outcome, Err(MatchError::BackendUnavailable(_))));
    }
}
