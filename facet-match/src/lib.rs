//! An approximate-string-matching engine for large dictionaries of short
//! strings, built around the CPMerge overlap-join (Okazaki & Tsujii,
//! 2010). Given a corpus of free-form text, [`pipeline::MatchPipeline`]
//! returns, for every window of tokens, the dictionary entries whose
//! n-gram feature sets are similar to the window under a chosen
//! set-similarity measure and threshold, ranked by similarity.
//!
//! The pieces:
//! - [`feature`]: n-gram feature extraction with duplicate disambiguation.
//! - [`similarity`]: the set-similarity measures and their CPMerge bounds.
//! - [`index`]: the pluggable posting-list storage backends.
//! - [`matcher`]: the CPMerge engine itself.
//! - [`tokenizer`]: corpus segmentation into `(begin, end, text)` spans.
//! - [`pipeline`]: drives a tokenizer and matcher over a corpus.
//! - [`decoration`]: the optional per-candidate side-table lookup.
//! - [`config`]: the typed, serde-deserializable configuration surface.

pub mod config;
pub mod decoration;
pub mod error;
pub mod feature;
pub mod index;
pub mod matcher;
pub mod pipeline;
pub mod similarity;
pub mod tokenizer;

pub use config::EngineConfig;
pub use error::{MatchError, Result};
pub use feature::{Feature, FeatureExtractor, FeatureSet};
pub use index::{IndexStore, MemoryIndexStore, RedbIndexStore};
pub use matcher::{ApproximateMatcher, SearchOptions};
pub use pipeline::{CorpusSource, Match, MatchPipeline};
pub use similarity::Similarity;

#[cfg(feature = "http-backend")]
pub use index::{HttpIndexBackend, HttpIndexStore};

/// Build an [`ApproximateMatcher`] from a validated [`EngineConfig`],
/// wiring the configured n-gram extractor, similarity measure, and
/// in-memory index together. Callers needing a persistent or external
/// backend construct the matcher directly instead of going through this
/// convenience entry point.
pub fn build_memory_matcher(config: &EngineConfig) -> Result<ApproximateMatcher> {
    config.validate()?;
    let extractor = match config.ngram.mode {
        config::NgramMode::Character => FeatureExtractor::character(
            config.ngram.n,
            config.ngram.boundary_symbol,
            config.ngram.boundary_length,
        ),
        config::NgramMode::Word => {
            FeatureExtractor::word(config.ngram.n, config.ngram.delimiter.clone(), config.ngram.joiner.clone())
        }
    };
    Ok(ApproximateMatcher::new(
        Box::new(MemoryIndexStore::new()),
        extractor,
        config.similarity,
    ))
}
