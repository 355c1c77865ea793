//! The CPMerge-based approximate dictionary matcher.
//!
//! `ApproximateMatcher` ties [`crate::feature::FeatureExtractor`],
//! [`crate::similarity::Similarity`] and a boxed [`crate::index::IndexStore`]
//! together to answer `insert`/`search` against a size-partitioned inverted
//! index, using the overlap-join described in Okazaki & Tsujii (2010).

use std::sync::Mutex;

use foldhash::{HashMap, HashMapExt};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::feature::{FeatureExtractor, FeatureSet};
use crate::similarity::{clamp_alpha, Similarity};
use crate::index::IndexStore;

/// Implementation-wide upper bound on `|X|` considered at query time.
/// Matches the reference's `Simstring.MAX_NGRAM_FEATURES`.
pub const DEFAULT_GLOBAL_MAX_FEATURES: u32 = 64;

#[derive(Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    alpha_bits: u64,
    similarity: Similarity,
    query: String,
}

/// Options accepted by [`ApproximateMatcher::search`], overriding the
/// engine's defaults for one call.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub alpha: f64,
    pub similarity: Option<Similarity>,
    pub rank: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            alpha: 0.7,
            similarity: None,
            rank: true,
        }
    }
}

/// The CPMerge engine: owns the index, the feature extractor, the default
/// similarity measure, and an optional advisory candidate cache.
pub struct ApproximateMatcher {
    index: Box<dyn IndexStore>,
    feature_extractor: FeatureExtractor,
    default_similarity: Similarity,
    global_max_features: u32,
    cache: Option<Mutex<HashMap<CacheKey, Vec<String>>>>,
}

impl ApproximateMatcher {
    pub fn new(index: Box<dyn IndexStore>, feature_extractor: FeatureExtractor, similarity: Similarity) -> Self {
        ApproximateMatcher {
            index,
            feature_extractor,
            default_similarity: similarity,
            global_max_features: DEFAULT_GLOBAL_MAX_FEATURES,
            cache: None,
        }
    }

    pub fn with_global_max_features(mut self, value: u32) -> Self {
        self.global_max_features = value.max(1);
        self
    }

    /// Enable the advisory post-join candidate cache.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(HashMap::new()));
        self
    }

    /// Drop every cached candidate list. Required whenever the default
    /// similarity measure changes, since candidate membership depends on
    /// which measure produced the bounds used during the join.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                guard.clear();
            }
        }
    }

    pub fn feature_extractor(&self) -> &FeatureExtractor {
        &self.feature_extractor
    }

    /// Insert `s` into the index. A no-op if `s` produces an empty
    /// feature set (shorter than one n-gram with no padding).
    #[instrument(skip(self), fields(s))]
    pub fn insert(&mut self, s: &str) -> Result<()> {
        let features = self.feature_extractor.get_features(s);
        if features.is_empty() {
            return Ok(());
        }
        let l = features.len() as u32;
        for f in &features {
            self.index.insert(s, l, f)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.invalidate_cache();
        self.index.clear()
    }

    pub fn close(&mut self) -> Result<()> {
        self.index.close()
    }

    /// Run `search` with the engine's default threshold/measure/ranking.
    pub fn search_default(&self, query: &str) -> Result<Vec<(String, f64)>> {
        self.search(query, SearchOptions::default())
    }

    /// Answer `search(query, alpha)`: candidates with `sim(query, s) >=
    /// alpha`, optionally ranked descending with a stable ascending
    /// tie-break on the candidate string.
    #[instrument(skip(self, query), fields(alpha = opts.alpha))]
    pub fn search(&self, query: &str, opts: SearchOptions) -> Result<Vec<(String, f64)>> {
        let alpha = clamp_alpha(opts.alpha);
        let measure = opts.similarity.unwrap_or(self.default_similarity);
        let query_features = self.feature_extractor.get_features(query);
        if query_features.is_empty() {
            return Ok(Vec::new());
        }

        // Caching is only safe against the engine's own default measure:
        // when the caller overrides it for this call, candidate
        // membership depends on bounds the cache was never keyed on, so
        // caching is bypassed entirely for that call.
        let use_cache = opts.similarity.is_none() || opts.similarity == Some(self.default_similarity);
        let cache_key = CacheKey {
            alpha_bits: alpha.to_bits(),
            similarity: measure,
            query: query.to_string(),
        };

        let candidates = if use_cache {
            if let Some(cached) = self.cache_get(&cache_key) {
                cached
            } else {
                let found = self.overlap_join_all_sizes(&query_features, measure, alpha)?;
                self.cache_put(cache_key, &found);
                found
            }
        } else {
            self.overlap_join_all_sizes(&query_features, measure, alpha)?
        };

        let mut hits: Vec<(String, f64)> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let candidate_features = self.feature_extractor.get_features(&candidate);
            let sim = measure.similarity(&query_features, &candidate_features);
            if sim >= alpha {
                hits.push((candidate, sim));
            }
        }

        if opts.rank {
            hits.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
        }
        Ok(hits)
    }

    fn cache_get(&self, key: &CacheKey) -> Option<Vec<String>> {
        let cache = self.cache.as_ref()?;
        cache.lock().ok()?.get(key).cloned()
    }

    fn cache_put(&self, key: CacheKey, value: &[String]) {
        let Some(cache) = &self.cache else { return };
        // Advisory: a lock failure (a poisoned mutex from a panicking
        // contender) just means this write is silently dropped.
        if let Ok(mut guard) = cache.lock() {
            guard.insert(key, value.to_vec());
        }
    }

    /// Run the overlap-join across every candidate feature-set size in
    /// `[max(1, min_features), min(GLOBAL_MAX_FEATURES, max_features)]`
    /// and pool the emitted candidates.
    fn overlap_join_all_sizes(
        &self,
        query_features: &FeatureSet,
        measure: Similarity,
        alpha: f64,
    ) -> Result<Vec<String>> {
        let qlen = query_features.len();
        let lo = measure.min_features(qlen, alpha).max(1);
        let hi = measure
            .max_features(qlen, alpha)
            .min(self.global_max_features as usize);

        let mut pooled = Vec::new();
        if lo > hi {
            return Ok(pooled);
        }
        for l in lo..=hi {
            let tau = measure.min_common_features(qlen, l, alpha);
            if tau <= 0 {
                continue;
            }
            let tau = tau as usize;
            pooled.extend(self.overlap_join(query_features, l as u32, tau)?);
        }
        Ok(pooled)
    }

    /// The CPMerge overlap-join for one candidate feature-set size `l`.
    ///
    /// Fetches the posting list of every query feature at size `l`, sorts
    /// the query features by ascending posting-list length (probing rare
    /// features first shrinks the candidate pool fastest), accumulates a
    /// frequency map over the first `|X| - tau + 1` features, then scans
    /// the remainder, emitting any string whose count reaches `tau` and
    /// pruning any string whose count plus remaining lists can no longer
    /// reach `tau`.
    fn overlap_join(&self, query_features: &FeatureSet, l: u32, tau: usize) -> Result<Vec<String>> {
        let mut postings: Vec<(&str, Vec<String>)> = Vec::with_capacity(query_features.len());
        for f in query_features {
            let list = self.index.get_strings(l, f)?;
            postings.push((f.as_str(), list));
        }
        postings.sort_by_key(|(_, list)| list.len());

        let n = postings.len();
        if tau == 0 || tau > n {
            return Ok(Vec::new());
        }
        let split = n - tau + 1;

        let mut freq: HashMap<&str, usize> = HashMap::new();
        for (_, list) in &postings[..split] {
            for s in list {
                *freq.entry(s.as_str()).or_insert(0) += 1;
            }
        }

        let mut emitted = Vec::new();
        let mut done: std::collections::HashSet<&str> = std::collections::HashSet::new();

        // Membership test against the remaining posting lists — built
        // once per list for O(1) lookups instead of a linear scan.
        let remaining_sets: Vec<std::collections::HashSet<&str>> = postings[split..]
            .iter()
            .map(|(_, list)| list.iter().map(String::as_str).collect())
            .collect();

        let candidates: Vec<&str> = freq.keys().copied().collect();
        for s in candidates {
            if done.contains(s) {
                continue;
            }
            let mut count = *freq.get(s).unwrap();
            if count >= tau {
                emitted.push(s.to_string());
                done.insert(s);
                continue;
            }
            let mut pruned = false;
            for (i, set) in remaining_sets.iter().enumerate() {
                if set.contains(s) {
                    count += 1;
                }
                if count >= tau {
                    emitted.push(s.to_string());
                    done.insert(s);
                    break;
                }
                let remaining = n - (split + i) - 1;
                if count + remaining < tau {
                    pruned = true;
                    break;
                }
            }
            if pruned {
                debug!(candidate = s, "pruned below tau");
            }
        }
        Ok(emitted)
    }
}
