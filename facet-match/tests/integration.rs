//! Quantified invariants and the scaled-up end-to-end scenario from the
//! testable-properties list: feature determinism, bound consistency,
//! monotonicity in alpha, similarity symmetry, CPMerge completeness
//! against a brute-force reference, and backend equivalence at scale
//! between the in-memory and embedded-kv stores.

use std::collections::HashSet;

use facet_match::{ApproximateMatcher, FeatureExtractor, MemoryIndexStore, RedbIndexStore, SearchOptions, Similarity};
use proptest::prelude::*;

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,16}"
}

proptest! {
    #[test]
    fn feature_determinism(s in arb_word()) {
        let fe = FeatureExtractor::default();
        prop_assert_eq!(fe.get_features(&s), fe.get_features(&s));
    }

    #[test]
    fn similarity_symmetry(a in arb_word(), b in arb_word()) {
        let fe = FeatureExtractor::default();
        let (fa, fb) = (fe.get_features(&a), fe.get_features(&b));
        for measure in [
            Similarity::Cosine,
            Similarity::Dice,
            Similarity::Jaccard,
            Similarity::Overlap,
            Similarity::Exact,
            Similarity::Hamming,
        ] {
            let (sab, sba) = (measure.similarity(&fa, &fb), measure.similarity(&fb, &fa));
            prop_assert!(sab == sba || (sab.is_nan() && sba.is_nan()), "{measure:?}: {sab} != {sba}");
        }
    }

    #[test]
    fn bound_consistency(len in 1usize..30, alpha_milli in 1u32..=100) {
        let alpha = alpha_milli as f64 / 100.0;
        for measure in [
            Similarity::Cosine,
            Similarity::Dice,
            Similarity::Jaccard,
            Similarity::Overlap,
            Similarity::Exact,
            Similarity::Hamming,
        ] {
            let lo = measure.min_features(len, alpha);
            let hi = measure.max_features(len, alpha);
            prop_assert!(lo <= len, "{measure:?} min_features({len},{alpha})={lo} > len");
            if let Similarity::Exact = measure {
                prop_assert_eq!(hi, len, "Exact max_features({}, {}) must equal len", len, alpha);
            } else {
                prop_assert!(len <= hi, "{measure:?} max_features({len},{alpha})={hi} < len");
            }
            let tau = measure.min_common_features(len, hi.max(1), alpha);
            prop_assert!(tau >= 1, "{measure:?} tau={tau} < 1");
            prop_assert!(tau <= len as i64, "{measure:?} tau={tau} > len={len}");
        }
    }

    #[test]
    fn monotonicity_in_alpha(words in prop::collection::vec(arb_word(), 2..12), alpha_lo_milli in 1u32..50, spread in 1u32..50) {
        let alpha_lo = alpha_lo_milli as f64 / 100.0;
        let alpha_hi = ((alpha_lo_milli + spread).min(100)) as f64 / 100.0;

        let mut matcher = ApproximateMatcher::new(
            Box::new(MemoryIndexStore::new()),
            FeatureExtractor::default(),
            Similarity::Jaccard,
        );
        for w in &words {
            matcher.insert(w).unwrap();
        }
        let query = &words[0];
        let lo: HashSet<String> = matcher
            .search(query, SearchOptions { alpha: alpha_lo, ..Default::default() })
            .unwrap()
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        let hi: HashSet<String> = matcher
            .search(query, SearchOptions { alpha: alpha_hi, ..Default::default() })
            .unwrap()
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        prop_assert!(hi.is_subset(&lo));
    }

    #[test]
    fn cpmerge_completeness_vs_brute_force(
        words in prop::collection::vec(arb_word(), 1..15),
        query in arb_word(),
        alpha_milli in 10u32..=100,
    ) {
        let alpha = alpha_milli as f64 / 100.0;
        let fe = FeatureExtractor::default();
        let mut matcher = ApproximateMatcher::new(
            Box::new(MemoryIndexStore::new()),
            fe.clone(),
            Similarity::Jaccard,
        );
        for w in &words {
            matcher.insert(w).unwrap();
        }
        let joined: HashSet<String> = matcher
            .search(&query, SearchOptions { alpha, rank: false, similarity: None })
            .unwrap()
            .into_iter()
            .map(|(s, _)| s)
            .collect();

        let qf = fe.get_features(&query);
        let brute: HashSet<String> = words
            .iter()
            .filter(|w| Similarity::Jaccard.similarity(&qf, &fe.get_features(w)) >= alpha)
            .cloned()
            .collect();

        prop_assert_eq!(joined, brute);
    }
}

#[test]
fn backend_equivalence_at_scale() {
    let dir = tempfile::tempdir().unwrap();
    let mut memory = ApproximateMatcher::new(
        Box::new(MemoryIndexStore::new()),
        FeatureExtractor::default(),
        Similarity::Jaccard,
    );
    let mut redb = ApproximateMatcher::new(
        Box::new(RedbIndexStore::open(dir.path().join("bench.redb")).unwrap()),
        FeatureExtractor::default(),
        Similarity::Jaccard,
    );

    let bases = [
        "acetaminophen", "amoxicillin", "levothyroxine", "hydrochlorothiazide",
        "metoprolol", "atorvastatin", "omeprazole", "losartan", "gabapentin", "sertraline",
    ];
    let mut dictionary = Vec::new();
    for i in 0..500 {
        let word = format!("{}{}", bases[i % bases.len()], i);
        dictionary.push(word);
    }
    for word in &dictionary {
        memory.insert(word).unwrap();
        redb.insert(word).unwrap();
    }
    redb.close().unwrap();

    for i in 0..50 {
        let query = &dictionary[i * 10 % dictionary.len()];
        let from_memory = memory.search_default(query).unwrap();
        let from_redb = redb.search_default(query).unwrap();
        assert_eq!(from_memory, from_redb, "mismatch for query {query:?}");
    }
}

#[test]
fn scenario_2_jaccard_known_value_end_to_end() {
    let mut matcher = ApproximateMatcher::new(
        Box::new(MemoryIndexStore::new()),
        FeatureExtractor::default(),
        Similarity::Jaccard,
    );
    for s in ["acetate", "acetone", "acetic acid"] {
        matcher.insert(s).unwrap();
    }
    let hits = matcher
        .search("acetate", SearchOptions { alpha: 0.7, similarity: None, rank: true })
        .unwrap();
    assert_eq!(hits, vec![("acetate".to_string(), 1.0)]);
}
