use divan::Bencher;
use facet_match::{ApproximateMatcher, FeatureExtractor, MemoryIndexStore, SearchOptions, Similarity};

const DICTIONARY_SIZE_LIST: &[usize] = &[100, 1_000, 10_000];
const ALPHA_LIST: &[f64] = &[0.3, 0.5, 0.7, 0.9];

const BASE_WORDS: &[&str] = &[
    "acetaminophen",
    "amoxicillin",
    "levothyroxine",
    "hydrochlorothiazide",
    "metoprolol tartrate",
    "atorvastatin calcium",
];

fn build_dictionary(size: usize) -> ApproximateMatcher {
    let mut matcher = ApproximateMatcher::new(
        Box::new(MemoryIndexStore::new()),
        FeatureExtractor::default(),
        Similarity::Jaccard,
    );
    for i in 0..size {
        let base = BASE_WORDS[i % BASE_WORDS.len()];
        matcher.insert(&format!("{base}{i}")).unwrap();
    }
    matcher
}

#[divan::bench(args = DICTIONARY_SIZE_LIST)]
fn search_by_dictionary_size(bencher: Bencher, size: usize) {
    let matcher = build_dictionary(size);
    bencher.bench(|| {
        divan::black_box(matcher.search_default("acetaminophen").unwrap());
    });
}

#[divan::bench(args = ALPHA_LIST)]
fn search_by_alpha(bencher: Bencher, alpha: f64) {
    let matcher = build_dictionary(1_000);
    bencher.bench(|| {
        divan::black_box(
            matcher
                .search("acetaminophen", SearchOptions { alpha, similarity: None, rank: true })
                .unwrap(),
        );
    });
}

fn main() {
    divan::main()
}
