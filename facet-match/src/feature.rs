//! N-gram feature extraction with duplicate disambiguation.
//!
//! Given a string, [`FeatureExtractor::get_features`] produces the
//! disambiguated, ordered sequence of n-gram features that every other
//! component (the index, the matcher, the similarity measures) treats as
//! the string's identity for matching purposes. The extraction is pure:
//! identical inputs yield identical outputs, in this process or any other.

/// A single disambiguated n-gram feature, e.g. `"hel\u{0}0"` for the first
/// occurrence of `"hel"` in a string.
pub type Feature = String;

/// The disambiguated, ordered feature set of one string.
pub type FeatureSet = Vec<Feature>;

const DISAMBIGUATOR: char = '\u{0}';

/// Deterministic `string -> FeatureSet` mapping.
///
/// Character mode pads the string with `boundary_length` copies of
/// `boundary_symbol` on each side before enumerating length-`n` substrings.
/// Word mode splits on `delimiter`, enumerates length-`n` contiguous word
/// windows, and rejoins each window with `joiner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureExtractor {
    Character {
        n: usize,
        boundary_symbol: char,
        boundary_length: usize,
    },
    Word {
        n: usize,
        delimiter: String,
        joiner: String,
    },
}

impl Default for FeatureExtractor {
    /// `n = 3`, no boundary padding, matching the reference implementation's
    /// default character trigram extractor.
    fn default() -> Self {
        FeatureExtractor::Character {
            n: 3,
            boundary_symbol: ' ',
            boundary_length: 0,
        }
    }
}

impl FeatureExtractor {
    pub fn character(n: usize, boundary_symbol: char, boundary_length: usize) -> Self {
        FeatureExtractor::Character {
            n,
            boundary_symbol,
            boundary_length,
        }
    }

    pub fn word(n: usize, delimiter: impl Into<String>, joiner: impl Into<String>) -> Self {
        FeatureExtractor::Word {
            n,
            delimiter: delimiter.into(),
            joiner: joiner.into(),
        }
    }

    /// Extract the disambiguated feature set of `text`.
    ///
    /// Returns an empty set when `text` is shorter than `n` grams (with no
    /// padding to make up the difference) — this is not an error, callers
    /// treat an empty feature set as "no results" at query time and a no-op
    /// at insert time.
    pub fn get_features(&self, text: &str) -> FeatureSet {
        match self {
            FeatureExtractor::Character {
                n,
                boundary_symbol,
                boundary_length,
            } => {
                let padding: String = std::iter::repeat_n(*boundary_symbol, *boundary_length).collect();
                let padded: String = format!("{padding}{text}{padding}");
                let units: Vec<char> = padded.chars().collect();
                disambiguate(raw_ngrams(&units, *n))
            }
            FeatureExtractor::Word {
                n,
                delimiter,
                joiner,
            } => {
                let words: Vec<&str> = if delimiter.is_empty() {
                    vec![text]
                } else {
                    text.split(delimiter.as_str()).collect()
                };
                disambiguate(raw_word_ngrams(&words, *n, joiner))
            }
        }
    }
}

fn raw_ngrams(units: &[char], n: usize) -> Vec<String> {
    if n == 0 || units.len() < n {
        return Vec::new();
    }
    (0..=units.len() - n)
        .map(|i| units[i..i + n].iter().collect())
        .collect()
}

fn raw_word_ngrams(words: &[&str], n: usize, joiner: &str) -> Vec<String> {
    if n == 0 || words.len() < n {
        return Vec::new();
    }
    (0..=words.len() - n)
        .map(|i| words[i..i + n].join(joiner))
        .collect()
}

/// Rewrite each raw feature to `f<disambiguator>j`, the first such string
/// not yet used in the current feature set, so that repeated occurrences
/// of the same n-gram become distinct set members while the cardinality of
/// the feature set (and thus every similarity bound keyed on it) is
/// unaffected.
fn disambiguate(raw: Vec<String>) -> FeatureSet {
    let mut seen = std::collections::HashSet::with_capacity(raw.len());
    raw.into_iter()
        .map(|f| {
            let mut j = 0usize;
            loop {
                let candidate = format!("{f}{DISAMBIGUATOR}{j}");
                if seen.insert(candidate.clone()) {
                    break candidate;
                }
                j += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_trigrams_no_padding() {
        let fe = FeatureExtractor::default();
        let features = fe.get_features("hello");
        assert_eq!(features.len(), 3);
        assert!(features[0].starts_with("hel"));
        assert!(features[1].starts_with("ell"));
        assert!(features[2].starts_with("llo"));
    }

    #[test]
    fn disambiguation_preserves_cardinality() {
        let fe = FeatureExtractor::default();
        // "aaaa" -> raw trigrams "aaa", "aaa" must become distinct features.
        let features = fe.get_features("aaaa");
        assert_eq!(features.len(), 2);
        assert_ne!(features[0], features[1]);
    }

    #[test]
    fn short_string_yields_empty_set() {
        let fe = FeatureExtractor::default();
        assert!(fe.get_features("hi").is_empty());
    }

    #[test]
    fn determinism() {
        let fe = FeatureExtractor::default();
        assert_eq!(fe.get_features("acetaminophen"), fe.get_features("acetaminophen"));
    }

    #[test]
    fn word_ngrams() {
        let fe = FeatureExtractor::word(2, " ", " ");
        let features = fe.get_features("new york city");
        assert_eq!(features.len(), 2);
        assert!(features[0].starts_with("new york"));
        assert!(features[1].starts_with("york city"));
    }

    #[test]
    fn boundary_padding() {
        let fe = FeatureExtractor::character(3, '\u{1}', 2);
        let features = fe.get_features("hi");
        // padded = "\u{1}\u{1}hi\u{1}\u{1}" (len 6) -> 4 trigrams
        assert_eq!(features.len(), 4);
    }
}
