use std::collections::HashSet;

use super::{RawTokenSpan, Tokenizer, TokenizerConfig};

/// Splits on a configurable set of symbol characters, in addition to
/// whitespace. Grounded in `facet/tokenizer/symbol.py`'s
/// include/exclude-symbols resolution: `symbols` is the set of
/// characters treated as delimiters; anything not whitespace and not in
/// `symbols` is token content.
pub struct SymbolTokenizer {
    config: TokenizerConfig,
    symbols: HashSet<char>,
}

impl SymbolTokenizer {
    pub fn new(config: TokenizerConfig, symbols: impl IntoIterator<Item = char>) -> Self {
        SymbolTokenizer {
            config,
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Default delimiter set: common punctuation.
    pub fn with_default_symbols(config: TokenizerConfig) -> Self {
        SymbolTokenizer::new(config, default_symbols())
    }
}

fn default_symbols() -> Vec<char> {
    ",.;:!?()[]{}\"'-/\\".chars().collect()
}

impl Tokenizer for SymbolTokenizer {
    fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn raw_tokens(&self, sentence: &str) -> Vec<RawTokenSpan> {
        let is_delim = |c: char| c.is_whitespace() || self.symbols.contains(&c);
        let mut out = Vec::new();
        let mut start = None;
        for (i, c) in sentence.char_indices() {
            if is_delim(c) {
                if let Some(b) = start.take() {
                    out.push(RawTokenSpan { begin: b, end: i });
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(b) = start {
            out.push(RawTokenSpan { begin: b, end: sentence.len() });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation() {
        let tok = SymbolTokenizer::with_default_symbols(TokenizerConfig::default());
        let spans = tok.tokenize("hello, world!");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world"]);
    }
}
