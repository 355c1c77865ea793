use super::{RawTokenSpan, Tokenizer, TokenizerConfig};

/// Identity tokenizer: the whole input is one token. Grounded in
/// `facet/tokenizer/none.py`, used when the caller's matching unit is
/// already pre-segmented (e.g. one corpus source per candidate span).
pub struct NoneTokenizer {
    config: TokenizerConfig,
}

impl NoneTokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        NoneTokenizer { config }
    }
}

impl Default for NoneTokenizer {
    fn default() -> Self {
        NoneTokenizer::new(TokenizerConfig::default())
    }
}

impl Tokenizer for NoneTokenizer {
    fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn raw_tokens(&self, sentence: &str) -> Vec<RawTokenSpan> {
        if sentence.is_empty() {
            Vec::new()
        } else {
            vec![RawTokenSpan { begin: 0, end: sentence.len() }]
        }
    }
}
