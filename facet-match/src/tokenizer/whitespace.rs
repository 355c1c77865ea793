use super::{RawTokenSpan, Tokenizer, TokenizerConfig};

/// Splits on runs of whitespace. The simplest and default tokenizer,
/// matching `facet/tokenizer/whitespace.py`.
pub struct WhitespaceTokenizer {
    config: TokenizerConfig,
}

impl WhitespaceTokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        WhitespaceTokenizer { config }
    }
}

impl Default for WhitespaceTokenizer {
    fn default() -> Self {
        WhitespaceTokenizer::new(TokenizerConfig::default())
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn raw_tokens(&self, sentence: &str) -> Vec<RawTokenSpan> {
        let mut out = Vec::new();
        let mut start = None;
        for (i, c) in sentence.char_indices() {
            if c.is_whitespace() {
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
    fn splits_on_whitespace() {
        let tok = WhitespaceTokenizer::default();
        let spans = tok.tokenize("hello   world");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world"]);
    }
}
