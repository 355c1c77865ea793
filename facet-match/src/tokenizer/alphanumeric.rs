use super::{RawTokenSpan, Tokenizer, TokenizerConfig};

/// Splits on runs of `\w` (alphanumeric or underscore), dropping tokens
/// of length <= 1. Grounded in `facet/tokenizer/alphanumeric.py`.
pub struct AlphanumericTokenizer {
    config: TokenizerConfig,
}

impl AlphanumericTokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        AlphanumericTokenizer { config }
    }
}

impl Default for AlphanumericTokenizer {
    fn default() -> Self {
        AlphanumericTokenizer::new(TokenizerConfig::default())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Tokenizer for AlphanumericTokenizer {
    fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn raw_tokens(&self, sentence: &str) -> Vec<RawTokenSpan> {
        let mut out = Vec::new();
        let mut start = None;
        for (i, c) in sentence.char_indices() {
            if is_word_char(c) {
                if start.is_none() {
                    start = Some(i);
                }
            } else if let Some(b) = start.take() {
                push_if_long_enough(&mut out, sentence, b, i);
            }
        }
        if let Some(b) = start {
            push_if_long_enough(&mut out, sentence, b, sentence.len());
        }
        out
    }
}

fn push_if_long_enough(out: &mut Vec<RawTokenSpan>, sentence: &str, begin: usize, end: usize) {
    if sentence[begin..end].chars().count() > 1 {
        out.push(RawTokenSpan { begin, end });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_single_char_tokens() {
        let tok = AlphanumericTokenizer::default();
        let spans = tok.tokenize("a cat_9 is #1");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["cat_9"]);
    }
}
