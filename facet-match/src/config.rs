//! Typed, serde-deserializable configuration surface. This crate does
//! not pick a serialization format (TOML vs. JSON is a caller decision);
//! it only defines the struct and its validation.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::similarity::{Similarity, ALPHA_MAX, ALPHA_MIN};
use crate::tokenizer::Case;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    Whitespace,
    Symbol,
    Alphanumeric,
    None,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NgramMode {
    #[default]
    Character,
    Word,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgramConfig {
    #[serde(default)]
    pub mode: NgramMode,
    #[serde(default = "default_n")]
    pub n: usize,
    #[serde(default)]
    pub boundary_length: usize,
    #[serde(default = "default_boundary_symbol")]
    pub boundary_symbol: char,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_joiner")]
    pub joiner: String,
}

fn default_n() -> usize {
    3
}
fn default_boundary_symbol() -> char {
    ' '
}
fn default_delimiter() -> String {
    " ".to_string()
}
fn default_joiner() -> String {
    " ".to_string()
}

impl Default for NgramConfig {
    fn default() -> Self {
        NgramConfig {
            mode: NgramMode::default(),
            n: default_n(),
            boundary_length: 0,
            boundary_symbol: default_boundary_symbol(),
            delimiter: default_delimiter(),
            joiner: default_joiner(),
        }
    }
}

/// Recognized backend tags are `memory`, `kv_file`, and `external`, per the
/// configuration surface's documented vocabulary; the variant names stay
/// close to the concrete backends (`redb`, HTTP) they construct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "backend")]
pub enum IndexConfig {
    #[default]
    Memory,
    #[serde(rename = "kv_file")]
    Redb { path: String },
    #[serde(rename = "external")]
    Http { base_url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerSettings {
    #[serde(default = "default_tokenizer_kind")]
    pub kind: TokenizerKind,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,
    #[serde(default)]
    pub stopwords: std::collections::HashSet<String>,
    #[serde(default)]
    pub case: CaseSetting,
    #[serde(default)]
    pub normalize_unicode: bool,
}

fn default_tokenizer_kind() -> TokenizerKind {
    TokenizerKind::Whitespace
}
fn default_window() -> usize {
    1
}
fn default_min_token_length() -> usize {
    1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseSetting {
    #[default]
    None,
    Lower,
    Upper,
}

impl From<CaseSetting> for Case {
    fn from(value: CaseSetting) -> Self {
        match value {
            CaseSetting::None => Case::None,
            CaseSetting::Lower => Case::Lower,
            CaseSetting::Upper => Case::Upper,
        }
    }
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        TokenizerSettings {
            kind: default_tokenizer_kind(),
            window: default_window(),
            min_token_length: default_min_token_length(),
            stopwords: crate::tokenizer::default_stopwords(),
            case: CaseSetting::default(),
            normalize_unicode: false,
        }
    }
}

/// The full, validated configuration surface for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub similarity: Similarity,
    #[serde(default)]
    pub ngram: NgramConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub tokenizer: TokenizerSettings,
}

fn default_alpha() -> f64 {
    0.7
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            alpha: default_alpha(),
            similarity: Similarity::default(),
            ngram: NgramConfig::default(),
            index: IndexConfig::default(),
            tokenizer: TokenizerSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Validate every field, failing with the offending field's name in
    /// the error message (§7).
    pub fn validate(&self) -> Result<()> {
        if self.alpha.is_nan() || !(ALPHA_MIN..=ALPHA_MAX).contains(&self.alpha) {
            return Err(MatchError::ConfigInvalid(format!(
                "alpha must be in [{ALPHA_MIN}, {ALPHA_MAX}], got {}",
                self.alpha
            )));
        }
        if self.ngram.n == 0 {
            return Err(MatchError::ConfigInvalid("ngram.n must be >= 1".to_string()));
        }
        if self.tokenizer.window == 0 {
            return Err(MatchError::ConfigInvalid(
                "tokenizer.window must be >= 1".to_string(),
            ));
        }
        if self.tokenizer.min_token_length == 0 {
            return Err(MatchError::ConfigInvalid(
                "tokenizer.min_token_length must be >= 1".to_string(),
            ));
        }
        if let IndexConfig::Redb { path } = &self.index {
            if path.trim().is_empty() {
                return Err(MatchError::ConfigInvalid("index.path must not be empty".to_string()));
            }
        }
        if let IndexConfig::Http { base_url } = &self.index {
            if base_url.trim().is_empty() {
                return Err(MatchError::ConfigInvalid(
                    "index.base_url must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
