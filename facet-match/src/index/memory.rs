use foldhash::HashMap;

use super::IndexStore;
use crate::error::Result;

/// In-memory `IndexStore`, single-process, backed by a hash map from the
/// `(l, f)` posting key to its string list.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    postings: HashMap<String, Vec<String>>,
    strings: std::collections::HashSet<String>,
    global_max_features: Option<u32>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexStore for MemoryIndexStore {
    fn get_strings(&self, l: u32, f: &str) -> Result<Vec<String>> {
        Ok(self
            .postings
            .get(&super::posting_key(l, f))
            .cloned()
            .unwrap_or_default())
    }

    fn insert(&mut self, s: &str, l: u32, f: &str) -> Result<()> {
        let list = self.postings.entry(super::posting_key(l, f)).or_default();
        if !list.iter().any(|existing| existing == s) {
            list.push(s.to_string());
        }
        self.strings.insert(s.to_string());
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.strings.len())
    }

    fn clear(&mut self) -> Result<()> {
        self.postings.clear();
        self.strings.clear();
        self.global_max_features = None;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_global_max_features(&mut self, value: u32) -> Result<()> {
        self.global_max_features = Some(value);
        Ok(())
    }

    fn global_max_features(&self) -> Result<Option<u32>> {
        Ok(self.global_max_features)
    }
}
