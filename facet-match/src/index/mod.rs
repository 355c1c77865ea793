//! Pluggable persistent mapping `(feature-set size, feature) -> [string]`.
//!
//! `IndexStore` is the one seam in this crate where dynamic dispatch is
//! appropriate: backend selection is a construction-time decision, not a
//! per-candidate one, so the small cost of a vtable call per posting-list
//! fetch is irrelevant next to the I/O it wraps.

mod memory;
mod redb_store;

#[cfg(feature = "http-backend")]
mod http_store;

pub use memory::MemoryIndexStore;
pub use redb_store::RedbIndexStore;

#[cfg(feature = "http-backend")]
pub use http_store::{HttpIndexBackend, HttpIndexStore, RestIndexBackend};

use crate::error::Result;

/// Reserved key prefix for backend metadata (e.g. `GLOBAL_MAX_FEATURES`).
/// Chosen so it can never collide with a `decimal(l) || '\0' || f` posting
/// key, since a size prefix is always ASCII digits.
pub const METADATA_PREFIX: &str = "__meta/";

/// Abstract persistent posting-list store, consumed by
/// [`crate::matcher::ApproximateMatcher`].
///
/// Implementations must give identical externally visible semantics:
/// `insert` is idempotent, `get_strings` returns `[]` for an absent key
/// rather than an error, and no posting list ever contains duplicates.
pub trait IndexStore: Send + Sync {
    /// Strings indexed at feature-set size `l` whose feature set contains
    /// `f`. Empty if absent.
    fn get_strings(&self, l: u32, f: &str) -> Result<Vec<String>>;

    /// Add `s` to the posting list for `(l, f)`. A no-op if already present.
    fn insert(&mut self, s: &str, l: u32, f: &str) -> Result<()>;

    /// Total number of distinct strings ever inserted (not posting
    /// entries — one string contributes to many postings).
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove all entries.
    fn clear(&mut self) -> Result<()>;

    /// Flush pending writes. A no-op for backends with no write buffering.
    fn commit(&mut self) -> Result<()>;

    /// Release the backend's connection/handle. Commits any pending writes
    /// first. Safe to call more than once.
    fn close(&mut self) -> Result<()> {
        self.commit()
    }

    /// Persist `GLOBAL_MAX_FEATURES` so a reopened index is self-describing.
    fn set_global_max_features(&mut self, value: u32) -> Result<()>;

    /// Read back a previously persisted `GLOBAL_MAX_FEATURES`, if any.
    fn global_max_features(&self) -> Result<Option<u32>>;
}

/// Encode the `(l, f)` posting key as `decimal(l) || '\0' || f`, matching
/// the persisted index layout: a size prefix that can never collide with
/// the `__meta/`-prefixed reserved keys, since a size prefix is always
/// ASCII digits.
pub(crate) fn posting_key(l: u32, f: &str) -> String {
    format!("{l}\u{0}{f}")
}
