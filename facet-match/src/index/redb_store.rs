use std::path::Path;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition, TableError,
};

use super::{posting_key, IndexStore, METADATA_PREFIX};
use crate::error::{MatchError, Result};

const POSTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("postings");
const STRINGS: TableDefinition<&str, ()> = TableDefinition::new("strings");

/// Embedded key/value `IndexStore`, backed by `redb`.
///
/// Keys use the persisted index layout from the design (`decimal(l) ||
/// '\0' || f`); values are a manual length-prefixed encoding of
/// `Vec<String>` so the store has no dependency on a generic
/// serialization format for its hot path. Inserts are staged into an
/// in-process batch and flushed as a single write transaction on
/// `commit()`, bounding round-trips during a bulk build.
pub struct RedbIndexStore {
    db: Database,
    pending: Vec<(String, String)>,
    batch_size: usize,
}

impl RedbIndexStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path)?;
        Ok(RedbIndexStore {
            db,
            pending: Vec::new(),
            batch_size: 1000,
        })
    }

    /// Open an existing store in read-only mode. Fails if the file does
    /// not already exist, per the "read-only against a nonexistent store
    /// fails at construction" requirement.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::open(path)?;
        Ok(RedbIndexStore {
            db,
            pending: Vec::new(),
            batch_size: 1000,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn flush_pending(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let write_txn = self.db.begin_write()?;
        {
            let mut postings = write_txn.open_table(POSTINGS)?;
            let mut strings = write_txn.open_table(STRINGS)?;
            for (key, s) in self.pending.drain(..) {
                let mut list = decode_list(postings.get(key.as_str())?.map(|g| g.value().to_vec()))?;
                if !list.iter().any(|existing| existing == &s) {
                    list.push(s.clone());
                    postings.insert(key.as_str(), encode_list(&list).as_slice())?;
                }
                strings.insert(s.as_str(), ())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn encode_list(list: &[String]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + list.iter().map(|s| 4 + s.len()).sum::<usize>());
    buf.extend_from_slice(&(list.len() as u32).to_le_bytes());
    for s in list {
        buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    }
    buf
}

fn decode_list(bytes: Option<Vec<u8>>) -> Result<Vec<String>> {
    let Some(bytes) = bytes else {
        return Ok(Vec::new());
    };
    let corrupt = |reason: &str| MatchError::BackendCorrupt {
        key: "postings".to_string(),
        reason: reason.to_string(),
    };
    if bytes.len() < 4 {
        return Err(corrupt("truncated posting-list header"));
    }
    let count = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
    let mut out = Vec::with_capacity(count);
    let mut cursor = 4usize;
    for _ in 0..count {
        if cursor + 4 > bytes.len() {
            return Err(corrupt("truncated posting-list entry length"));
        }
        let len = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap()) as usize;
        cursor += 4;
        if cursor + len > bytes.len() {
            return Err(corrupt("truncated posting-list entry bytes"));
        }
        let s = String::from_utf8(bytes[cursor..cursor + len].to_vec())
            .map_err(|_| corrupt("non-utf8 posting-list entry"))?;
        out.push(s);
        cursor += len;
    }
    Ok(out)
}

impl IndexStore for RedbIndexStore {
    fn get_strings(&self, l: u32, f: &str) -> Result<Vec<String>> {
        let key = posting_key(l, f);
        // Pending writes are not yet visible to the read transaction; a
        // search issued before a commit only sees committed state, which
        // matches the build-phase/query-phase separation in the design.
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(POSTINGS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        decode_list(table.get(key.as_str())?.map(|g| g.value().to_vec()))
    }

    fn insert(&mut self, s: &str, l: u32, f: &str) -> Result<()> {
        self.pending.push((posting_key(l, f), s.to_string()));
        if self.pending.len() >= self.batch_size {
            self.flush_pending()?;
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        match read_txn.open_table(STRINGS) {
            Ok(table) => Ok(table.len()? as usize),
            Err(TableError::TableDoesNotExist(_)) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&mut self) -> Result<()> {
        self.pending.clear();
        let write_txn = self.db.begin_write()?;
        {
            let mut postings = write_txn.open_table(POSTINGS)?;
            postings.retain(|_, _| false)?;
            let mut strings = write_txn.open_table(STRINGS)?;
            strings.retain(|_, _| false)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.flush_pending()
    }

    fn set_global_max_features(&mut self, value: u32) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let meta: TableDefinition<&str, u32> = TableDefinition::new("meta");
            let mut table = write_txn.open_table(meta)?;
            table.insert(global_max_features_key().as_str(), value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn global_max_features(&self) -> Result<Option<u32>> {
        let read_txn = self.db.begin_read()?;
        let meta: TableDefinition<&str, u32> = TableDefinition::new("meta");
        match read_txn.open_table(meta) {
            Ok(table) => Ok(table.get(global_max_features_key().as_str())?.map(|g| g.value())),
            Err(TableError::TableDoesNotExist(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn global_max_features_key() -> String {
    format!("{METADATA_PREFIX}global_max_features")
}
