//! Local per-process reader caches: one LRU per artifact kind, guarded by a
//! plain mutex since lookups are cheap and infrequent relative to the parse
//! work they sit in front of.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::blob::Blob;
use crate::records::FileHandle;

fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::new(1).unwrap())
}

/// The AST and aloc-table caches for one reader flavor. The mutator reader's
/// instance is cleared on every commit and rollback; the committed reader's
/// instance only has individual files invalidated, on commit, for the
/// changed-file set.
pub struct ReaderCaches {
    ast: Mutex<LruCache<FileHandle, Blob>>,
    aloc_table: Mutex<LruCache<FileHandle, Blob>>,
}

impl ReaderCaches {
    pub fn new(ast_capacity: usize, aloc_table_capacity: usize) -> Self {
        ReaderCaches {
            ast: Mutex::new(LruCache::new(capacity(ast_capacity))),
            aloc_table: Mutex::new(LruCache::new(capacity(aloc_table_capacity))),
        }
    }

    pub fn get_or_compute_ast(&self, file: FileHandle, compute: impl FnOnce() -> Option<Blob>) -> Option<Blob> {
        if let Some(hit) = self.ast.lock().get(&file) {
            return Some(hit.clone());
        }
        let value = compute()?;
        self.ast.lock().put(file, value.clone());
        Some(value)
    }

    pub fn get_or_compute_aloc_table(
        &self,
        file: FileHandle,
        compute: impl FnOnce() -> Option<Blob>,
    ) -> Option<Blob> {
        if let Some(hit) = self.aloc_table.lock().get(&file) {
            return Some(hit.clone());
        }
        let value = compute()?;
        self.aloc_table.lock().put(file, value.clone());
        Some(value)
    }

    pub fn clear(&self) {
        self.ast.lock().clear();
        self.aloc_table.lock().clear();
    }

    pub fn invalidate(&self, file: FileHandle) {
        self.ast.lock().pop(&file);
        self.aloc_table.lock().pop(&file);
    }
}
