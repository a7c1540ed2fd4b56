//! The committed reader: sees the `committed` slot of every entity. Used
//! outside transactions, and for "old" lookups during a reparse (e.g.
//! comparing previous exports).

use super::{Reader, Snapshot};
use crate::cache::ReaderCaches;
use crate::config::StoreConfig;
use crate::records::FileHandle;
use crate::store::Store;

pub struct CommittedReader<'s> {
    store: &'s Store,
    caches: ReaderCaches,
}

impl<'s> CommittedReader<'s> {
    pub fn new(store: &'s Store, ast_cache_size: usize, aloc_table_cache_size: usize) -> Self {
        CommittedReader { store, caches: ReaderCaches::new(ast_cache_size, aloc_table_cache_size) }
    }

    /// Sizes its caches from `config.ast_cache_size`/`aloc_table_cache_size`
    /// instead of literal sizes passed at every call site.
    pub fn with_config(store: &'s Store, config: &StoreConfig) -> Self {
        Self::new(store, config.ast_cache_size, config.aloc_table_cache_size)
    }

    pub fn reader(&self) -> Reader<'_> {
        Reader::new(self.store, &self.caches, Snapshot::Committed)
    }

    /// Invalidated per commit, but only for the changed-file set, unlike the
    /// mutator reader's blanket clear.
    pub fn invalidate_changed(&self, changed: impl IntoIterator<Item = FileHandle>) {
        for file in changed {
            self.caches.invalidate(file);
        }
    }
}
