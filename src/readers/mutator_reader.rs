//! The mutator reader: sees the `latest` slot of every entity. Used inside a
//! transaction by workers and by the master while deciding providers.

use super::{Reader, Snapshot};
use crate::cache::ReaderCaches;
use crate::config::StoreConfig;
use crate::store::Store;

pub struct MutatorReader<'s> {
    store: &'s Store,
    caches: ReaderCaches,
}

impl<'s> MutatorReader<'s> {
    pub fn new(store: &'s Store, ast_cache_size: usize, aloc_table_cache_size: usize) -> Self {
        MutatorReader { store, caches: ReaderCaches::new(ast_cache_size, aloc_table_cache_size) }
    }

    /// Sizes its caches from `config.ast_cache_size`/`aloc_table_cache_size`
    /// instead of literal sizes passed at every call site.
    pub fn with_config(store: &'s Store, config: &StoreConfig) -> Self {
        Self::new(store, config.ast_cache_size, config.aloc_table_cache_size)
    }

    pub fn reader(&self) -> Reader<'_> {
        Reader::new(self.store, &self.caches, Snapshot::Latest)
    }

    /// Cleared at every commit and rollback: the mutator reader's cache has
    /// no per-file invalidation because within a single transaction any file
    /// it has cached may still change.
    pub fn clear_cache(&self) {
        self.caches.clear();
    }
}
