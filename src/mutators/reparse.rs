//! The reparse mutator: created with a transaction and a set of files to
//! reparse, supporting full rollback.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::blob::Blob;
use crate::cache::ReaderCaches;
use crate::cancellation::with_no_cancellations;
use crate::dirty::DirtySet;
use crate::keys::FileKey;
use crate::records::FileHandle;
use crate::store::Store;
use crate::transaction::Transaction;

use super::{apply_new_parse, clear_file, NewParse};

pub struct ReparseMutator<'s> {
    store: &'s Store,
    txn: Transaction,
    mutator_caches: &'s ReaderCaches,
    committed_caches: &'s ReaderCaches,
    changed_files: Mutex<HashSet<FileKey>>,
    not_found_files: Mutex<HashSet<FileKey>>,
}

impl<'s> ReparseMutator<'s> {
    pub fn new(
        store: &'s Store,
        files_to_reparse: impl IntoIterator<Item = FileKey>,
        mutator_caches: &'s ReaderCaches,
        committed_caches: &'s ReaderCaches,
    ) -> Self {
        ReparseMutator {
            store,
            txn: Transaction::new(store.begin_txn()),
            mutator_caches,
            committed_caches,
            changed_files: Mutex::new(files_to_reparse.into_iter().collect()),
            not_found_files: Mutex::new(HashSet::new()),
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_parsed(
        &self,
        key: FileKey,
        hash: u64,
        haste_name: Option<String>,
        docblock: Blob,
        ast: Blob,
        aloc_table: Blob,
        type_sig: Blob,
        file_sig: Blob,
        exports: Blob,
    ) -> DirtySet {
        with_no_cancellations(|| {
            apply_new_parse(
                self.store,
                self.txn.id(),
                key,
                NewParse::Typed { hash, haste_name, docblock, ast, aloc_table, type_sig, file_sig, exports },
            )
        })
    }

    pub fn add_unparsed(&self, key: FileKey, hash: u64, haste_name: Option<String>) -> DirtySet {
        with_no_cancellations(|| apply_new_parse(self.store, self.txn.id(), key, NewParse::Untyped { hash, haste_name }))
    }

    /// A worker discovered an unchanged hash for `key`: it is no longer part
    /// of the changed set this transaction needs to roll back on abort.
    pub fn record_unchanged(&self, key: &FileKey) {
        self.changed_files.lock().remove(key);
    }

    pub fn record_not_found(&self, key: FileKey) -> DirtySet {
        with_no_cancellations(|| {
            self.not_found_files.lock().insert(key.clone());
            clear_file(self.store, self.txn.id(), &key)
        })
    }

    /// On commit: clear the mutator reader's caches, invalidate the
    /// committed reader's caches for exactly the changed files, remove
    /// not-found files from the file table, and advance the store's
    /// committed-visibility counter so every write this transaction made
    /// becomes visible to committed readers.
    pub fn commit(&self) {
        with_no_cancellations(|| {
            self.mutator_caches.clear();
            let changed_handles: Vec<FileHandle> =
                self.changed_files.lock().iter().filter_map(|k| self.store.get_file(k)).collect();
            self.committed_caches.invalidate_changed(changed_handles);
            for key in self.not_found_files.lock().drain() {
                self.store.remove_file(&key);
            }
            self.txn.commit();
            self.store.commit_txn(self.txn.id());
        })
    }

    /// On rollback: clear the mutator reader's caches and, for every file
    /// this transaction touched, undo its module memberships in a strict
    /// order (see `rollback_one`).
    pub fn rollback(&self) {
        with_no_cancellations(|| {
            self.mutator_caches.clear();
            let changed: Vec<FileKey> = self.changed_files.lock().iter().cloned().collect();
            for key in &changed {
                self.rollback_one(key);
            }
            self.txn.rollback();
        })
    }

    fn rollback_one(&self, key: &FileKey) {
        let Some(file) = self.store.get_file(key) else { return };
        if !self.store.with_file(file, |f| f.parse_entity.was_written_in(self.txn.id())) {
            return;
        }
        let committed_txn = self.store.committed_txn();
        let (op, np) =
            self.store.with_file(file, |f| (f.parse_entity.read_committed(committed_txn), f.parse_entity.read_latest()));

        let eponymous_fm = self.store.get_file_module(key);
        let old_file_module = if op.is_some() && np.is_none() { eponymous_fm } else { None };
        let new_file_module = if op.is_none() && np.is_some() { eponymous_fm } else { None };

        let old_haste_raw = op.and_then(|p| self.store.with_parse(p, |pr| pr.haste_module()));
        let new_haste_raw = np.and_then(|p| self.store.with_parse(p, |pr| pr.haste_module()));
        let (old_haste_module, new_haste_module) =
            if old_haste_raw == new_haste_raw { (None, None) } else { (old_haste_raw, new_haste_raw) };

        tracing::trace!(?key, ?old_file_module, ?old_haste_module, ?new_file_module, ?new_haste_module, "rolling back reparse of file");

        // Step 1: rollback the old modules' provider entities and materialize
        // deferred deletions under the parse state as it stands right now
        // (still `np`, the transaction's latest).
        if let Some(fm) = old_file_module {
            self.store.rollback_file_module_provider_entity(fm, self.txn.id());
            self.store
                .get_all_file_module_providers_exclusive(fm, |_, f| self.store.is_logically_deleted_from_file_module(f));
        }
        if let Some(hm) = old_haste_module {
            self.store.rollback_haste_provider_entity(hm, self.txn.id());
            self.store.get_all_haste_providers_exclusive(hm, |_, f| self.store.is_logically_deleted_from_haste(f, hm));
        }

        // Step 2: rollback the new modules' provider entities and physically
        // remove this file, which should never have been a member once we
        // undo its parse.
        if let Some(fm) = new_file_module {
            self.store.rollback_file_module_provider_entity(fm, self.txn.id());
            self.store.remove_file_module_provider_exclusive(fm, file);
        }
        if let Some(hm) = new_haste_module {
            self.store.rollback_haste_provider_entity(hm, self.txn.id());
            self.store.remove_haste_provider_exclusive(hm, file);
        }

        // Step 3: only now roll back the file's own parse-entity. Must sit
        // between 2 and 4: while latest was still the new value, re-adding
        // to the old lists in step 4 would look logically deleted.
        self.store.with_file_mut(file, |f| f.parse_entity.rollback(self.txn.id()));

        // Step 4: re-add to the old modules now that committed == latest again.
        if let Some(fm) = old_file_module {
            self.store.add_file_module_provider(fm, file);
        }
        if let Some(hm) = old_haste_module {
            self.store.add_haste_provider(hm, file);
        }
    }
}

#[cfg(test)]
#[path = "reparse_test.rs"]
mod reparse_test;
