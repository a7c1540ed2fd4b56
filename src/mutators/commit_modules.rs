//! The commit-modules mutator: given the dirty modules a reparse produced,
//! selects each one's provider (the first live entry in declaration order)
//! and schedules modules left with zero live providers for removal from
//! their key→module table.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::cancellation::with_no_cancellations;
use crate::entity::TxnId;
use crate::keys::{FileKey, ModuleName};
use crate::store::Store;

#[derive(Clone, PartialEq, Eq, Hash)]
enum PendingRemoval {
    Haste(String),
    File(FileKey),
}

pub struct CommitModulesMutator<'s> {
    store: &'s Store,
    txn: TxnId,
    no_providers: Mutex<HashSet<PendingRemoval>>,
}

impl<'s> CommitModulesMutator<'s> {
    pub fn new(store: &'s Store) -> Self {
        CommitModulesMutator { store, txn: store.begin_txn(), no_providers: Mutex::new(HashSet::new()) }
    }

    /// Runs provider selection for one dirty module. Safe to call more than
    /// once for the same module within this mutator's lifetime; later calls
    /// simply re-run selection over whatever the list looks like now.
    pub fn select_provider(&self, module: ModuleName) {
        with_no_cancellations(|| match module {
            ModuleName::Haste(name) => self.select_haste_provider(name),
            ModuleName::File(key) => self.select_file_module_provider(key),
        })
    }

    fn select_haste_provider(&self, name: String) {
        let Some(handle) = self.store.get_haste_module(&name) else { return };
        let live = self
            .store
            .get_all_haste_providers_exclusive(handle, |_, f| self.store.is_logically_deleted_from_haste(f, handle));
        match live.first().copied() {
            Some(provider) => {
                self.store.advance_haste_provider_entity(handle, Some(provider), self.txn);
                self.no_providers.lock().remove(&PendingRemoval::Haste(name));
            }
            None => {
                self.store.advance_haste_provider_entity(handle, None, self.txn);
                self.no_providers.lock().insert(PendingRemoval::Haste(name));
            }
        }
    }

    fn select_file_module_provider(&self, key: FileKey) {
        let Some(handle) = self.store.get_file_module(&key) else { return };
        let live = self
            .store
            .get_all_file_module_providers_exclusive(handle, |_, f| self.store.is_logically_deleted_from_file_module(f));
        match live.first().copied() {
            Some(provider) => {
                self.store.advance_file_module_provider_entity(handle, Some(provider), self.txn);
                self.no_providers.lock().remove(&PendingRemoval::File(key));
            }
            None => {
                self.store.advance_file_module_provider_entity(handle, None, self.txn);
                self.no_providers.lock().insert(PendingRemoval::File(key));
            }
        }
    }

    /// Removes every module still left with zero live providers from its
    /// table, then advances the store's committed-visibility counter so the
    /// provider selections this mutator made become visible to committed
    /// readers. This is the only point at which module records disappear.
    pub fn commit(&self) {
        with_no_cancellations(|| {
            let pending = std::mem::take(&mut *self.no_providers.lock());
            let removed = pending.len() as u64;
            for removal in pending {
                match removal {
                    PendingRemoval::Haste(name) => {
                        tracing::debug!(%name, "removing haste module with no live providers");
                        self.store.remove_haste_module(&name);
                    }
                    PendingRemoval::File(key) => {
                        tracing::debug!(?key, "removing file module with no live providers");
                        self.store.remove_file_module(&key);
                    }
                }
            }
            crate::metrics::record_commit_modules_removed(removed);
            self.store.commit_txn(self.txn);
        })
    }

    /// Clears the pending "no providers" set without touching any table.
    pub fn rollback(&self) {
        with_no_cancellations(|| self.no_providers.lock().clear())
    }
}

#[cfg(test)]
#[path = "commit_modules_test.rs"]
mod commit_modules_test;
