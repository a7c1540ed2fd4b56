//! A minimal concrete transaction coordinator standing in for the
//! process-wide one a real deployment would share across many unrelated
//! subsystems. This crate only needs the part of that contract its mutators
//! actually use: a generation id and an idempotent, singleton-keyed hook
//! registry invoked exactly once at commit or rollback.

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::entity::TxnId;

type Hook = Box<dyn FnOnce() + Send>;

struct Hooks {
    commit: Hook,
    rollback: Hook,
}

pub struct Transaction {
    id: TxnId,
    hooks: Mutex<IndexMap<&'static str, Hooks>>,
}

impl Transaction {
    pub fn new(id: TxnId) -> Self {
        Transaction { id, hooks: Mutex::new(IndexMap::new()) }
    }

    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Registers a commit/rollback hook pair under `singleton`. A second
    /// registration under the same name within one transaction is ignored.
    pub fn add(
        &self,
        singleton: &'static str,
        commit: impl FnOnce() + Send + 'static,
        rollback: impl FnOnce() + Send + 'static,
    ) {
        self.hooks
            .lock()
            .entry(singleton)
            .or_insert_with(|| Hooks { commit: Box::new(commit), rollback: Box::new(rollback) });
    }

    /// Runs every registered commit hook, in registration order, exactly
    /// once, then clears the registry.
    pub fn commit(&self) {
        let hooks = std::mem::take(&mut *self.hooks.lock());
        tracing::debug!(txn = self.id, hook_count = hooks.len(), "committing transaction");
        crate::metrics::record_commit();
        for (_, h) in hooks {
            (h.commit)();
        }
    }

    /// Runs every registered rollback hook, in registration order, exactly
    /// once, then clears the registry.
    pub fn rollback(&self) {
        let hooks = std::mem::take(&mut *self.hooks.lock());
        tracing::debug!(txn = self.id, hook_count = hooks.len(), "rolling back transaction");
        crate::metrics::record_rollback();
        for (_, h) in hooks {
            (h.rollback)();
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod transaction_test;
