//! The parse mutator: fresh parsing with no rollback support and no
//! transaction hook, used for an initial load where there is no prior
//! committed state to revert to.

use crate::blob::Blob;
use crate::cancellation::with_no_cancellations;
use crate::dirty::DirtySet;
use crate::entity::TxnId;
use crate::keys::FileKey;
use crate::store::Store;

use super::{apply_new_parse, NewParse};

pub struct ParseMutator<'s> {
    store: &'s Store,
    txn: TxnId,
}

impl<'s> ParseMutator<'s> {
    pub fn new(store: &'s Store) -> Self {
        ParseMutator { store, txn: store.begin_txn() }
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
            let dirty = apply_new_parse(
                self.store,
                self.txn,
                key,
                NewParse::Typed { hash, haste_name, docblock, ast, aloc_table, type_sig, file_sig, exports },
            );
            // No transaction hook: this write is visible to committed
            // readers the instant it lands, since there is no later commit
            // to wait for.
            self.store.commit_txn(self.txn);
            dirty
        })
    }

    pub fn add_unparsed(&self, key: FileKey, hash: u64, haste_name: Option<String>) -> DirtySet {
        with_no_cancellations(|| {
            let dirty = apply_new_parse(self.store, self.txn, key, NewParse::Untyped { hash, haste_name });
            self.store.commit_txn(self.txn);
            dirty
        })
    }

    /// A no-op: the parse mutator has no prior committed state to clear
    /// anything from, so this always returns an empty dirty set without
    /// touching the store.
    pub fn clear_not_found(&self, _key: &FileKey) -> DirtySet {
        with_no_cancellations(DirtySet::new)
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod parse_test;
