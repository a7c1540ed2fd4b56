//! The saved-state loader: a restricted create path used exactly once during
//! startup to populate the heap from a previously persisted snapshot
//! (persistence itself is handled elsewhere; this only replays its output).
//! Like the parse mutator it never rolls back, but unlike it, it only ever
//! allocates typed parses — a saved state is, by construction, the output of
//! a prior successful type-check.

use crate::blob::Blob;
use crate::cancellation::with_no_cancellations;
use crate::dirty::DirtySet;
use crate::entity::TxnId;
use crate::keys::FileKey;
use crate::store::Store;

use super::{apply_new_parse, NewParse};

pub struct SavedStateLoader<'s> {
    store: &'s Store,
    txn: TxnId,
}

impl<'s> SavedStateLoader<'s> {
    pub fn new(store: &'s Store) -> Self {
        SavedStateLoader { store, txn: store.begin_txn() }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn load_typed(
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
            // Like the parse mutator, a loaded file is immediately committed:
            // there is no rollback path that would need it to stay pending.
            self.store.commit_txn(self.txn);
            dirty
        })
    }
}
