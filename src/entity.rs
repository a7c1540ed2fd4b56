//! Entity discipline.
//!
//! An `Entity<T>` is a two-slot (committed/latest) cell with a per-transaction
//! generation. It is the mechanism that lets a mutator publish a value that is
//! visible to in-transaction readers (`read_latest`) while readers outside the
//! transaction keep seeing the old value until the transaction actually
//! commits — and lets a rollback undo exactly the writes made in the current
//! transaction with no per-write undo log.
//!
//! `read_committed` alone can't tell whether its own last writer has actually
//! committed yet, since promoting `latest` into `committed` only happens
//! lazily, as a side effect of the *next* write to the same entity. So it
//! takes the store's committed-transaction counter (the highest transaction
//! id known to have committed) and consults the entity's own generation
//! against it: a generation no newer than that counter means this entity's
//! latest write has already committed, even if no later write has come along
//! to promote it into the `committed` slot yet.

/// Monotonically increasing transaction counter. `0` is reserved to mean "no
/// transaction has written this entity yet" — real transactions are numbered
/// starting at 1, so `generation < current_txn` is true for a fresh entity
/// against any live transaction.
pub type TxnId = u64;

#[derive(Clone, Copy, Debug)]
pub struct Entity<T> {
    committed: T,
    latest: T,
    generation: TxnId,
}

impl<T: Copy> Entity<T> {
    pub fn new(initial: T) -> Self {
        Entity { committed: initial, latest: initial, generation: 0 }
    }

    pub fn read_latest(&self) -> T {
        self.latest
    }

    /// Reads the value a committed reader sees, given `committed_txn` — the
    /// highest transaction id the store knows to have committed. A
    /// generation no newer than `committed_txn` means this entity's `latest`
    /// write is itself already committed, even though the lazy promotion
    /// into `committed` hasn't run yet; anything newer (or unwritten,
    /// generation `0`) falls back to the `committed` slot.
    pub fn read_committed(&self, committed_txn: TxnId) -> T {
        if self.generation != 0 && self.generation <= committed_txn {
            self.latest
        } else {
            self.committed
        }
    }

    /// Publishes `value` as the latest value under transaction `current_txn`.
    ///
    /// The first write in a given transaction snapshots the prior latest
    /// value into `committed` (so it survives a rollback) and bumps the
    /// generation; subsequent writes within the *same* transaction just
    /// overwrite `latest` in place, since the snapshot was already taken.
    pub fn advance(&mut self, value: T, current_txn: TxnId) {
        if self.generation < current_txn {
            self.committed = self.latest;
            self.generation = current_txn;
        }
        self.latest = value;
    }

    /// Undoes every `advance` made under `current_txn`. A no-op if this
    /// entity was never written in that transaction.
    pub fn rollback(&mut self, current_txn: TxnId) {
        if self.generation == current_txn {
            self.latest = self.committed;
            self.generation = 0;
        }
    }

    /// True if this entity was written at all under `current_txn`.
    pub fn was_written_in(&self, current_txn: TxnId) -> bool {
        self.generation == current_txn
    }
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;
