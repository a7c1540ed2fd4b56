//! The store: the keyed tables plus the arenas they index into, and the
//! handful of operations that need more than one arena locked at once
//! (creating records, threading the provider lists).
//!
//! A cheaply cloned handle onto shared state, in the spirit of a reader/writer
//! pair over a shared environment — but since there is no on-disk environment
//! to open, a `Store` owns its arenas directly behind `parking_lot::RwLock`,
//! which stands in for the single-writer/many-reader discipline an embedded
//! database gets for free from its storage engine.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::entity::TxnId;
use crate::interner::Interner;
use crate::keys::FileKey;
use crate::records::{
    self, FileHandle, FileKind, FileModuleHandle, FileModuleList, FileModuleRecord, FileRecord,
    HasteModuleHandle, HasteModuleList, HasteModuleRecord, ParseHandle, ParseRecord,
};
use crate::arena::Arena;
use crate::config::StoreConfig;

pub struct Store {
    pub(crate) interner: Interner,

    pub(crate) files: RwLock<Arena<FileRecord>>,
    pub(crate) parses: RwLock<Arena<ParseRecord>>,
    pub(crate) file_modules: RwLock<Arena<FileModuleRecord>>,
    pub(crate) haste_modules: RwLock<Arena<HasteModuleRecord>>,

    pub(crate) file_table: DashMap<FileKey, FileHandle>,
    pub(crate) file_module_table: DashMap<FileKey, FileModuleHandle>,
    pub(crate) haste_module_table: DashMap<String, HasteModuleHandle>,

    txn_counter: AtomicU64,
    committed_txn: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Store {
            interner: Interner::new(),
            files: RwLock::new(Arena::new()),
            parses: RwLock::new(Arena::new()),
            file_modules: RwLock::new(Arena::new()),
            haste_modules: RwLock::new(Arena::new()),
            file_table: DashMap::new(),
            file_module_table: DashMap::new(),
            haste_module_table: DashMap::new(),
            txn_counter: AtomicU64::new(0),
            committed_txn: AtomicU64::new(0),
        }
    }

    /// Builds a store whose arenas are preallocated per `config` instead of
    /// starting empty. Validation is the caller's job (`config.validate()`);
    /// a store built from a config that failed validation would just run
    /// with whatever capacities it was given.
    pub fn with_config(config: &StoreConfig) -> Self {
        Store {
            interner: Interner::new(),
            files: RwLock::new(Arena::with_capacity(config.initial_file_capacity)),
            parses: RwLock::new(Arena::with_capacity(config.initial_parse_capacity)),
            file_modules: RwLock::new(Arena::with_capacity(config.initial_module_capacity)),
            haste_modules: RwLock::new(Arena::with_capacity(config.initial_module_capacity)),
            file_table: DashMap::new(),
            file_module_table: DashMap::new(),
            haste_module_table: DashMap::new(),
            txn_counter: AtomicU64::new(0),
            committed_txn: AtomicU64::new(0),
        }
    }

    /// Allocates a fresh transaction id. `0` stays reserved for "never
    /// written", so the counter starts at 1.
    pub fn begin_txn(&self) -> TxnId {
        self.txn_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_txn_counter(&self) -> TxnId {
        self.txn_counter.load(Ordering::SeqCst)
    }

    /// Marks `txn` as committed, advancing the store's committed-visibility
    /// counter if `txn` is newer than whatever it already holds. Idempotent,
    /// and safe to call more than once for the same `txn`.
    pub fn commit_txn(&self, txn: TxnId) {
        self.committed_txn.fetch_max(txn, Ordering::SeqCst);
    }

    /// The highest transaction id known to have committed. Every
    /// `Entity::read_committed` call a committed reader makes is relative to
    /// this counter.
    pub fn committed_txn(&self) -> TxnId {
        self.committed_txn.load(Ordering::SeqCst)
    }

    pub fn get_file(&self, key: &FileKey) -> Option<FileHandle> {
        self.file_table.get(key).map(|e| *e)
    }

    pub fn get_file_module(&self, key: &FileKey) -> Option<FileModuleHandle> {
        self.file_module_table.get(key).map(|e| *e)
    }

    pub fn get_haste_module(&self, name: &str) -> Option<HasteModuleHandle> {
        self.haste_module_table.get(name).map(|e| *e)
    }

    /// Creates the `File` record for `key` if it doesn't already exist,
    /// eagerly creating its eponymous file-module too unless `key` is a
    /// `Lib` file. Idempotent: a second call with the same key returns the
    /// existing handle and `false`. Returns `true` alongside a fresh handle
    /// when this call is the one that created the file record (the fresh
    /// path, as opposed to an update to an already-known file).
    pub fn ensure_file(&self, key: FileKey) -> (FileHandle, bool) {
        if let Some(existing) = self.get_file(&key) {
            return (existing, false);
        }
        let name = self.interner.intern(
            key.path().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default().as_str(),
        );
        let kind = FileKind::from(&key);
        let has_own_module = key.has_eponymous_file_module();

        let file_module = if has_own_module {
            let fm_handle = self.file_modules.write().alloc(FileModuleRecord::new());
            Some(fm_handle)
        } else {
            None
        };

        let mut file_record = FileRecord::new(kind, name);
        file_record.file_module = file_module;
        let file_handle = self.files.write().alloc(file_record);

        if let Some(fm_handle) = file_module {
            self.file_module_table.entry(key.clone()).or_insert(fm_handle);
        }
        // If a racing caller won, keep their handle rather than ours: both
        // arena slots are harmless (the arena never deallocates, §3), but
        // the table is the single source of truth for "the" handle for `key`.
        let winner = *self.file_table.entry(key).or_insert(file_handle);
        (winner, winner == file_handle)
    }

    pub fn ensure_haste_module(&self, name: &str) -> HasteModuleHandle {
        if let Some(existing) = self.get_haste_module(name) {
            return existing;
        }
        let interned = self.interner.intern(name);
        let handle = self.haste_modules.write().alloc(HasteModuleRecord::new(interned));
        *self.haste_module_table.entry(name.to_string()).or_insert(handle)
    }

    pub fn alloc_parse(&self, record: ParseRecord) -> ParseHandle {
        self.parses.write().alloc(record)
    }

    pub fn with_parse<R>(&self, handle: ParseHandle, f: impl FnOnce(&ParseRecord) -> R) -> R {
        f(self.parses.read().get(handle))
    }

    pub fn with_file<R>(&self, handle: FileHandle, f: impl FnOnce(&FileRecord) -> R) -> R {
        f(self.files.read().get(handle))
    }

    pub fn with_file_mut<R>(&self, handle: FileHandle, f: impl FnOnce(&mut FileRecord) -> R) -> R {
        f(self.files.write().get_mut(handle))
    }

    pub fn with_haste_module<R>(
        &self,
        handle: HasteModuleHandle,
        f: impl FnOnce(&HasteModuleRecord) -> R,
    ) -> R {
        f(self.haste_modules.read().get(handle))
    }

    pub fn with_file_module<R>(
        &self,
        handle: FileModuleHandle,
        f: impl FnOnce(&FileModuleRecord) -> R,
    ) -> R {
        f(self.file_modules.read().get(handle))
    }

    /// Appends `file` to the haste module's all-providers list. Must be
    /// called from an exclusive context; takes the module's list lock
    /// itself, then the files arena write lock, in that fixed order.
    pub fn add_haste_provider(&self, module: HasteModuleHandle, file: FileHandle) {
        let modules = self.haste_modules.read();
        let core = &modules.get(module).core;
        let _guard = core.list_lock.lock();
        let mut head = core.all_providers_head;
        records::add_provider::<HasteModuleList>(&mut self.files.write(), &mut head, file);
        drop(modules);
        self.haste_modules.write().get_mut(module).core.all_providers_head = head;
    }

    pub fn remove_haste_provider_exclusive(&self, module: HasteModuleHandle, file: FileHandle) {
        let mut head = self.haste_modules.read().get(module).core.all_providers_head;
        let modules = self.haste_modules.read();
        let _guard_holder = modules.get(module).core.list_lock.lock();
        records::remove_provider_exclusive::<HasteModuleList>(&mut self.files.write(), &mut head, file);
        drop(_guard_holder);
        drop(modules);
        self.haste_modules.write().get_mut(module).core.all_providers_head = head;
    }

    /// Runs the lazy GC over a haste module's all-providers list and returns
    /// the live providers in declaration order.
    pub fn get_all_haste_providers_exclusive(
        &self,
        module: HasteModuleHandle,
        is_logically_deleted: impl FnMut(FileHandle, &FileRecord) -> bool,
    ) -> Vec<FileHandle> {
        let mut head = self.haste_modules.read().get(module).core.all_providers_head;
        let live = {
            let modules = self.haste_modules.read();
            let _guard = modules.get(module).core.list_lock.lock();
            records::get_all_providers_exclusive::<HasteModuleList>(
                &mut self.files.write(),
                &mut head,
                is_logically_deleted,
            )
        };
        self.haste_modules.write().get_mut(module).core.all_providers_head = head;
        live
    }

    pub fn add_file_module_provider(&self, module: FileModuleHandle, file: FileHandle) {
        let mut head = self.file_modules.read().get(module).core.all_providers_head;
        {
            let modules = self.file_modules.read();
            let _guard = modules.get(module).core.list_lock.lock();
            records::add_provider::<FileModuleList>(&mut self.files.write(), &mut head, file);
        }
        self.file_modules.write().get_mut(module).core.all_providers_head = head;
    }

    pub fn get_all_file_module_providers_exclusive(
        &self,
        module: FileModuleHandle,
        is_logically_deleted: impl FnMut(FileHandle, &FileRecord) -> bool,
    ) -> Vec<FileHandle> {
        let mut head = self.file_modules.read().get(module).core.all_providers_head;
        let live = {
            let modules = self.file_modules.read();
            let _guard = modules.get(module).core.list_lock.lock();
            records::get_all_providers_exclusive::<FileModuleList>(
                &mut self.files.write(),
                &mut head,
                is_logically_deleted,
            )
        };
        self.file_modules.write().get_mut(module).core.all_providers_head = head;
        live
    }

    pub fn remove_file_module_provider_exclusive(&self, module: FileModuleHandle, file: FileHandle) {
        let mut head = self.file_modules.read().get(module).core.all_providers_head;
        {
            let modules = self.file_modules.read();
            let _guard = modules.get(module).core.list_lock.lock();
            records::remove_provider_exclusive::<FileModuleList>(&mut self.files.write(), &mut head, file);
        }
        self.file_modules.write().get_mut(module).core.all_providers_head = head;
    }

    pub fn rollback_haste_provider_entity(&self, module: HasteModuleHandle, txn: TxnId) {
        self.haste_modules.write().get_mut(module).core.provider_entity.rollback(txn);
    }

    pub fn rollback_file_module_provider_entity(&self, module: FileModuleHandle, txn: TxnId) {
        self.file_modules.write().get_mut(module).core.provider_entity.rollback(txn);
    }

    pub fn advance_haste_provider_entity(&self, module: HasteModuleHandle, provider: Option<FileHandle>, txn: TxnId) {
        self.haste_modules.write().get_mut(module).core.provider_entity.advance(provider, txn);
    }

    pub fn advance_file_module_provider_entity(
        &self,
        module: FileModuleHandle,
        provider: Option<FileHandle>,
        txn: TxnId,
    ) {
        self.file_modules.write().get_mut(module).core.provider_entity.advance(provider, txn);
    }

    /// The "logically deleted from a haste module" predicate: `F` is dead to
    /// `M` once its committed parse points at `M` but its latest parse
    /// doesn't (or has none). Takes the already-borrowed `&FileRecord` rather
    /// than re-locking `self.files` (see `records::get_all_providers_exclusive`'s
    /// doc comment).
    pub fn is_logically_deleted_from_haste(&self, file: &FileRecord, module: HasteModuleHandle) -> bool {
        let committed_points_here = file
            .parse_entity
            .read_committed(self.committed_txn())
            .map(|p| self.with_parse(p, |pr| pr.haste_module()))
            .flatten()
            == Some(module);
        if !committed_points_here {
            return false;
        }
        match file.parse_entity.read_latest() {
            None => true,
            Some(p) => self.with_parse(p, |pr| pr.haste_module()) != Some(module),
        }
    }

    /// The "logically deleted from a file module" predicate: `F` is dead to
    /// its eponymous module once its latest parse is `None`.
    pub fn is_logically_deleted_from_file_module(&self, file: &FileRecord) -> bool {
        file.parse_entity.read_latest().is_none()
    }

    /// Removes `key` from the file table only, as the reparse commit path
    /// does for files found missing on disk. The `File` record itself, and
    /// any module it was the sole provider of, are left for the next
    /// exclusive traversal / commit-modules pass to reclaim — no record ever
    /// deallocates another out from under a handle still in use elsewhere.
    pub fn remove_file(&self, key: &FileKey) {
        self.file_table.remove(key);
    }

    /// Removes a module record from its key→module table — the only point at
    /// which module records disappear from lookup. The arena slot itself is
    /// left in place, same as `remove_file`.
    pub fn remove_haste_module(&self, name: &str) {
        self.haste_module_table.remove(name);
    }

    pub fn remove_file_module(&self, key: &FileKey) {
        self.file_module_table.remove(key);
    }

    pub fn record_arena_sizes(&self) {
        crate::metrics::record_arena_sizes(
            self.files.read().len(),
            self.parses.read().len(),
            self.file_modules.read().len(),
            self.haste_modules.read().len(),
        );
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
