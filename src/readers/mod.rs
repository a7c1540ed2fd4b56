//! Readers.
//!
//! "Which snapshot to read" is modeled as a tagged union over reader flavors
//! rather than per-record vtables; `Snapshot` is that tagged union, and
//! `Reader` is the single implementation both `MutatorReader` and
//! `CommittedReader` delegate to, parameterized by which slot of an `Entity`
//! it reads.

mod committed_reader;
mod dispatcher;
mod mutator_reader;

pub use committed_reader::CommittedReader;
pub use dispatcher::Dispatcher;
pub use mutator_reader::MutatorReader;

use crate::blob::Blob;
use crate::cache::ReaderCaches;
use crate::entity::{Entity, TxnId};
use crate::error::{LookupError, LookupResult};
use crate::keys::{FileKey, ModuleName};
use crate::records::{FileHandle, ParseHandle, ParseRecord};
use crate::store::Store;

/// Which of an entity's two slots a read sees.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Snapshot {
    Latest,
    Committed,
}

impl Snapshot {
    /// `committed_txn` is only consulted for `Snapshot::Committed`; pass
    /// whatever `Store::committed_txn` reads at call time.
    fn parse_of(self, entity: &Entity<Option<ParseHandle>>, committed_txn: TxnId) -> Option<ParseHandle> {
        match self {
            Snapshot::Latest => entity.read_latest(),
            Snapshot::Committed => entity.read_committed(committed_txn),
        }
    }

    fn provider_of(self, entity: &Entity<Option<FileHandle>>, committed_txn: TxnId) -> Option<FileHandle> {
        match self {
            Snapshot::Latest => entity.read_latest(),
            Snapshot::Committed => entity.read_committed(committed_txn),
        }
    }
}

/// An abstract location, as produced by the parser/type-checker for a
/// location inside a file; opaque here since decoding it is the
/// location-table packer's job, not this store's.
pub type AbstractLoc = u32;
/// A concrete `(line, column)` location.
pub type ConcreteLoc = (u32, u32);

/// The collaborator that actually knows how to read an aloc-table blob.
/// Kept as a trait rather than a hardcoded format since the table's binary
/// layout lives outside this crate.
pub trait AlocTableDecoder {
    fn resolve(&self, aloc_table: &Blob, loc: AbstractLoc) -> Option<ConcreteLoc>;
}

/// The uniform read API, implemented once and shared by [`MutatorReader`]
/// and [`CommittedReader`].
pub struct Reader<'s> {
    store: &'s Store,
    caches: &'s ReaderCaches,
    snapshot: Snapshot,
}

impl<'s> Reader<'s> {
    pub fn new(store: &'s Store, caches: &'s ReaderCaches, snapshot: Snapshot) -> Self {
        Reader { store, caches, snapshot }
    }

    fn file_handle(&self, key: &FileKey) -> Option<FileHandle> {
        self.store.get_file(key)
    }

    fn parse_handle(&self, key: &FileKey) -> Option<ParseHandle> {
        let file = self.file_handle(key)?;
        let committed_txn = self.store.committed_txn();
        self.store.with_file(file, |f| self.snapshot.parse_of(&f.parse_entity, committed_txn))
    }

    pub fn get_parse(&self, key: &FileKey) -> Option<ParseHandle> {
        self.parse_handle(key)
    }

    pub fn get_parse_unsafe(&self, key: &FileKey) -> LookupResult<ParseHandle> {
        if self.file_handle(key).is_none() {
            return Err(LookupError::FileNotFound);
        }
        self.parse_handle(key).ok_or(LookupError::FileNotParsed)
    }

    pub fn get_typed_parse(&self, key: &FileKey) -> Option<ParseHandle> {
        let parse = self.parse_handle(key)?;
        self.store.with_parse(parse, |p| p.is_typed()).then_some(parse)
    }

    pub fn get_typed_parse_unsafe(&self, key: &FileKey) -> LookupResult<ParseHandle> {
        let parse = self.get_parse_unsafe(key)?;
        if self.store.with_parse(parse, |p| p.is_typed()) {
            Ok(parse)
        } else {
            Err(LookupError::FileNotTyped)
        }
    }

    pub fn is_typed_file(&self, key: &FileKey) -> bool {
        self.get_typed_parse(key).is_some()
    }

    pub fn has_ast(&self, key: &FileKey) -> bool {
        self.get_typed_parse(key).is_some()
    }

    pub fn get_file_hash(&self, key: &FileKey) -> Option<u64> {
        let parse = self.parse_handle(key)?;
        Some(self.store.with_parse(parse, |p| p.hash()))
    }

    pub fn get_file_hash_unsafe(&self, key: &FileKey) -> LookupResult<u64> {
        let parse = self.get_parse_unsafe(key)?;
        Ok(self.store.with_parse(parse, |p| p.hash()))
    }

    fn typed_blob(
        &self,
        key: &FileKey,
        field: impl Fn(&crate::records::TypedParse) -> &Blob,
    ) -> Option<Blob> {
        let file = self.file_handle(key)?;
        let committed_txn = self.store.committed_txn();
        let cache_lookup = || {
            let parse = self.store.with_file(file, |f| self.snapshot.parse_of(&f.parse_entity, committed_txn))?;
            self.store.with_parse(parse, |p| p.as_typed().map(field))
        };
        cache_lookup()
    }

    pub fn get_ast(&self, key: &FileKey) -> Option<Blob> {
        let file = self.file_handle(key)?;
        self.caches.get_or_compute_ast(file, || self.typed_blob(key, |p| &p.ast))
    }

    pub fn get_ast_unsafe(&self, key: &FileKey) -> LookupResult<Blob> {
        self.get_parse_unsafe(key)?;
        self.get_ast(key).ok_or(LookupError::AstNotFound)
    }

    pub fn get_aloc_table(&self, key: &FileKey) -> Option<Blob> {
        let file = self.file_handle(key)?;
        self.caches.get_or_compute_aloc_table(file, || self.typed_blob(key, |p| &p.aloc_table))
    }

    pub fn get_aloc_table_unsafe(&self, key: &FileKey) -> LookupResult<Blob> {
        self.get_parse_unsafe(key)?;
        self.get_aloc_table(key).ok_or(LookupError::AlocTableNotFound)
    }

    pub fn get_docblock(&self, key: &FileKey) -> Option<Blob> {
        self.typed_blob(key, |p| &p.docblock)
    }

    pub fn get_docblock_unsafe(&self, key: &FileKey) -> LookupResult<Blob> {
        self.get_parse_unsafe(key)?;
        self.get_docblock(key).ok_or(LookupError::DocblockNotFound)
    }

    pub fn get_exports(&self, key: &FileKey) -> Option<Blob> {
        self.typed_blob(key, |p| &p.exports)
    }

    pub fn get_file_sig(&self, key: &FileKey) -> Option<Blob> {
        self.typed_blob(key, |p| &p.file_sig)
    }

    pub fn get_file_sig_unsafe(&self, key: &FileKey) -> LookupResult<Blob> {
        self.get_parse_unsafe(key)?;
        self.get_file_sig(key).ok_or(LookupError::RequiresNotFound)
    }

    /// Like `get_file_sig`, but tolerates an untyped (or missing) parse by
    /// returning `None` instead of treating it as a miss worth distinguishing
    /// from "no signature".
    pub fn get_tolerable_file_sig(&self, key: &FileKey) -> Option<Blob> {
        self.get_file_sig(key)
    }

    pub fn get_type_sig(&self, key: &FileKey) -> Option<Blob> {
        self.typed_blob(key, |p| &p.type_sig)
    }

    pub fn get_type_sig_unsafe(&self, key: &FileKey) -> LookupResult<Blob> {
        self.get_parse_unsafe(key)?;
        self.get_type_sig(key).ok_or(LookupError::TypeSigNotFound)
    }

    pub fn get_provider(&self, module: &ModuleName) -> Option<FileKey> {
        let committed_txn = self.store.committed_txn();
        let file = match module {
            ModuleName::Haste(name) => {
                let handle = self.store.get_haste_module(name)?;
                self.store
                    .with_haste_module(handle, |m| self.snapshot.provider_of(&m.core.provider_entity, committed_txn))?
            }
            ModuleName::File(key) => {
                let handle = self.store.get_file_module(key)?;
                self.store
                    .with_file_module(handle, |m| self.snapshot.provider_of(&m.core.provider_entity, committed_txn))?
            }
        };
        Some(self.store.with_file(file, |f| key_of(f)))
    }

    pub fn get_provider_unsafe(&self, module: &ModuleName) -> LookupResult<FileKey> {
        self.get_provider(module).ok_or_else(|| match module {
            ModuleName::Haste(name) => LookupError::HasteModuleNotFound(name.clone()),
            ModuleName::File(_) => LookupError::FileModuleNotFound(module.clone()),
        })
    }

    pub fn loc_of_aloc(
        &self,
        key: &FileKey,
        loc: AbstractLoc,
        decoder: &impl AlocTableDecoder,
    ) -> Option<ConcreteLoc> {
        let table = self.get_aloc_table(key)?;
        decoder.resolve(&table, loc)
    }
}

/// Recovers a `FileKey` from a live `FileRecord`. The store's tables are
/// keyed by `FileKey`, but a `FileRecord` itself only stores the interned
/// name and kind — reconstructing a path-bearing key from those is good
/// enough for `Source`/`Json`/`Resource`/`Lib` since the interned name is
/// exactly the path they were created with.
fn key_of(file: &crate::records::FileRecord) -> FileKey {
    use crate::records::FileKind;
    use std::path::PathBuf;
    let path = PathBuf::from(file.name.as_ref());
    match file.kind {
        FileKind::Source => FileKey::Source(path),
        FileKind::Json => FileKey::Json(path),
        FileKind::Resource => FileKey::Resource(path),
        FileKind::Lib => FileKey::Lib(path),
    }
}
