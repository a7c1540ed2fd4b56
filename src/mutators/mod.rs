//! Mutators: the three worker-callable entry points that publish artifacts
//! into the store. `apply_new_parse` and `clear_file` hold the shared
//! algorithms that both the [`ParseMutator`] and the [`ReparseMutator`]
//! drive; the mutators themselves differ only in whether they carry a
//! transaction and track changed/not-found sets for rollback.

mod commit_modules;
mod parse;
mod reparse;
mod saved_state;

pub use commit_modules::CommitModulesMutator;
pub use parse::ParseMutator;
pub use reparse::ReparseMutator;
pub use saved_state::SavedStateLoader;

use crate::blob::Blob;
use crate::dirty::{self, DirtySet, NamedHaste};
use crate::entity::TxnId;
use crate::keys::{FileKey, ModuleName};
use crate::records::{ParseRecord, TypedParse, UntypedParse};
use crate::store::Store;

/// The worker-supplied artifacts for a freshly (re)parsed file, or the
/// lighter-weight untyped shape for a file that was only hashed.
pub enum NewParse {
    Typed {
        hash: u64,
        haste_name: Option<String>,
        docblock: Blob,
        ast: Blob,
        aloc_table: Blob,
        type_sig: Blob,
        file_sig: Blob,
        exports: Blob,
    },
    Untyped { hash: u64, haste_name: Option<String> },
}

impl NewParse {
    fn hash(&self) -> u64 {
        match self {
            NewParse::Typed { hash, .. } => *hash,
            NewParse::Untyped { hash, .. } => *hash,
        }
    }

    fn haste_name(&self) -> Option<&str> {
        match self {
            NewParse::Typed { haste_name, .. } => haste_name.as_deref(),
            NewParse::Untyped { haste_name, .. } => haste_name.as_deref(),
        }
    }
}

fn named_haste(store: &Store, handle: Option<crate::records::HasteModuleHandle>) -> Option<NamedHaste> {
    handle.map(|h| NamedHaste { handle: h, name: store.with_haste_module(h, |m| m.name.to_string()) })
}

/// Publishes `new_parse` for `key` and returns the dirty modules. Shared between
/// `ParseMutator::add_parsed`/`add_unparsed` and `ReparseMutator`'s worker
/// callbacks, parameterized only by the transaction id advances are tagged
/// with.
pub(crate) fn apply_new_parse(store: &Store, txn: TxnId, key: FileKey, new_parse: NewParse) -> DirtySet {
    debug_assert!(key.is_storable(), "attempted to store a Builtins key");

    // Unchanged-hash fast path: no allocation at all.
    if let Some(existing_file) = store.get_file(&key) {
        let unchanged = store.with_file(existing_file, |f| f.parse_entity.read_latest()).is_some_and(|existing_parse| {
            store.with_parse(existing_parse, |p| p.is_typed() && p.hash() == new_parse.hash())
        });
        if unchanged {
            tracing::trace!(?key, "unchanged hash, skipping allocation");
            return DirtySet::new();
        }
    }

    let (file, is_fresh) = store.ensure_file(key.clone());

    let old_haste = store
        .with_file(file, |f| f.parse_entity.read_latest())
        .and_then(|old_parse| store.with_parse(old_parse, |p| p.haste_module()));
    let new_haste = new_parse.haste_name().map(|n| store.ensure_haste_module(n));

    let outcome = dirty::compute_haste_dirty(named_haste(store, old_haste), named_haste(store, new_haste));
    let mut dirty = outcome.dirty;

    if outcome.register_as_provider_of_new {
        if let Some(h) = new_haste {
            store.add_haste_provider(h, file);
        }
    }

    let record = match new_parse {
        NewParse::Typed { hash, docblock, ast, aloc_table, type_sig, file_sig, exports, .. } => {
            ParseRecord::Typed(TypedParse {
                hash,
                haste_module: new_haste,
                exports,
                ast,
                docblock,
                aloc_table,
                file_sig,
                type_sig,
            })
        }
        NewParse::Untyped { hash, .. } => ParseRecord::Untyped(UntypedParse { hash, haste_module: new_haste }),
    };
    let parse_handle = store.alloc_parse(record);
    store.with_file_mut(file, |f| f.parse_entity.advance(Some(parse_handle), txn));

    // Always add the eponymous file-module to the dirty set; register the
    // file as its (only ever) provider exactly once, at creation.
    if let Some(fm) = store.with_file(file, |f| f.file_module) {
        dirty.insert(ModuleName::File(key));
        if is_fresh {
            store.add_file_module_provider(fm, file);
        }
    }

    crate::metrics::record_dirty_set_size(dirty.len());
    dirty
}

/// Advances the file's parse-entity to `None` if it currently has one,
/// returning the dirty set. No physical unlinking — deletion is deferred to
/// the next exclusive traversal.
pub(crate) fn clear_file(store: &Store, txn: TxnId, key: &FileKey) -> DirtySet {
    let Some(file) = store.get_file(key) else {
        return DirtySet::new();
    };
    let Some(old_parse) = store.with_file(file, |f| f.parse_entity.read_latest()) else {
        return DirtySet::new();
    };

    store.with_file_mut(file, |f| f.parse_entity.advance(None, txn));

    let mut dirty = DirtySet::new();
    if store.with_file(file, |f| f.file_module).is_some() {
        dirty.insert(ModuleName::File(key.clone()));
    }
    let old_haste = store.with_parse(old_parse, |p| p.haste_module());
    if let Some(h) = old_haste {
        let name = store.with_haste_module(h, |m| m.name.to_string());
        dirty.insert(ModuleName::Haste(name));
    }
    crate::metrics::record_dirty_set_size(dirty.len());
    dirty
}
