//! Records and the intrusive provider-list primitives they anchor.

use crate::arena::{Arena, Handle};
use crate::blob::Blob;
use crate::entity::Entity;
use crate::interner::InternedStr;
use crate::keys::FileKey;

pub type FileHandle = Handle<FileRecord>;
pub type ParseHandle = Handle<ParseRecord>;
pub type FileModuleHandle = Handle<FileModuleRecord>;
pub type HasteModuleHandle = Handle<HasteModuleRecord>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FileKind {
    Source,
    Json,
    Resource,
    Lib,
}

impl From<&FileKey> for FileKind {
    fn from(key: &FileKey) -> Self {
        match key {
            FileKey::Source(_) => FileKind::Source,
            FileKey::Json(_) => FileKind::Json,
            FileKey::Resource(_) => FileKind::Resource,
            FileKey::Lib(_) => FileKind::Lib,
            FileKey::Builtins => panic!("Builtins is a synthetic key and is never a storable file kind"),
        }
    }
}

/// A file record. Created once per key and never replaced: only its
/// `parse_entity` advances.
pub struct FileRecord {
    pub kind: FileKind,
    pub name: InternedStr,
    pub file_module: Option<FileModuleHandle>,
    pub parse_entity: Entity<Option<ParseHandle>>,
    /// Next file in the eponymous file-module's all-providers list. A
    /// file-module's list holds at most the single eponymous file, so this
    /// is really just an optional tombstone-free singleton link, but it
    /// shares the same mechanics as `next_haste_provider` so both kinds of
    /// list can use one set of generic operations (see `ListKind` below).
    pub(crate) next_file_provider: Option<FileHandle>,
    pub(crate) next_haste_provider: Option<FileHandle>,
}

impl FileRecord {
    pub fn new(kind: FileKind, name: InternedStr) -> Self {
        FileRecord {
            kind,
            name,
            file_module: None,
            parse_entity: Entity::new(None),
            next_file_provider: None,
            next_haste_provider: None,
        }
    }
}

/// A typed parse: produced once a worker has run the full checker front-end
/// over the file.
pub struct TypedParse {
    pub hash: u64,
    pub haste_module: Option<HasteModuleHandle>,
    pub exports: Blob,
    pub ast: Blob,
    pub docblock: Blob,
    pub aloc_table: Blob,
    pub file_sig: Blob,
    pub type_sig: Blob,
}

/// An untyped parse: produced when only the hash and the haste-name
/// declaration were extracted (no type-checking front-end ran).
pub struct UntypedParse {
    pub hash: u64,
    pub haste_module: Option<HasteModuleHandle>,
}

pub enum ParseRecord {
    Typed(TypedParse),
    Untyped(UntypedParse),
}

impl ParseRecord {
    pub fn hash(&self) -> u64 {
        match self {
            ParseRecord::Typed(p) => p.hash,
            ParseRecord::Untyped(p) => p.hash,
        }
    }

    pub fn haste_module(&self) -> Option<HasteModuleHandle> {
        match self {
            ParseRecord::Typed(p) => p.haste_module,
            ParseRecord::Untyped(p) => p.haste_module,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, ParseRecord::Typed(_))
    }

    pub fn as_typed(&self) -> Option<&TypedParse> {
        match self {
            ParseRecord::Typed(p) => Some(p),
            ParseRecord::Untyped(_) => None,
        }
    }
}

/// The part of a module record that is common to both module kinds: the
/// entity tracking the currently-chosen provider, and the head of the
/// intrusive all-providers list.
///
/// `list_lock` is the exclusive module lock callers of
/// `add_provider`/`remove_provider_exclusive`/`get_all_providers_exclusive`
/// must be holding; callers must lock it for the duration of the list
/// operation.
pub struct ModuleCore {
    pub provider_entity: Entity<Option<FileHandle>>,
    pub all_providers_head: Option<FileHandle>,
    pub list_lock: parking_lot::Mutex<()>,
}

impl ModuleCore {
    pub fn new() -> Self {
        ModuleCore {
            provider_entity: Entity::new(None),
            all_providers_head: None,
            list_lock: parking_lot::Mutex::new(()),
        }
    }
}

impl Default for ModuleCore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FileModuleRecord {
    pub core: ModuleCore,
}

impl FileModuleRecord {
    pub fn new() -> Self {
        FileModuleRecord { core: ModuleCore::new() }
    }
}

impl Default for FileModuleRecord {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HasteModuleRecord {
    pub name: InternedStr,
    pub core: ModuleCore,
}

impl HasteModuleRecord {
    pub fn new(name: InternedStr) -> Self {
        HasteModuleRecord { name, core: ModuleCore::new() }
    }
}

/// Selects which of a `FileRecord`'s two link fields a generic list operation
/// threads through, so `add_provider`/`remove_provider_exclusive`/`traverse`
/// need only be written once and reused for both module kinds.
pub trait ListKind {
    fn next(file: &FileRecord) -> Option<FileHandle>;
    fn set_next(file: &mut FileRecord, next: Option<FileHandle>);
}

pub struct FileModuleList;
impl ListKind for FileModuleList {
    fn next(file: &FileRecord) -> Option<FileHandle> {
        file.next_file_provider
    }
    fn set_next(file: &mut FileRecord, next: Option<FileHandle>) {
        file.next_file_provider = next;
    }
}

pub struct HasteModuleList;
impl ListKind for HasteModuleList {
    fn next(file: &FileRecord) -> Option<FileHandle> {
        file.next_haste_provider
    }
    fn set_next(file: &mut FileRecord, next: Option<FileHandle>) {
        file.next_haste_provider = next;
    }
}

/// Appends `file` to the end of the list anchored at `*head`, preserving
/// declaration order (`get_all_providers_exclusive` returns the live
/// providers in declaration order). Must be called only from an exclusive
/// section.
pub fn add_provider<L: ListKind>(
    files: &mut Arena<FileRecord>,
    head: &mut Option<FileHandle>,
    file: FileHandle,
) {
    L::set_next(files.get_mut(file), None);
    match *head {
        None => *head = Some(file),
        Some(mut cursor) => {
            loop {
                match L::next(files.get(cursor)) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
            L::set_next(files.get_mut(cursor), Some(file));
        }
    }
}

/// Physically unlinks `file` from the list anchored at `*head`, if present.
/// Used for the non-lazy removals needed when rolling back a file's *new*
/// module memberships (as opposed to the lazy GC used for everyday deferred
/// deletion).
pub fn remove_provider_exclusive<L: ListKind>(
    files: &mut Arena<FileRecord>,
    head: &mut Option<FileHandle>,
    file: FileHandle,
) {
    let mut prev: Option<FileHandle> = None;
    let mut cursor = *head;
    while let Some(h) = cursor {
        let next = L::next(files.get(h));
        if h == file {
            match prev {
                Some(p) => L::set_next(files.get_mut(p), next),
                None => *head = next,
            }
            L::set_next(files.get_mut(h), None);
            return;
        }
        prev = Some(h);
        cursor = next;
    }
}

/// Traverses every node currently linked into the list, including
/// logically-deleted ones, without unlinking anything. Used where the caller
/// does its own filtering (e.g. rollback's re-traversal under a different
/// parse state).
pub fn traverse_all_exclusive<L: ListKind>(
    files: &Arena<FileRecord>,
    head: Option<FileHandle>,
) -> Vec<FileHandle> {
    let mut out = Vec::new();
    let mut cursor = head;
    while let Some(h) = cursor {
        out.push(h);
        cursor = L::next(files.get(h));
    }
    out
}

/// The lazy GC: returns the live providers in declaration order, physically
/// unlinking any node `is_logically_deleted` reports as dead along the way.
/// Must run from an exclusive section.
///
/// `is_logically_deleted` receives the live `&FileRecord` directly (rather
/// than making the caller look it up again) since this function already
/// holds the arena write lock for the whole traversal: a predicate that
/// needed to re-borrow `files` itself would deadlock against that lock.
pub fn get_all_providers_exclusive<L: ListKind>(
    files: &mut Arena<FileRecord>,
    head: &mut Option<FileHandle>,
    mut is_logically_deleted: impl FnMut(FileHandle, &FileRecord) -> bool,
) -> Vec<FileHandle> {
    let mut live = Vec::new();
    let mut prev: Option<FileHandle> = None;
    let mut cursor = *head;
    while let Some(h) = cursor {
        let next = L::next(files.get(h));
        if is_logically_deleted(h, files.get(h)) {
            tracing::trace!(?h, "lazy GC: unlinking logically-deleted provider");
            crate::metrics::record_lazy_gc_unlink();
            match prev {
                Some(p) => L::set_next(files.get_mut(p), next),
                None => *head = next,
            }
        } else {
            live.push(h);
            prev = Some(h);
        }
        cursor = next;
    }
    live
}

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;
