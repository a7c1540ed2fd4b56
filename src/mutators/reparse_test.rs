use std::sync::Arc;

use super::*;
use crate::cache::ReaderCaches;
use crate::keys::ModuleName;
use crate::mutators::ParseMutator;
use crate::readers::CommittedReader;
use crate::store::Store;

fn blob(b: &[u8]) -> Blob {
    Arc::from(b)
}

fn a_js() -> FileKey {
    FileKey::Source("a.js".into())
}

/// Seeds the store with the result of scenario 1 (`a.js` providing haste
/// module `A`), committed.
fn seed(store: &Store) {
    let mutator = ParseMutator::new(store);
    mutator.add_parsed(a_js(), 1, Some("A".to_string()), blob(b""), blob(b""), blob(b""), blob(b""), blob(b""), blob(b""));
    // The parse mutator has no transaction hook; its writes are already at
    // generation 0 relative to future transactions once we start allocating
    // new ones, so nothing further is needed to make this "committed".
}

#[test]
fn unchanged_reparse_dirties_only_the_file_module() {
    let store = Store::new();
    seed(&store);
    let mutator_caches = ReaderCaches::new(8, 8);
    let committed_caches = ReaderCaches::new(8, 8);

    let reparse = ReparseMutator::new(&store, [a_js()], &mutator_caches, &committed_caches);
    let dirty = reparse.add_parsed(a_js(), 1, Some("A".to_string()), blob(b""), blob(b""), blob(b""), blob(b""), blob(b""), blob(b""));

    assert_eq!(dirty, DirtySet::from([ModuleName::Haste("A".into()), ModuleName::File(a_js())]));
}

#[test]
fn haste_rename_then_rollback_restores_the_old_provider() {
    let store = Store::new();
    seed(&store);
    let mutator_caches = ReaderCaches::new(8, 8);
    let committed_caches = ReaderCaches::new(8, 8);

    let reparse = ReparseMutator::new(&store, [a_js()], &mutator_caches, &committed_caches);
    let dirty = reparse.add_parsed(a_js(), 2, Some("B".to_string()), blob(b""), blob(b""), blob(b""), blob(b""), blob(b""), blob(b""));
    assert_eq!(
        dirty,
        DirtySet::from([ModuleName::Haste("A".into()), ModuleName::Haste("B".into()), ModuleName::File(a_js())])
    );

    // Mutator reader (latest) sees B as a's haste module.
    let b_handle = store.get_haste_module("B").expect("B module created");
    let live_b = store.get_all_haste_providers_exclusive(b_handle, |_, f| store.is_logically_deleted_from_haste(f, b_handle));
    assert_eq!(live_b.len(), 1);

    reparse.rollback();

    // Committed reader still only knows about A providing a.js.
    let committed = CommittedReader::new(&store, 8, 8);
    let r = committed.reader();
    assert_eq!(r.get_file_hash(&a_js()), Some(1));
    let a_handle = store.get_haste_module("A").expect("A module still present");
    let live_a = store.get_all_haste_providers_exclusive(a_handle, |_, f| store.is_logically_deleted_from_haste(f, a_handle));
    assert_eq!(live_a, vec![store.get_file(&a_js()).unwrap()]);
    let live_b_after = store.get_all_haste_providers_exclusive(b_handle, |_, f| store.is_logically_deleted_from_haste(f, b_handle));
    assert!(live_b_after.is_empty());
}

#[test]
fn deletion_then_rollback_restores_the_file() {
    let store = Store::new();
    seed(&store);
    let mutator_caches = ReaderCaches::new(8, 8);
    let committed_caches = ReaderCaches::new(8, 8);

    let reparse = ReparseMutator::new(&store, [a_js()], &mutator_caches, &committed_caches);
    let dirty = reparse.record_not_found(a_js());
    assert_eq!(dirty, DirtySet::from([ModuleName::Haste("A".into()), ModuleName::File(a_js())]));

    let file = store.get_file(&a_js()).unwrap();
    assert!(store.with_file(file, |f| f.parse_entity.read_latest()).is_none());

    reparse.rollback();

    let committed = CommittedReader::new(&store, 8, 8);
    assert_eq!(committed.reader().get_file_hash(&a_js()), Some(1));
}
