use std::sync::Arc;

use super::*;
use crate::keys::ModuleName;
use crate::readers::MutatorReader;
use crate::store::Store;

fn blob(b: &[u8]) -> Blob {
    Arc::from(b)
}

fn add_a_js(mutator: &ParseMutator, hash: u64, haste: Option<&str>) -> DirtySet {
    mutator.add_parsed(
        FileKey::Source("a.js".into()),
        hash,
        haste.map(str::to_string),
        blob(b"docblock"),
        blob(b"ast"),
        blob(b"alocs"),
        blob(b"type-sig"),
        blob(b"file-sig"),
        blob(b"exports"),
    )
}

#[test]
fn fresh_parse_with_new_haste_module_dirties_both() {
    let store = Store::new();
    let mutator = ParseMutator::new(&store);

    let dirty = add_a_js(&mutator, 1, Some("A"));

    assert_eq!(
        dirty,
        DirtySet::from([
            ModuleName::Haste("A".into()),
            ModuleName::File(FileKey::Source("a.js".into())),
        ])
    );
}

#[test]
fn unchanged_hash_fast_path_allocates_nothing_and_returns_empty_dirty_set() {
    let store = Store::new();
    let mutator = ParseMutator::new(&store);
    add_a_js(&mutator, 1, Some("A"));
    let parses_before = store.parses.read().len();

    let dirty = add_a_js(&mutator, 1, Some("A"));

    assert!(dirty.is_empty());
    assert_eq!(store.parses.read().len(), parses_before);
}

#[test]
fn ast_round_trips_through_the_mutator_reader() {
    let store = Store::new();
    let mutator = ParseMutator::new(&store);
    add_a_js(&mutator, 1, Some("A"));

    let reader = MutatorReader::new(&store, 8, 8);
    let ast = reader.reader().get_ast(&FileKey::Source("a.js".into()));
    assert_eq!(ast.as_deref(), Some(&b"ast"[..]));
}

#[test]
fn unparsed_file_has_hash_but_no_exports() {
    let store = Store::new();
    let mutator = ParseMutator::new(&store);
    mutator.add_unparsed(FileKey::Source("a.js".into()), 7, None);

    let reader = MutatorReader::new(&store, 8, 8);
    let r = reader.reader();
    assert_eq!(r.get_file_hash(&FileKey::Source("a.js".into())), Some(7));
    assert!(r.get_exports(&FileKey::Source("a.js".into())).is_none());
}

#[test]
fn lib_file_has_no_file_module() {
    let store = Store::new();
    let mutator = ParseMutator::new(&store);

    let dirty = mutator.add_parsed(
        FileKey::Lib("flow.js".into()),
        1,
        Some("Flow".to_string()),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
    );

    assert_eq!(dirty, DirtySet::from([ModuleName::Haste("Flow".into())]));
    assert!(store.get_file_module(&FileKey::Lib("flow.js".into())).is_none());
}

#[test]
fn clear_not_found_on_the_parse_mutator_is_always_a_no_op() {
    let store = Store::new();
    let mutator = ParseMutator::new(&store);
    add_a_js(&mutator, 1, Some("A"));

    let dirty = mutator.clear_not_found(&FileKey::Source("a.js".into()));
    assert!(dirty.is_empty());

    // Confirms nothing was touched: the parse is still there.
    let reader = MutatorReader::new(&store, 8, 8);
    assert!(reader.reader().get_parse(&FileKey::Source("a.js".into())).is_some());
}
