use std::sync::Arc;

use super::*;
use crate::arena::Arena;

fn file(name: &str) -> FileRecord {
    FileRecord::new(FileKind::Source, Arc::from(name))
}

#[test]
fn add_provider_preserves_declaration_order() {
    let mut files: Arena<FileRecord> = Arena::new();
    let a = files.alloc(file("a"));
    let b = files.alloc(file("b"));
    let c = files.alloc(file("c"));

    let mut head = None;
    add_provider::<HasteModuleList>(&mut files, &mut head, a);
    add_provider::<HasteModuleList>(&mut files, &mut head, b);
    add_provider::<HasteModuleList>(&mut files, &mut head, c);

    assert_eq!(traverse_all_exclusive::<HasteModuleList>(&files, head), vec![a, b, c]);
}

#[test]
fn the_two_list_kinds_are_independent() {
    let mut files: Arena<FileRecord> = Arena::new();
    let a = files.alloc(file("a"));
    let b = files.alloc(file("b"));

    let mut haste_head = None;
    let mut file_head = None;
    add_provider::<HasteModuleList>(&mut files, &mut haste_head, a);
    add_provider::<FileModuleList>(&mut files, &mut file_head, b);

    assert_eq!(traverse_all_exclusive::<HasteModuleList>(&files, haste_head), vec![a]);
    assert_eq!(traverse_all_exclusive::<FileModuleList>(&files, file_head), vec![b]);
}

#[test]
fn remove_provider_exclusive_unlinks_head_middle_and_tail() {
    let mut files: Arena<FileRecord> = Arena::new();
    let a = files.alloc(file("a"));
    let b = files.alloc(file("b"));
    let c = files.alloc(file("c"));
    let mut head = None;
    add_provider::<HasteModuleList>(&mut files, &mut head, a);
    add_provider::<HasteModuleList>(&mut files, &mut head, b);
    add_provider::<HasteModuleList>(&mut files, &mut head, c);

    remove_provider_exclusive::<HasteModuleList>(&mut files, &mut head, b);
    assert_eq!(traverse_all_exclusive::<HasteModuleList>(&files, head), vec![a, c]);

    remove_provider_exclusive::<HasteModuleList>(&mut files, &mut head, a);
    assert_eq!(traverse_all_exclusive::<HasteModuleList>(&files, head), vec![c]);

    remove_provider_exclusive::<HasteModuleList>(&mut files, &mut head, c);
    assert_eq!(traverse_all_exclusive::<HasteModuleList>(&files, head), Vec::<FileHandle>::new());
}

#[test]
fn get_all_providers_exclusive_unlinks_logically_deleted_nodes() {
    let mut files: Arena<FileRecord> = Arena::new();
    let a = files.alloc(file("a"));
    let b = files.alloc(file("b"));
    let c = files.alloc(file("c"));
    let mut head = None;
    add_provider::<HasteModuleList>(&mut files, &mut head, a);
    add_provider::<HasteModuleList>(&mut files, &mut head, b);
    add_provider::<HasteModuleList>(&mut files, &mut head, c);

    // b is logically deleted (e.g. its parse no longer declares this haste name).
    let live = get_all_providers_exclusive::<HasteModuleList>(&mut files, &mut head, |h, _| h == b);
    assert_eq!(live, vec![a, c]);

    // A second pass with nothing newly deleted is stable and leaves the list intact.
    let live_again = get_all_providers_exclusive::<HasteModuleList>(&mut files, &mut head, |_, _| false);
    assert_eq!(live_again, vec![a, c]);
}

#[test]
fn get_all_providers_exclusive_on_empty_list_returns_empty() {
    let mut files: Arena<FileRecord> = Arena::new();
    let mut head = None;
    let live = get_all_providers_exclusive::<HasteModuleList>(&mut files, &mut head, |_, _| false);
    assert!(live.is_empty());
    assert!(head.is_none());
}

#[test]
fn parse_record_exposes_hash_and_haste_module_uniformly() {
    let untyped = ParseRecord::Untyped(UntypedParse { hash: 42, haste_module: None });
    assert_eq!(untyped.hash(), 42);
    assert!(!untyped.is_typed());
    assert!(untyped.as_typed().is_none());

    let typed = ParseRecord::Typed(TypedParse {
        hash: 7,
        haste_module: None,
        exports: Arc::from(&b""[..]),
        ast: Arc::from(&b""[..]),
        docblock: Arc::from(&b""[..]),
        aloc_table: Arc::from(&b""[..]),
        file_sig: Arc::from(&b""[..]),
        type_sig: Arc::from(&b""[..]),
    });
    assert_eq!(typed.hash(), 7);
    assert!(typed.is_typed());
    assert!(typed.as_typed().is_some());
}
