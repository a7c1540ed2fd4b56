use super::*;
use crate::arena::Arena;
use crate::records::HasteModuleRecord;
use std::sync::Arc;

fn handle(n: usize) -> HasteModuleHandle {
    let mut arena: Arena<HasteModuleRecord> = Arena::new();
    let mut h = arena.alloc(HasteModuleRecord::new(Arc::from("x")));
    for _ in 1..n {
        h = arena.alloc(HasteModuleRecord::new(Arc::from("x")));
    }
    h
}

#[test]
fn both_none_is_empty_and_no_registration() {
    let outcome = compute_haste_dirty(None, None);
    assert!(outcome.dirty.is_empty());
    assert!(!outcome.register_as_provider_of_new);
}

#[test]
fn fresh_haste_name_dirties_and_registers_new() {
    let n = NamedHaste { handle: handle(1), name: "A".into() };
    let outcome = compute_haste_dirty(None, Some(n));
    assert_eq!(outcome.dirty, DirtySet::from([ModuleName::Haste("A".into())]));
    assert!(outcome.register_as_provider_of_new);
}

#[test]
fn haste_name_removed_dirties_old_only_no_registration() {
    let o = NamedHaste { handle: handle(1), name: "A".into() };
    let outcome = compute_haste_dirty(Some(o), None);
    assert_eq!(outcome.dirty, DirtySet::from([ModuleName::Haste("A".into())]));
    assert!(!outcome.register_as_provider_of_new);
}

#[test]
fn same_haste_module_dirties_once_no_registration() {
    let h = handle(1);
    let o = NamedHaste { handle: h, name: "A".into() };
    let n = NamedHaste { handle: h, name: "A".into() };
    let outcome = compute_haste_dirty(Some(o), Some(n));
    assert_eq!(outcome.dirty, DirtySet::from([ModuleName::Haste("A".into())]));
    assert!(!outcome.register_as_provider_of_new);
}

#[test]
fn haste_rename_dirties_both_and_registers_new() {
    let o = NamedHaste { handle: handle(1), name: "A".into() };
    let n = NamedHaste { handle: handle(2), name: "B".into() };
    let outcome = compute_haste_dirty(Some(o), Some(n));
    assert_eq!(
        outcome.dirty,
        DirtySet::from([ModuleName::Haste("A".into()), ModuleName::Haste("B".into())])
    );
    assert!(outcome.register_as_provider_of_new);
}
