use std::sync::Arc;

use super::*;
use crate::keys::ModuleName;
use crate::mutators::ParseMutator;
use crate::readers::CommittedReader;

fn blob(b: &[u8]) -> Blob {
    Arc::from(b)
}

#[test]
fn two_providers_one_chosen_in_declaration_order() {
    let store = Store::new();
    let parse = ParseMutator::new(&store);
    parse.add_parsed(
        FileKey::Source("a.js".into()),
        1,
        Some("A".to_string()),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
    );
    parse.add_parsed(
        FileKey::Source("b.js".into()),
        2,
        Some("A".to_string()),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
        blob(b""),
    );

    let handle = store.get_haste_module("A").unwrap();
    let live = store.get_all_haste_providers_exclusive(handle, |_, f| store.is_logically_deleted_from_haste(f, handle));
    assert_eq!(live.len(), 2);

    let commit_modules = CommitModulesMutator::new(&store);
    commit_modules.select_provider(ModuleName::Haste("A".into()));
    commit_modules.commit();

    let committed = CommittedReader::new(&store, 8, 8);
    let provider = committed.reader().get_provider(&ModuleName::Haste("A".into()));
    assert_eq!(provider, Some(FileKey::Source("a.js".into())));
}

#[test]
fn module_with_zero_live_providers_is_removed_from_its_table() {
    let store = Store::new();
    let parse = ParseMutator::new(&store);
    parse.add_unparsed(FileKey::Source("a.js".into()), 1, Some("A".to_string()));

    // Delete the file: its haste module now has zero live providers.
    crate::mutators::clear_file(&store, store.begin_txn(), &FileKey::Source("a.js".into()));

    let commit_modules = CommitModulesMutator::new(&store);
    commit_modules.select_provider(ModuleName::Haste("A".into()));
    assert!(store.get_haste_module("A").is_some(), "not removed until commit()");
    commit_modules.commit();

    assert!(store.get_haste_module("A").is_none());
}
