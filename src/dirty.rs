//! Dirty-module computation.
//!
//! Factored out of the parse mutator because the haste-module branch logic
//! reduces to five distinct cases and is worth being able to unit-test in
//! isolation from heap allocation.

use std::collections::HashSet;

use crate::keys::ModuleName;
use crate::records::HasteModuleHandle;

pub type DirtySet = HashSet<ModuleName>;

/// A haste module identified both by the handle callers need to mutate its
/// provider list and the name the dirty set reports it under.
#[derive(Clone)]
pub struct NamedHaste {
    pub handle: HasteModuleHandle,
    pub name: String,
}

/// The outcome of comparing a file's old and new haste-module membership:
/// which module names go dirty, and whether the file must be (re-)registered
/// as a provider of the new module.
pub struct HasteDirtyOutcome {
    pub dirty: DirtySet,
    pub register_as_provider_of_new: bool,
}

/// Implements the five branches for the haste-module half of the dirty set.
/// The file-module half (always dirty; registered as provider
/// only when the file record is freshly created) is simple enough that
/// callers apply it directly rather than routing it through here.
pub fn compute_haste_dirty(old: Option<NamedHaste>, new: Option<NamedHaste>) -> HasteDirtyOutcome {
    let mut dirty = DirtySet::new();
    let register_as_provider_of_new;

    match (old, new) {
        (None, None) => {
            register_as_provider_of_new = false;
        }
        (None, Some(n)) => {
            dirty.insert(ModuleName::Haste(n.name));
            register_as_provider_of_new = true;
        }
        (Some(o), None) => {
            dirty.insert(ModuleName::Haste(o.name));
            register_as_provider_of_new = false;
        }
        (Some(o), Some(n)) if o.handle == n.handle => {
            dirty.insert(ModuleName::Haste(n.name));
            register_as_provider_of_new = false;
        }
        (Some(o), Some(n)) => {
            dirty.insert(ModuleName::Haste(o.name));
            dirty.insert(ModuleName::Haste(n.name));
            register_as_provider_of_new = true;
        }
    }

    HasteDirtyOutcome { dirty, register_as_provider_of_new }
}

#[cfg(test)]
#[path = "dirty_test.rs"]
mod dirty_test;
