//! A minimal string interner standing in for a real shared-memory string
//! table. Here we just dedup identical strings behind `Arc<str>` so that
//! cloning a [`FileRecord`]'s name or a [`HasteModuleRecord`]'s name is a
//! refcount bump.

use std::sync::Arc;

use dashmap::DashSet;

pub type InternedStr = Arc<str>;

#[derive(Default)]
pub struct Interner {
    seen: DashSet<InternedStr>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, s: &str) -> InternedStr {
        if let Some(existing) = self.seen.get(s) {
            return existing.clone();
        }
        let arc: InternedStr = Arc::from(s);
        self.seen.insert(arc.clone());
        arc
    }
}
