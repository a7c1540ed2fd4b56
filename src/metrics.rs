//! Internal bookkeeping metrics: arena sizes, dirty-set sizes, and lazy-GC
//! unlink counts, gauged after each commit. Nothing about AST/type content
//! is ever exposed here — only the store's own shape.

use metrics::{counter, gauge};

pub fn record_arena_sizes(files: usize, parses: usize, file_modules: usize, haste_modules: usize) {
    gauge!("sourceheap.arena.files").set(files as f64);
    gauge!("sourceheap.arena.parses").set(parses as f64);
    gauge!("sourceheap.arena.file_modules").set(file_modules as f64);
    gauge!("sourceheap.arena.haste_modules").set(haste_modules as f64);
}

pub fn record_dirty_set_size(size: usize) {
    gauge!("sourceheap.dirty_set.size").set(size as f64);
}

pub fn record_lazy_gc_unlink() {
    counter!("sourceheap.lazy_gc.unlinks").increment(1);
}

pub fn record_commit_modules_removed(count: u64) {
    counter!("sourceheap.commit_modules.removed").increment(count);
}

pub fn record_rollback() {
    counter!("sourceheap.transactions.rolled_back").increment(1);
}

pub fn record_commit() {
    counter!("sourceheap.transactions.committed").increment(1);
}
