use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::Transaction;

#[test]
fn commit_runs_each_hook_exactly_once() {
    let txn = Transaction::new(1);
    let commits = Arc::new(AtomicUsize::new(0));
    let rollbacks = Arc::new(AtomicUsize::new(0));

    let c = commits.clone();
    let r = rollbacks.clone();
    txn.add("reparse", move || { c.fetch_add(1, Ordering::SeqCst); }, move || { r.fetch_add(1, Ordering::SeqCst); });

    txn.commit();
    assert_eq!(commits.load(Ordering::SeqCst), 1);
    assert_eq!(rollbacks.load(Ordering::SeqCst), 0);

    // Hooks are cleared after running; a second commit call runs nothing.
    txn.commit();
    assert_eq!(commits.load(Ordering::SeqCst), 1);
}

#[test]
fn second_registration_under_the_same_name_is_ignored() {
    let txn = Transaction::new(1);
    let first_ran = Arc::new(AtomicUsize::new(0));
    let second_ran = Arc::new(AtomicUsize::new(0));

    let f = first_ran.clone();
    txn.add("reparse", move || { f.fetch_add(1, Ordering::SeqCst); }, || {});
    let s = second_ran.clone();
    txn.add("reparse", move || { s.fetch_add(1, Ordering::SeqCst); }, || {});

    txn.commit();
    assert_eq!(first_ran.load(Ordering::SeqCst), 1);
    assert_eq!(second_ran.load(Ordering::SeqCst), 0);
}

#[test]
fn rollback_runs_rollback_hooks_not_commit_hooks() {
    let txn = Transaction::new(1);
    let commits = Arc::new(AtomicUsize::new(0));
    let rollbacks = Arc::new(AtomicUsize::new(0));
    let c = commits.clone();
    let r = rollbacks.clone();
    txn.add("reparse", move || { c.fetch_add(1, Ordering::SeqCst); }, move || { r.fetch_add(1, Ordering::SeqCst); });

    txn.rollback();
    assert_eq!(commits.load(Ordering::SeqCst), 0);
    assert_eq!(rollbacks.load(Ordering::SeqCst), 1);
}
