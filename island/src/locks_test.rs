use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn unlocked_by_default() {
    let locks = LockRegistry::new();
    assert!(!locks.is_locked());
    assert!(!locks.is_source_locked(LOCK_DIALOG));
}

#[test]
fn any_source_locks() {
    let mut locks = LockRegistry::new();
    assert!(locks.set(LOCK_PROJECTS, true));
    assert!(locks.is_locked());
    assert!(locks.is_source_locked(LOCK_PROJECTS));
}

#[test]
fn sources_combine_with_or() {
    let mut locks = LockRegistry::new();
    locks.set(LOCK_PROJECTS, true);
    assert!(!locks.set(LOCK_DIALOG, true));
    assert!(!locks.set(LOCK_PROJECTS, false));
    assert!(locks.is_locked());
    assert!(locks.set(LOCK_DIALOG, false));
    assert!(!locks.is_locked());
}

#[test]
fn repeated_set_is_not_a_change() {
    let mut locks = LockRegistry::new();
    locks.set(LOCK_BOOT_DOCK, true);
    assert!(!locks.set(LOCK_BOOT_DOCK, true));
    assert!(!locks.set("never-set", false));
}

#[test]
fn listeners_see_only_effective_changes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut locks = LockRegistry::new();
    let sink = Rc::clone(&seen);
    let id = locks.subscribe(move |locked| sink.borrow_mut().push(*locked));
    locks.set(LOCK_PROJECTS, true);
    locks.set(LOCK_DIALOG, true);
    locks.set(LOCK_PROJECTS, false);
    locks.set(LOCK_DIALOG, false);
    assert_eq!(*seen.borrow(), vec![true, false]);

    assert!(locks.unsubscribe(id));
    locks.set(LOCK_DIALOG, true);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn clear_releases_everything() {
    let mut locks = LockRegistry::new();
    assert!(!locks.clear());
    locks.set(LOCK_PROJECTS, true);
    locks.set(LOCK_DIALOG, true);
    assert!(locks.clear());
    assert!(!locks.is_locked());
}
