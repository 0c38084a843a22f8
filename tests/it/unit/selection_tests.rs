//! Unit tests for the selection set.

use dockboard::selection::SelectionManager;
use uuid::Uuid;

#[test]
fn test_replace_and_extend() {
    let ids: Vec<Uuid> = (1..=4).map(Uuid::from_u128).collect();
    let mut selection = SelectionManager::new();

    selection.replace([ids[0], ids[1]]);
    assert_eq!(selection.len(), 2);

    selection.extend([ids[1], ids[2]]);
    assert_eq!(selection.len(), 3);

    selection.replace(std::iter::empty());
    assert!(selection.is_empty());
}

#[test]
fn test_snapshot_is_detached() {
    let a = Uuid::from_u128(1);
    let mut selection = SelectionManager::new();
    selection.insert(a);
    let snapshot = selection.snapshot();
    selection.clear();
    assert!(snapshot.contains(&a));
}

#[test]
fn test_retain() {
    let ids: Vec<Uuid> = (1..=3).map(Uuid::from_u128).collect();
    let mut selection = SelectionManager::new();
    selection.replace(ids.iter().copied());
    selection.retain(|id| id != ids[1]);
    assert!(selection.contains(ids[0]));
    assert!(!selection.contains(ids[1]));
    assert_eq!(selection.iter().count(), 2);
}

#[test]
fn test_insert_and_remove_report_change() {
    let a = Uuid::from_u128(1);
    let mut selection = SelectionManager::new();
    assert!(selection.insert(a));
    assert!(!selection.insert(a));
    assert!(selection.remove(a));
    assert!(!selection.remove(a));
}
