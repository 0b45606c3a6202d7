#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use super::*;
use pretty_assertions::assert_eq;

fn tree_at(stamp: u64) -> ElementTree {
    ElementTree::new(SharedClock::starting_at(Stamp::new(stamp)))
}

#[test]
fn test_create_root_advances_clock() {
    let mut tree = tree_at(0);
    let root = tree.create_root("project").unwrap();
    assert_eq!(tree.root(), Some(root));
    assert_eq!(tree.tag(root), Some("project"));
    assert_eq!(tree.stamp(), Stamp::new(1));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_second_root_is_rejected() {
    let mut tree = tree_at(0);
    let root = tree.create_root("a").unwrap();
    assert_eq!(tree.create_root("b"), Err(TreeError::RootAlreadyExists(root)));
    assert_eq!(tree.stamp(), Stamp::new(1));
}

#[test]
fn test_append_and_find_child() {
    let mut tree = tree_at(0);
    let root = tree.create_root("beans").unwrap();
    let first = tree.append_child(root, "bean").unwrap();
    let other = tree.append_child(root, "alias").unwrap();
    let second = tree.append_child(root, "bean").unwrap();

    assert_eq!(tree.children(root), &[first, other, second]);
    assert_eq!(tree.find_child(root, &ChildKey::new("bean", 0)), Some(first));
    assert_eq!(tree.find_child(root, &ChildKey::new("bean", 1)), Some(second));
    assert_eq!(tree.find_child(root, &ChildKey::new("bean", 2)), None);
    assert_eq!(tree.find_child(root, &ChildKey::first("alias")), Some(other));
    assert_eq!(tree.parent(second), Some(root));
    assert_eq!(tree.parent(root), None);
}

#[test]
fn test_append_to_stale_parent_fails() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    let child = tree.append_child(root, "c").unwrap();
    tree.remove(child).unwrap();
    let before = tree.stamp();
    assert_eq!(
        tree.append_child(child, "x"),
        Err(TreeError::StaleElement(child))
    );
    assert_eq!(tree.stamp(), before);
}

#[test]
fn test_ensure_child_creates_missing_siblings_with_one_tick() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    let stamp = tree.stamp();

    let third = tree.ensure_child(root, &ChildKey::new("item", 2)).unwrap();
    assert_eq!(tree.children(root).len(), 3);
    assert_eq!(tree.find_child(root, &ChildKey::new("item", 2)), Some(third));
    assert_eq!(tree.stamp(), stamp.next());
}

#[test]
fn test_ensure_child_existing_does_not_tick() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    let item = tree.append_child(root, "item").unwrap();
    let stamp = tree.stamp();

    assert_eq!(tree.ensure_child(root, &ChildKey::first("item")), Ok(item));
    assert_eq!(tree.stamp(), stamp);
}

#[test]
fn test_remove_subtree_invalidates_descendants() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    let a = tree.append_child(root, "a").unwrap();
    let b = tree.append_child(a, "b").unwrap();
    let c = tree.append_child(b, "c").unwrap();

    tree.remove(a).unwrap();
    assert!(!tree.is_alive(a));
    assert!(!tree.is_alive(b));
    assert!(!tree.is_alive(c));
    assert!(tree.children(root).is_empty());
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.remove(a), Err(TreeError::StaleElement(a)));
}

#[test]
fn test_reused_slot_does_not_revive_old_handle() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    let old = tree.append_child(root, "x").unwrap();
    tree.remove(old).unwrap();
    let new = tree.append_child(root, "y").unwrap();

    assert_eq!(old.index(), new.index());
    assert_ne!(old, new);
    assert!(!tree.is_alive(old));
    assert_eq!(tree.tag(old), None);
    assert_eq!(tree.tag(new), Some("y"));
}

#[test]
fn test_removing_root_empties_tree() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    tree.append_child(root, "x").unwrap();
    tree.remove(root).unwrap();
    assert_eq!(tree.root(), None);
    assert!(tree.is_empty());
    assert!(tree.create_root("again").is_ok());
}

#[test]
fn test_set_attribute() {
    let mut tree = tree_at(20);
    let root = tree.create_root("r").unwrap();
    assert_eq!(tree.set_attribute(root, "id", "main").unwrap(), None);
    assert_eq!(
        tree.set_attribute(root, "id", "other").unwrap(),
        Some("main".to_string())
    );
    assert_eq!(tree.attribute(root, "id"), Some("other"));
    assert_eq!(tree.attribute(root, "missing"), None);
    assert_eq!(tree.stamp(), Stamp::new(23));
}

#[test]
fn test_queries_do_not_tick() {
    let mut tree = tree_at(0);
    let root = tree.create_root("r").unwrap();
    let stamp = tree.stamp();
    let _ = tree.find_child(root, &ChildKey::first("nothing"));
    let _ = tree.children(root);
    let _ = tree.is_alive(root);
    assert_eq!(tree.stamp(), stamp);
}
