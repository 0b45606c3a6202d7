//! Serialization of stamps and handles behind the `serde` feature.
//!
//! Run with `cargo test -p tether_tree --features serde`.

#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use tether_tree::{ChildKey, ElementTree, ProjectId, SharedClock, Stamp};

fn round_trip<T>(value: &T) -> T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let bytes = bincode::serialize(value).unwrap();
    bincode::deserialize(&bytes).unwrap()
}

#[test]
fn stamp_and_project_id_survive_round_trip() {
    assert_eq!(round_trip(&Stamp::new(12)), Stamp::new(12));
    assert_eq!(round_trip(&ProjectId::new(7)), ProjectId::new(7));
}

#[test]
fn child_key_survives_round_trip() {
    let key = ChildKey::new("property", 3);
    assert_eq!(round_trip(&key), key);
}

#[test]
fn restored_element_id_still_addresses_the_tree() {
    let mut tree = ElementTree::new(SharedClock::new());
    let root = tree.create_root("beans").unwrap();
    let bean = tree.append_child(root, "bean").unwrap();

    let restored = round_trip(&bean);
    assert_eq!(restored, bean);
    assert_eq!(tree.tag(restored), Some("bean"));

    tree.remove(bean).unwrap();
    let stale = round_trip(&bean);
    assert!(!tree.is_alive(stale));
}
