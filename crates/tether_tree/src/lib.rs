//! Tether Tree - collaborators for lazily-resolved bindings
//!
//! This crate contains the mutable structures bindings are resolved against:
//! - [`ModificationClock`] / [`Stamp`]: a monotonic counter advanced on every
//!   tree mutation, used as a cheap "anything changed?" oracle
//! - [`ElementTree`]: arena-backed element tree with generational handles
//! - [`Project`] / [`Element`]: a tree, its clock, and owning element handles
//! - [`ProjectRegistry`]: resolves per-project singletons by id
//!
//! # Design Philosophy
//!
//! - **Count, don't track**: mutations bump one counter instead of recording
//!   which nodes went stale
//! - **Handles, not pointers**: `ElementId(idx, generation)` never dangles
//! - **Logical keys**: a [`ChildKey`] names a position whether or not an
//!   element currently occupies it

mod element_id;
mod error;
mod project;
mod stamp;
mod tree;

pub use element_id::{ChildKey, ElementId};
pub use error::TreeError;
pub use project::{Element, Project, ProjectId, ProjectRegistry};
pub use stamp::{ModificationClock, SharedClock, Stamp};
pub use tree::ElementTree;
