//! Shared fixtures for unit tests.

#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tether_tree::{Element, Project, ProjectId};

use crate::{ParentHandler, VirtualBinding};

/// Parent handler with scripted answers.
pub(crate) struct StubParent {
    valid: AtomicBool,
    answer: Mutex<Option<Element>>,
    calls: AtomicUsize,
}

impl StubParent {
    /// A valid parent whose recomputation always misses.
    pub(crate) fn missing() -> Arc<Self> {
        Arc::new(StubParent {
            valid: AtomicBool::new(true),
            answer: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn answer_with(&self, element: Option<Element>) {
        *self.answer.lock() = element;
    }

    pub(crate) fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }

    /// Number of `recompute_element` calls so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ParentHandler for StubParent {
    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    fn recompute_element(&self, _binding: &VirtualBinding) -> Option<Element> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.lock().clone()
    }
}

/// A live element in a fresh project whose clock is independent of any test
/// clock.
pub(crate) fn sample_element(tag: &str) -> Element {
    let project = Arc::new(Project::new(ProjectId::new(0)));
    let root = project.write().create_root(tag).unwrap();
    Element::new(project, root)
}
