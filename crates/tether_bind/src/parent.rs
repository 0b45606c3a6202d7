//! The parent-handler seam and the non-owning reference bindings hold to it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use tether_tree::Element;

use crate::VirtualBinding;

/// The handler a [`VirtualBinding`] defers to for recomputation.
///
/// Implementors own the tree-walking logic; the binding only decides *when*
/// to ask.
pub trait ParentHandler: Send + Sync {
    /// Whether this handler can still answer questions about its subtree.
    fn is_valid(&self) -> bool;

    /// Best-effort lookup of the concrete element `binding` stands for.
    ///
    /// Returning `None` is the ordinary "still virtual" outcome, not an error.
    fn recompute_element(&self, binding: &VirtualBinding) -> Option<Element>;
}

/// Non-owning reference to a [`ParentHandler`].
///
/// Holding a `ParentRef` never keeps the handler alive. Equality and hashing
/// are by handler identity (allocation address), which stays stable even
/// after the handler is dropped.
#[derive(Clone)]
pub struct ParentRef(Weak<dyn ParentHandler>);

impl ParentRef {
    /// Reference `parent` without taking ownership.
    pub fn new<P: ParentHandler + 'static>(parent: &Arc<P>) -> Self {
        let weak: Weak<P> = Arc::downgrade(parent);
        ParentRef(weak)
    }

    /// Reference an already type-erased handler.
    pub fn from_dyn(parent: &Arc<dyn ParentHandler>) -> Self {
        ParentRef(Arc::downgrade(parent))
    }

    /// The handler, if it is still alive.
    pub fn upgrade(&self) -> Option<Arc<dyn ParentHandler>> {
        self.0.upgrade()
    }

    /// Whether the handler is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Whether this refers to `parent`.
    pub fn refers_to<P: ParentHandler + 'static>(&self, parent: &Arc<P>) -> bool {
        std::ptr::eq(self.addr(), Arc::as_ptr(parent).cast::<()>())
    }

    #[inline]
    fn addr(&self) -> *const () {
        self.0.as_ptr().cast::<()>()
    }
}

impl PartialEq for ParentRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for ParentRef {}

impl Hash for ParentRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.addr(), state);
    }
}

impl fmt::Debug for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_alive() { "alive" } else { "dropped" };
        write!(f, "ParentRef({:p}, {state})", self.addr())
    }
}
