//! Bindings resolved on demand through a parent handler.
//!
//! A [`VirtualBinding`] stands for an element that has no concrete backing
//! yet. Instead of being invalidated eagerly when the tree changes, it keeps
//! the clock stamp it last saw and compares it against the clock on
//! [`refresh`](VirtualBinding::refresh):
//!
//! ```text
//!   refresh()
//!       │
//!   parent valid? ── no ──► self
//!       │ yes
//!   stamp == last_stamp? ── yes ──► self            (fast path, O(1))
//!       │ no
//!   parent.recompute_element(self)
//!       ├── Some(element) ──► Physical(element)     (promote)
//!       └── None ──► last_stamp = stamp; self       (absorb)
//! ```
//!
//! Absorbing on a miss keeps a binding whose element can never be found from
//! retrying the lookup on every call until the clock moves again.
//!
//! `refresh` either returns the same `Arc` or a replacement; callers must
//! always store the returned [`BindingStrategy`].

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tether_tree::{ChildKey, Element, ProjectId, ProjectRegistry, SharedClock, Stamp};

use crate::{BindingError, BindingStrategy, ParentRef, PhysicalBinding};

/// A binding with no element of its own, recomputed through its parent.
///
/// Equality and hashing consider only the parent handler's identity, so
/// bindings taken at different stamps compare equal.
///
/// # Thread Safety
/// `last_stamp` is guarded by a per-instance reentrant lock. `refresh`,
/// `unbind` and `is_valid` are mutually exclusive on one instance; the parent
/// may call back into the binding from `recompute_element` without
/// deadlocking. Different instances never contend.
pub struct VirtualBinding {
    parent: ParentRef,
    key: ChildKey,
    clock: SharedClock,
    last_stamp: ReentrantMutex<Cell<Stamp>>,
}

impl VirtualBinding {
    /// Create a binding whose baseline is `clock`'s current stamp.
    ///
    /// No recomputation happens here.
    pub fn new(parent: ParentRef, key: ChildKey, clock: SharedClock) -> Self {
        let stamp = clock.current_stamp();
        VirtualBinding {
            parent,
            key,
            clock,
            last_stamp: ReentrantMutex::new(Cell::new(stamp)),
        }
    }

    /// Create a binding, resolving the project's clock through `registry`.
    ///
    /// The clock is resolved once; the binding never looks it up again.
    pub fn for_project(
        parent: ParentRef,
        key: ChildKey,
        registry: &ProjectRegistry,
        project: ProjectId,
    ) -> Result<Self, BindingError> {
        let clock = registry.clock_for(project)?;
        Ok(Self::new(parent, key, clock))
    }

    /// The parent handler this binding defers to.
    pub fn parent(&self) -> &ParentRef {
        &self.parent
    }

    /// The logical position the parent resolves.
    pub fn key(&self) -> &ChildKey {
        &self.key
    }

    /// The clock this binding validates against.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// The stamp observed at construction or at the last absorb/unbind.
    pub fn last_stamp(&self) -> Stamp {
        self.last_stamp.lock().get()
    }

    /// Always `None`: a virtual binding has no element of its own.
    pub fn bound_element(&self) -> Option<Element> {
        None
    }

    /// Revalidate against the clock, promoting if the parent finds an element.
    pub fn refresh(self: &Arc<Self>) -> BindingStrategy {
        let _span = tracing::trace_span!("refresh", key = ?self.key).entered();
        let unchanged = || BindingStrategy::Virtual(Arc::clone(self));

        let last = self.last_stamp.lock();

        let Some(parent) = self.parent.upgrade() else {
            tracing::trace!("parent dropped");
            return unchanged();
        };
        if !parent.is_valid() {
            tracing::trace!("parent invalid");
            return unchanged();
        }

        let stamp = self.clock.current_stamp();
        let seen = last.get();
        if stamp == seen {
            tracing::trace!(%stamp, "unchanged since last check");
            return unchanged();
        }

        if let Some(element) = parent.recompute_element(self) {
            tracing::debug!(?element, %seen, %stamp, "promoted to physical binding");
            return BindingStrategy::Physical(self.promote(element));
        }

        debug_assert!(stamp >= seen, "clock went backwards: {seen} -> {stamp}");
        last.set(stamp);
        tracing::debug!(%seen, %stamp, "recompute missed, absorbed stamp");
        unchanged()
    }

    /// Promote unconditionally to a physical binding on `element`.
    pub fn bind_to(&self, element: Element) -> BindingStrategy {
        BindingStrategy::Physical(self.promote(element))
    }

    /// Take the clock's current stamp as the new baseline and stay virtual.
    pub fn unbind(self: &Arc<Self>) -> BindingStrategy {
        let last = self.last_stamp.lock();
        last.set(self.clock.current_stamp());
        BindingStrategy::Virtual(Arc::clone(self))
    }

    /// Whether nothing has changed since the last observed stamp.
    ///
    /// Read-only: never absorbs and never promotes.
    pub fn is_valid(&self) -> bool {
        let last = self.last_stamp.lock();
        self.clock.current_stamp() == last.get()
    }

    fn promote(&self, element: Element) -> PhysicalBinding {
        PhysicalBinding::new(element).with_origin(self.parent.clone(), self.key.clone())
    }
}

impl PartialEq for VirtualBinding {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent
    }
}

impl Eq for VirtualBinding {}

impl Hash for VirtualBinding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent.hash(state);
    }
}

impl fmt::Debug for VirtualBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualBinding")
            .field("parent", &self.parent)
            .field("key", &self.key)
            .field("last_stamp", &self.last_stamp())
            .finish_non_exhaustive()
    }
}
