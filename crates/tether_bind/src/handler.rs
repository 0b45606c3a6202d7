//! Element handlers: logical tree nodes that own a binding slot.
//!
//! An [`ElementHandler`] mirrors one logical position in a project's tree.
//! The root handler is bound physically to the tree root; every other handler
//! is identified by its parent handler and a [`ChildKey`], and its slot starts
//! virtual whenever no element occupies that position yet.
//!
//! Handlers are also the [`ParentHandler`]s of their children: recomputing a
//! child resolves the parent's own element first and then looks the key up
//! beneath it.
//!
//! Lock order is child slot, then parent slot, then the tree. Nothing here
//! takes a slot lock while holding the tree lock.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tether_tree::{ChildKey, Element, Project};

use crate::{BindingError, BindingStrategy, ParentHandler, ParentRef, PhysicalBinding, VirtualBinding};

/// A logical element and the binding strategy that locates it.
pub struct ElementHandler {
    project: Arc<Project>,
    parent: Option<Weak<ElementHandler>>,
    key: Option<ChildKey>,
    strategy: Mutex<BindingStrategy>,
    children: Mutex<FxHashMap<ChildKey, Arc<ElementHandler>>>,
    disposed: AtomicBool,
}

impl ElementHandler {
    /// The handler for `project`'s root element.
    pub fn root(project: &Arc<Project>) -> Result<Arc<Self>, BindingError> {
        let root = project.read().root().ok_or(BindingError::NoRootElement)?;
        let element = Element::new(Arc::clone(project), root);
        Ok(Arc::new(ElementHandler {
            project: Arc::clone(project),
            parent: None,
            key: None,
            strategy: Mutex::new(PhysicalBinding::new(element).into()),
            children: Mutex::default(),
            disposed: AtomicBool::new(false),
        }))
    }

    /// The handler for the child at `key`, created on first request.
    ///
    /// Repeated requests for the same key return the same handler.
    pub fn child(self: &Arc<Self>, key: ChildKey) -> Arc<ElementHandler> {
        let mut children = self.children.lock();
        if let Some(existing) = children.get(&key) {
            return Arc::clone(existing);
        }

        let parent = ParentRef::new(self);
        let existing = self
            .element()
            .and_then(|own| self.project.read().find_child(own.id(), &key));
        let strategy: BindingStrategy = match existing {
            Some(id) => PhysicalBinding::new(Element::new(Arc::clone(&self.project), id))
                .with_origin(parent, key.clone())
                .into(),
            None => {
                VirtualBinding::new(parent, key.clone(), self.project.clock().clone()).into()
            }
        };
        tracing::trace!(?key, unresolved = strategy.is_virtual(), "created child handler");

        let handler = Arc::new(ElementHandler {
            project: Arc::clone(&self.project),
            parent: Some(Arc::downgrade(self)),
            key: Some(key.clone()),
            strategy: Mutex::new(strategy),
            children: Mutex::default(),
            disposed: AtomicBool::new(false),
        });
        children.insert(key, Arc::clone(&handler));
        handler
    }

    /// The project this handler's elements live in.
    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    /// The parent handler, if this is not the root and the parent is alive.
    pub fn parent(&self) -> Option<Arc<ElementHandler>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// The logical position under the parent (`None` for the root).
    pub fn key(&self) -> Option<&ChildKey> {
        self.key.as_ref()
    }

    /// Snapshot of the current strategy, without refreshing it.
    pub fn strategy(&self) -> BindingStrategy {
        self.strategy.lock().clone()
    }

    /// Refresh the slot and return the live element it is bound to.
    ///
    /// A physical binding whose element has been removed behind the handler's
    /// back is detached and its position looked up once right away, so an
    /// element re-added there before this call is found.
    pub fn element(&self) -> Option<Element> {
        let mut slot = self.strategy.lock();
        if slot.is_physical() && !slot.is_valid() {
            tracing::trace!(key = ?self.key, "bound element vanished, detaching");
            *slot = slot.unbind();
            if let Some(found) = slot.as_virtual().and_then(|binding| Self::relocate(binding)) {
                *slot = slot.bind_to(found);
            }
        }
        *slot = slot.refresh();
        slot.bound_element().filter(Element::is_valid)
    }

    /// Ask `binding`'s parent for its element regardless of the stamp.
    fn relocate(binding: &VirtualBinding) -> Option<Element> {
        let parent = binding.parent().upgrade()?;
        if !parent.is_valid() {
            return None;
        }
        parent.recompute_element(binding)
    }

    /// Whether the handler and all its ancestors are alive and not disposed.
    pub fn is_valid(&self) -> bool {
        self.check_usable().is_ok()
    }

    fn check_usable(&self) -> Result<(), BindingError> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(BindingError::Disposed);
        }
        match &self.parent {
            None => Ok(()),
            Some(parent) => parent
                .upgrade()
                .ok_or(BindingError::ParentGone)?
                .check_usable(),
        }
    }

    /// Return the element, creating it and any missing ancestors.
    #[tracing::instrument(level = "debug", skip_all, fields(key = ?self.key))]
    pub fn ensure_exists(&self) -> Result<Element, BindingError> {
        self.check_usable()?;
        if let Some(element) = self.element() {
            return Ok(element);
        }

        let Some(key) = &self.key else {
            return Err(BindingError::NoRootElement);
        };
        let parent = self.parent().ok_or(BindingError::ParentGone)?;
        let parent_element = parent.ensure_exists()?;

        let id = self.project.write().ensure_child(parent_element.id(), key)?;
        let element = Element::new(Arc::clone(&self.project), id);

        let mut slot = self.strategy.lock();
        *slot = slot.bind_to(element.clone());
        tracing::debug!(?element, "materialized element");
        Ok(element)
    }

    /// Remove the element from the tree and detach the slot from it.
    ///
    /// Does nothing if there is no element to remove.
    #[tracing::instrument(level = "debug", skip_all, fields(key = ?self.key))]
    pub fn undefine(&self) -> Result<(), BindingError> {
        self.check_usable()?;
        let Some(element) = self.element() else {
            return Ok(());
        };

        self.project.write().remove(element.id())?;

        let mut slot = self.strategy.lock();
        *slot = slot.unbind();
        tracing::debug!(?element, "undefined element");
        Ok(())
    }

    /// Invalidate this handler and every child handler created from it.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        let children: Vec<_> = self.children.lock().values().cloned().collect();
        for child in children {
            child.dispose();
        }
    }
}

impl ParentHandler for ElementHandler {
    fn is_valid(&self) -> bool {
        ElementHandler::is_valid(self)
    }

    fn recompute_element(&self, binding: &VirtualBinding) -> Option<Element> {
        let own = self.element()?;
        let found = self.project.read().find_child(own.id(), binding.key())?;
        Some(Element::new(Arc::clone(&self.project), found))
    }
}

impl fmt::Debug for ElementHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandler")
            .field("project", &self.project.id())
            .field("key", &self.key)
            .field("strategy", &*self.strategy.lock())
            .finish_non_exhaustive()
    }
}
