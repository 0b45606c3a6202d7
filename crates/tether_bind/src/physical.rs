//! Bindings anchored directly to a concrete element.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tether_tree::{ChildKey, Element};

use crate::{BindingStrategy, ParentRef, VirtualBinding};

/// Where a physical binding was promoted from.
///
/// Lets [`PhysicalBinding::unbind`] fall back to a virtual binding for the
/// same logical position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    parent: ParentRef,
    key: ChildKey,
}

impl Origin {
    /// The parent handler the binding hangs off.
    pub fn parent(&self) -> &ParentRef {
        &self.parent
    }

    /// The logical position under the parent.
    pub fn key(&self) -> &ChildKey {
        &self.key
    }
}

/// A binding that holds its element directly.
///
/// Carries no clock state. Two physical bindings are equal when they hold the
/// same element.
#[derive(Clone, Debug)]
pub struct PhysicalBinding {
    element: Element,
    origin: Option<Origin>,
}

impl PhysicalBinding {
    /// Bind directly to `element` with no parent to fall back to.
    pub fn new(element: Element) -> Self {
        PhysicalBinding {
            element,
            origin: None,
        }
    }

    /// Record the parent and key this binding stands in for.
    #[must_use]
    pub fn with_origin(mut self, parent: ParentRef, key: ChildKey) -> Self {
        self.origin = Some(Origin { parent, key });
        self
    }

    /// The held element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The parent/key this binding was promoted from, if any.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// The held element, whether or not it is still alive.
    pub fn bound_element(&self) -> Option<Element> {
        Some(self.element.clone())
    }

    /// Whether the held element is still part of its tree.
    pub fn is_valid(&self) -> bool {
        self.element.is_valid()
    }

    /// Rebind to `element`, keeping the origin.
    pub fn bind_to(&self, element: Element) -> BindingStrategy {
        BindingStrategy::Physical(PhysicalBinding {
            element,
            origin: self.origin.clone(),
        })
    }

    /// Detach from the element.
    ///
    /// With an origin this yields a fresh [`VirtualBinding`] whose baseline is
    /// the element's project clock now. A root binding has nothing to fall
    /// back to and stays as it is.
    pub fn unbind(&self) -> BindingStrategy {
        match &self.origin {
            Some(origin) => {
                let clock = self.element.project().clock().clone();
                tracing::debug!(key = ?origin.key, "physical binding detached");
                BindingStrategy::Virtual(Arc::new(VirtualBinding::new(
                    origin.parent.clone(),
                    origin.key.clone(),
                    clock,
                )))
            }
            None => BindingStrategy::Physical(self.clone()),
        }
    }
}

impl PartialEq for PhysicalBinding {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for PhysicalBinding {}

impl Hash for PhysicalBinding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
    }
}
