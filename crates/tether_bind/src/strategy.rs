//! The closed set of binding strategies.

use std::sync::Arc;

use tether_tree::{ChildKey, Element, SharedClock};

use crate::{ParentRef, PhysicalBinding, VirtualBinding};

/// How a logical element is bound to the tree: directly, or through a parent
/// on demand.
///
/// Every operation returns the strategy to keep; a caller holding a slot must
/// replace its value with the result rather than assume in-place mutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingStrategy {
    /// Anchored to a concrete element.
    Physical(PhysicalBinding),
    /// Anchored to a parent handler, recomputed when the clock moves.
    Virtual(Arc<VirtualBinding>),
}

impl BindingStrategy {
    /// A virtual strategy with `clock`'s current stamp as its baseline.
    pub fn unresolved(parent: ParentRef, key: ChildKey, clock: SharedClock) -> Self {
        BindingStrategy::Virtual(Arc::new(VirtualBinding::new(parent, key, clock)))
    }

    /// The concrete element, if this strategy holds one.
    pub fn bound_element(&self) -> Option<Element> {
        match self {
            BindingStrategy::Physical(physical) => physical.bound_element(),
            BindingStrategy::Virtual(binding) => binding.bound_element(),
        }
    }

    /// Revalidate; physical strategies are returned unchanged.
    #[must_use]
    pub fn refresh(&self) -> BindingStrategy {
        match self {
            BindingStrategy::Physical(_) => self.clone(),
            BindingStrategy::Virtual(binding) => binding.refresh(),
        }
    }

    /// Bind directly to `element`.
    #[must_use]
    pub fn bind_to(&self, element: Element) -> BindingStrategy {
        match self {
            BindingStrategy::Physical(physical) => physical.bind_to(element),
            BindingStrategy::Virtual(binding) => binding.bind_to(element),
        }
    }

    /// Detach from any concrete element, taking the current stamp as baseline.
    #[must_use]
    pub fn unbind(&self) -> BindingStrategy {
        match self {
            BindingStrategy::Physical(physical) => physical.unbind(),
            BindingStrategy::Virtual(binding) => binding.unbind(),
        }
    }

    /// Physical: the element is alive. Virtual: the clock has not moved.
    pub fn is_valid(&self) -> bool {
        match self {
            BindingStrategy::Physical(physical) => physical.is_valid(),
            BindingStrategy::Virtual(binding) => binding.is_valid(),
        }
    }

    /// The parent handler this strategy hangs off, if any.
    pub fn parent(&self) -> Option<&ParentRef> {
        match self {
            BindingStrategy::Physical(physical) => physical.origin().map(|origin| origin.parent()),
            BindingStrategy::Virtual(binding) => Some(binding.parent()),
        }
    }

    pub fn is_physical(&self) -> bool {
        matches!(self, BindingStrategy::Physical(_))
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, BindingStrategy::Virtual(_))
    }

    pub fn as_physical(&self) -> Option<&PhysicalBinding> {
        match self {
            BindingStrategy::Physical(physical) => Some(physical),
            BindingStrategy::Virtual(_) => None,
        }
    }

    pub fn as_virtual(&self) -> Option<&Arc<VirtualBinding>> {
        match self {
            BindingStrategy::Virtual(binding) => Some(binding),
            BindingStrategy::Physical(_) => None,
        }
    }
}

impl From<PhysicalBinding> for BindingStrategy {
    fn from(physical: PhysicalBinding) -> Self {
        BindingStrategy::Physical(physical)
    }
}

impl From<VirtualBinding> for BindingStrategy {
    fn from(binding: VirtualBinding) -> Self {
        BindingStrategy::Virtual(Arc::new(binding))
    }
}

impl From<Arc<VirtualBinding>> for BindingStrategy {
    fn from(binding: Arc<VirtualBinding>) -> Self {
        BindingStrategy::Virtual(binding)
    }
}
