//! Element handles and logical child positions.

use std::fmt;

/// Handle to an element slot in an [`ElementTree`](crate::ElementTree).
///
/// Carries a generation so a handle to a removed element never aliases the
/// element that later reuses its slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId {
    /// Slot index into the tree's node storage.
    pub(crate) idx: u32,
    /// Must match the slot's generation for the handle to be live.
    pub(crate) generation: u32,
}

impl ElementId {
    #[inline]
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        ElementId { idx, generation }
    }

    /// Raw slot index (diagnostics only).
    #[inline]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Generation counter of the slot when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// Logical position of a child: the `index`-th child of its parent whose tag
/// is `tag`.
///
/// A key names a place in the tree whether or not an element currently
/// occupies it.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChildKey {
    tag: Box<str>,
    index: u32,
}

impl ChildKey {
    /// Create a key for the `index`-th `tag` child.
    pub fn new(tag: impl Into<Box<str>>, index: u32) -> Self {
        ChildKey {
            tag: tag.into(),
            index,
        }
    }

    /// Key for the first `tag` child.
    pub fn first(tag: impl Into<Box<str>>) -> Self {
        Self::new(tag, 0)
    }

    /// Tag this key selects on.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Position among same-tag siblings.
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Debug for ChildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tag, self.index)
    }
}
