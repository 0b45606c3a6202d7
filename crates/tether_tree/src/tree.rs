//! Arena-backed element tree.
//!
//! Elements live in recycled slots addressed by generational [`ElementId`]s.
//! The tree owns a [`SharedClock`] and advances it once per successful
//! mutation; queries never touch the clock.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{ChildKey, ElementId, SharedClock, Stamp, TreeError};

/// A single element's data.
#[derive(Debug)]
struct Node {
    tag: Box<str>,
    attributes: FxHashMap<Box<str>, String>,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Node {
            tag: tag.into(),
            attributes: FxHashMap::default(),
            parent,
            children: SmallVec::new(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Mutable element tree with a single root.
#[derive(Debug)]
pub struct ElementTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    root: Option<ElementId>,
    live: usize,
    clock: SharedClock,
}

impl ElementTree {
    /// Create an empty tree that reports its mutations to `clock`.
    pub fn new(clock: SharedClock) -> Self {
        ElementTree {
            slots: Vec::new(),
            free_list: Vec::new(),
            root: None,
            live: 0,
            clock,
        }
    }

    /// The clock this tree advances on mutation.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// The root element, if one has been created.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    /// Tag of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|node| &*node.tag)
    }

    /// Attribute value of a live element.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    /// Parent of a live element (`None` for the root and for stale handles).
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Children of a live element in document order. Empty for stale handles.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Locate the child `key` names under `parent`.
    pub fn find_child(&self, parent: ElementId, key: &ChildKey) -> Option<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self.tag(child) == Some(key.tag()))
            .nth(key.index() as usize)
    }

    // -- Mutation API --

    /// Create the root element.
    pub fn create_root(&mut self, tag: &str) -> Result<ElementId, TreeError> {
        if let Some(root) = self.root {
            return Err(TreeError::RootAlreadyExists(root));
        }
        let id = self.alloc(Node::new(tag, None));
        self.root = Some(id);
        let stamp = self.clock.advance();
        tracing::trace!(?id, tag, %stamp, "created root");
        Ok(id)
    }

    /// Append a new `tag` element as the last child of `parent`.
    pub fn append_child(&mut self, parent: ElementId, tag: &str) -> Result<ElementId, TreeError> {
        let id = self.append_unrecorded(parent, tag)?;
        let stamp = self.clock.advance();
        tracing::trace!(?parent, ?id, tag, %stamp, "appended child");
        Ok(id)
    }

    /// Return the child `key` names under `parent`, appending same-tag
    /// siblings until it exists.
    ///
    /// The clock advances once if anything was created and not at all if the
    /// child was already present.
    pub fn ensure_child(&mut self, parent: ElementId, key: &ChildKey) -> Result<ElementId, TreeError> {
        if !self.is_alive(parent) {
            return Err(TreeError::StaleElement(parent));
        }
        if let Some(existing) = self.find_child(parent, key) {
            return Ok(existing);
        }

        let present = self
            .children(parent)
            .iter()
            .filter(|&&child| self.tag(child) == Some(key.tag()))
            .count();
        let mut created = self.append_unrecorded(parent, key.tag())?;
        for _ in present..key.index() as usize {
            created = self.append_unrecorded(parent, key.tag())?;
        }
        let stamp = self.clock.advance();
        tracing::trace!(?parent, ?key, id = ?created, %stamp, "materialized child");
        Ok(created)
    }

    /// Remove an element together with its subtree.
    pub fn remove(&mut self, id: ElementId) -> Result<(), TreeError> {
        let parent = self.node(id).ok_or(TreeError::StaleElement(id))?.parent;

        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|child| *child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.free(next) {
                pending.extend(node.children);
            }
        }

        let stamp = self.clock.advance();
        tracing::trace!(?id, %stamp, "removed subtree");
        Ok(())
    }

    /// Set an attribute, returning its previous value.
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, TreeError> {
        let node = self.node_mut(id).ok_or(TreeError::StaleElement(id))?;
        let previous = node.attributes.insert(name.into(), value.into());
        let stamp = self.clock.advance();
        tracing::trace!(?id, name, %stamp, "set attribute");
        Ok(previous)
    }

    /// Current stamp of the tree's clock.
    pub fn stamp(&self) -> Stamp {
        self.clock.current_stamp()
    }

    // -- Slot management --

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn append_unrecorded(&mut self, parent: ElementId, tag: &str) -> Result<ElementId, TreeError> {
        if !self.is_alive(parent) {
            return Err(TreeError::StaleElement(parent));
        }
        let id = self.alloc(Node::new(tag, Some(parent)));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        Ok(id)
    }

    fn alloc(&mut self, node: Node) -> ElementId {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped when it was freed.
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            return ElementId::new(idx, slot.generation);
        }

        #[allow(
            clippy::cast_possible_truncation,
            reason = "element count is bounded far below u32::MAX in practice"
        )]
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ElementId::new(idx, 0)
    }

    fn free(&mut self, id: ElementId) -> Option<Node> {
        let slot = self.slots.get_mut(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        // Bump generation so old handles immediately fail validation.
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.idx);
        self.live -= 1;
        Some(node)
    }
}

#[cfg(test)]
mod tests;
