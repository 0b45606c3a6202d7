//! Projects, the elements they own, and the registry that looks them up.
//!
//! A [`Project`] pairs an [`ElementTree`] with the [`SharedClock`] that tree
//! advances. [`Element`] is the owning handle handed to bindings: it keeps its
//! project alive and can check its own liveness.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{ElementId, ElementTree, SharedClock, TreeError};

/// Identifier of an open project.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectId(u32);

impl ProjectId {
    /// Create a project id from its raw value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        ProjectId(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// An element tree and its modification clock.
///
/// # Thread Safety
/// The tree sits behind a `RwLock`; the clock is lock-free.
pub struct Project {
    id: ProjectId,
    clock: SharedClock,
    tree: RwLock<ElementTree>,
}

impl Project {
    /// Create a project with a fresh clock.
    pub fn new(id: ProjectId) -> Self {
        Self::with_clock(id, SharedClock::new())
    }

    /// Create a project whose tree advances `clock`.
    pub fn with_clock(id: ProjectId, clock: SharedClock) -> Self {
        Project {
            id,
            tree: RwLock::new(ElementTree::new(clock.clone())),
            clock,
        }
    }

    /// This project's id.
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// The clock every mutation of this project's tree advances.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Shared access to the tree.
    pub fn read(&self) -> RwLockReadGuard<'_, ElementTree> {
        self.tree.read()
    }

    /// Exclusive access to the tree.
    pub fn write(&self) -> RwLockWriteGuard<'_, ElementTree> {
        self.tree.write()
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("stamp", &self.clock.current_stamp())
            .finish_non_exhaustive()
    }
}

/// A concrete element: a handle into a specific project's tree.
///
/// Holding an `Element` keeps the project alive but not the element; use
/// [`is_valid`](Self::is_valid) to check the latter.
#[derive(Clone)]
pub struct Element {
    project: Arc<Project>,
    id: ElementId,
}

impl Element {
    /// Wrap `id` as an element of `project`.
    pub fn new(project: Arc<Project>, id: ElementId) -> Self {
        Element { project, id }
    }

    /// The element's handle within its tree.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The project owning this element.
    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    /// Whether the element is still part of its project's tree.
    pub fn is_valid(&self) -> bool {
        self.project.read().is_alive(self.id)
    }

    /// The element's tag, if it is still alive.
    pub fn tag(&self) -> Option<String> {
        self.project.read().tag(self.id).map(str::to_owned)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.project, &other.project)
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.project.id.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({:?}, {:?})", self.project.id, self.id)
    }
}

/// Registry of open projects.
///
/// Resolves per-project singletons (the project itself, its clock) by id.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: DashMap<ProjectId, Arc<Project>>,
    next_id: AtomicU32,
}

impl ProjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new project with a fresh clock.
    pub fn open_project(&self) -> Arc<Project> {
        let id = ProjectId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let project = Arc::new(Project::new(id));
        self.projects.insert(id, Arc::clone(&project));
        tracing::debug!(?id, "opened project");
        project
    }

    /// Look up an open project.
    pub fn project(&self, id: ProjectId) -> Result<Arc<Project>, TreeError> {
        self.projects
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(TreeError::UnknownProject(id))
    }

    /// The modification clock of an open project.
    pub fn clock_for(&self, id: ProjectId) -> Result<SharedClock, TreeError> {
        self.projects
            .get(&id)
            .map(|entry| entry.value().clock().clone())
            .ok_or(TreeError::UnknownProject(id))
    }

    /// Close a project, returning it if it was open.
    ///
    /// Outstanding [`Element`]s keep the project's data alive.
    pub fn close_project(&self, id: ProjectId) -> Option<Arc<Project>> {
        let closed = self.projects.remove(&id).map(|(_, project)| project);
        if closed.is_some() {
            tracing::debug!(?id, "closed project");
        }
        closed
    }

    /// Number of open projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether no project is open.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
