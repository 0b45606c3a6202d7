//! Errors reported by tree and registry operations.

use crate::{ElementId, ProjectId};

/// Failure of an [`ElementTree`](crate::ElementTree) mutation or a
/// [`ProjectRegistry`](crate::ProjectRegistry) lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The handle refers to an element that was removed (or never existed).
    #[error("element {0:?} is no longer part of the tree")]
    StaleElement(ElementId),

    /// A tree has at most one root.
    #[error("tree already has root element {0:?}")]
    RootAlreadyExists(ElementId),

    /// No project with this id is open in the registry.
    #[error("project {0:?} is not open")]
    UnknownProject(ProjectId),
}
