//! Errors raised at the edges of the binding protocol.
//!
//! The protocol itself (`refresh`, `bind_to`, `unbind`, `is_valid`) never
//! fails; these cover handler operations that mutate the tree or resolve
//! collaborators.

use tether_tree::TreeError;

/// Failure of a handler or binding-construction operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The underlying tree or registry rejected the operation.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The parent handler was dropped while a child still refers to it.
    #[error("parent handler has been dropped")]
    ParentGone,

    /// The project tree has no root element to bind the root handler to.
    #[error("project tree has no root element")]
    NoRootElement,

    /// The handler was disposed and no longer accepts operations.
    #[error("handler has been disposed")]
    Disposed,
}
