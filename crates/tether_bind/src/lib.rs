//! Tether Bind - lazily-resolved element bindings
//!
//! A binding tells its owner where a logical element lives in a mutable
//! [`ElementTree`](tether_tree::ElementTree). It is one of two strategies:
//!
//! - [`PhysicalBinding`]: holds a concrete [`Element`](tether_tree::Element)
//! - [`VirtualBinding`]: holds only a parent handler and the clock stamp it
//!   last saw; it asks the parent to recompute an element when the clock has
//!   moved, and is promoted to a physical binding when the parent finds one
//!
//! Validity is checked against a [`ModificationClock`](tether_tree::ModificationClock)
//! rather than tracked per node, so an unchanged tree costs one integer
//! comparison per check.
//!
//! # Usage
//!
//! Owners keep a [`BindingStrategy`] in a slot and replace it with whatever
//! each operation returns:
//!
//! ```text
//! *slot = slot.refresh();
//! if let Some(element) = slot.bound_element() { ... }
//! ```
//!
//! [`ElementHandler`] is a ready-made owner that mirrors a project's tree and
//! acts as the [`ParentHandler`] for its children.

mod error;
mod handler;
mod parent;
mod physical;
mod strategy;
mod virtual_binding;

#[cfg(test)]
mod testing;

pub use error::BindingError;
pub use handler::ElementHandler;
pub use parent::{ParentHandler, ParentRef};
pub use physical::{Origin, PhysicalBinding};
pub use strategy::BindingStrategy;
pub use virtual_binding::VirtualBinding;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tether_bind=debug` or `RUST_LOG=tether_bind=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
