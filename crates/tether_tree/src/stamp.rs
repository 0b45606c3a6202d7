//! Modification stamps and the clock that hands them out.
//!
//! A [`ModificationClock`] is a monotonically non-decreasing counter. Every
//! successful mutation of an [`ElementTree`](crate::ElementTree) advances it by
//! one, so comparing two [`Stamp`]s answers "has anything changed since?" in
//! O(1) without tracking which nodes changed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque snapshot of a clock's value.
///
/// Stamps are only meaningful relative to the clock that produced them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Stamp(u64);

impl Stamp {
    /// The value a fresh clock starts at.
    pub const ZERO: Stamp = Stamp(0);

    /// Create a stamp from a raw counter value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Stamp(raw)
    }

    /// Get the raw counter value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The stamp immediately after this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Stamp(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stamp({})", self.0)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic modification counter.
///
/// # Thread Safety
/// Reads are lock-free and may race freely with [`advance`](Self::advance);
/// a reader sees either the old or the new stamp, never a torn value.
#[derive(Debug, Default)]
pub struct ModificationClock {
    count: AtomicU64,
}

impl ModificationClock {
    /// Create a clock at [`Stamp::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock whose current stamp is `start`.
    pub fn starting_at(start: Stamp) -> Self {
        ModificationClock {
            count: AtomicU64::new(start.raw()),
        }
    }

    /// Read the current stamp.
    #[inline]
    pub fn current_stamp(&self) -> Stamp {
        Stamp(self.count.load(Ordering::Acquire))
    }

    /// Record one modification and return the new stamp.
    #[inline]
    pub fn advance(&self) -> Stamp {
        let previous = self.count.fetch_add(1, Ordering::AcqRel);
        Stamp(previous.wrapping_add(1))
    }
}

/// Thread-safe shared handle to a [`ModificationClock`].
///
/// Cloning is a reference-count bump; every clone observes the same counter.
/// Two handles are equal when they point at the same clock.
#[derive(Clone, Debug, Default)]
pub struct SharedClock(Arc<ModificationClock>);

impl SharedClock {
    /// Create a shared clock at [`Stamp::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared clock whose current stamp is `start`.
    pub fn starting_at(start: Stamp) -> Self {
        SharedClock(Arc::new(ModificationClock::starting_at(start)))
    }

    /// Whether `self` and `other` are handles to the same clock.
    #[inline]
    pub fn same_clock(&self, other: &SharedClock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedClock {
    type Target = ModificationClock;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
