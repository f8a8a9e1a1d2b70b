//! Allocation request payloads.

use crate::addr::Addr;
use crate::cell::Tag;

/// Describes one object a caller wants allocated.
///
/// A `Cons` request references two objects that already live on the
/// heap; the collector keeps those children alive through any
/// collection the request itself triggers.
///
/// # Examples
///
/// ```
/// use pendulum_core::{Addr, AllocRequest};
///
/// let flat = AllocRequest::Flat { value: 7 };
/// assert_eq!(flat.cells_needed(), 2);
///
/// let pair = AllocRequest::Cons { head: Addr(4), tail: Addr(6) };
/// assert_eq!(pair.cells_needed(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocRequest {
    /// An atomic scalar cell.
    Flat {
        /// The scalar payload.
        value: i64,
    },
    /// A pair of two existing heap addresses.
    Cons {
        /// Address of the first child.
        head: Addr,
        /// Address of the second child.
        tail: Addr,
    },
}

impl AllocRequest {
    /// The tag the allocated object will carry.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Flat { .. } => Tag::Flat,
            Self::Cons { .. } => Tag::Cons,
        }
    }

    /// Number of contiguous cells the object needs, tag included.
    pub fn cells_needed(&self) -> usize {
        self.tag().object_cells()
    }
}
