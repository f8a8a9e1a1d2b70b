//! Error types for heap access and collection.
//!
//! Every failure is a distinguishable value. The collector never
//! substitutes a placeholder address for an error — corruption and
//! exhaustion surface to the caller as `Err`.

use std::error::Error;
use std::fmt;

use crate::addr::Addr;
use crate::cell::Cell;

/// Errors from raw heap access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// An address outside `[0, size)`.
    OutOfBounds {
        /// The offending address.
        address: Addr,
        /// The heap size it was checked against.
        size: usize,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { address, size } => {
                write!(f, "heap address {address} out of bounds for size {size}")
            }
        }
    }
}

impl Error for HeapError {}

/// Errors from collector construction, allocation, and collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GcError {
    /// Construction with a heap too small for the control region plus
    /// one object per space.
    InvalidSize {
        /// The rejected cell count.
        size: usize,
    },
    /// Allocation still impossible after a full collection. Hard
    /// failure for that request; the heap never grows.
    OutOfMemory {
        /// Cells the allocation needed.
        requested: usize,
        /// Cells left in the active space after collecting.
        available: usize,
    },
    /// A cell expected to hold a recognized object tag held something
    /// else. Heap corruption; fatal to the collection that saw it.
    UnknownTag {
        /// Where the unexpected cell was read.
        address: Addr,
        /// What the cell actually held.
        found: Cell,
    },
    /// A heap access failed during allocation or collection.
    Heap(HeapError),
}

impl fmt::Display for GcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { size } => {
                write!(f, "illegal collector size: {size} (need more than 6 cells)")
            }
            Self::OutOfMemory {
                requested,
                available,
            } => {
                write!(
                    f,
                    "out of memory: {requested} cells requested, {available} available after collection"
                )
            }
            Self::UnknownTag { address, found } => {
                write!(f, "unknown tag at {address}: found {found}")
            }
            Self::Heap(e) => write!(f, "heap access failed: {e}"),
        }
    }
}

impl Error for GcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Heap(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HeapError> for GcError {
    fn from(e: HeapError) -> Self {
        Self::Heap(e)
    }
}
