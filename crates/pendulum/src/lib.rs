//! Pendulum: two-space copying garbage collection for tagged-cell
//! heaps.
//!
//! Pendulum is the memory substrate for a small interpreter or
//! runtime: a fixed heap of tagged cells, automatic reclamation by
//! Cheney-style copying, and a root-tracking interface that keeps
//! externally-held references current when objects move.
//!
//! # Quick start
//!
//! ```rust
//! use pendulum::prelude::*;
//!
//! let mut gc = TwoSpaceCollector::new(64).unwrap();
//!
//! // A rooted scalar and a rooted pair that shares it twice.
//! let item = gc.allocate(AllocRequest::Flat { value: 7 }, true).unwrap();
//! let pair = gc
//!     .allocate(AllocRequest::Cons { head: item, tail: item }, true)
//!     .unwrap();
//!
//! // Collect; the pair moves and the root set follows it.
//! let (moved, _) = gc.collect(Some(pair), None).unwrap();
//! let moved = moved.unwrap();
//! assert!(gc.roots().contains(moved));
//!
//! // Both children resolve to the one relocated copy of `item`.
//! let head = gc.heap().get(moved.offset(1)).unwrap();
//! let tail = gc.heap().get(moved.offset(2)).unwrap();
//! assert_eq!(head, tail);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pendulum-core` | Addresses, cells, allocation requests, errors, the [`types::Collector`] trait |
//! | [`gc`] | `pendulum-gc` | The heap, the root set, and [`gc::TwoSpaceCollector`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors, and the collector protocol (`pendulum-core`).
pub use pendulum_core as types;

/// Heap, root set, and the concrete collector (`pendulum-gc`).
pub use pendulum_gc as gc;

pub mod prelude {
    //! The names a host runtime needs to drive a collector.
    pub use pendulum_core::{Addr, AllocRequest, Cell, Collector, GcError, HeapError, Tag};
    pub use pendulum_gc::{GcStats, Heap, RootSet, TwoSpaceCollector};
}
