//! Bounds-checked cell heap and Cheney-style two-space copying
//! collector.
//!
//! # Architecture
//!
//! ```text
//! TwoSpaceCollector (algorithm + control cursors)
//! ├── Heap      — fixed Vec<Cell>, strict bounds checks
//! │   ├── control region (cells 0–3, collector state)
//! │   ├── lower space ┐ active/idle roles swap on every
//! │   └── upper space ┘ collection ("flip")
//! └── RootSet   — IndexSet<Addr>, rewritten as objects move
//! ```
//!
//! Nothing is allocated outside the fixed heap while a collection
//! runs: the to-space region between the scan and copy cursors
//! doubles as the breadth-first worklist.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod heap;
pub mod roots;
pub mod two_space;

pub use heap::Heap;
pub use roots::RootSet;
pub use two_space::{GcStats, TwoSpaceCollector, CONTROL_CELLS, MIN_COLLECTOR_CELLS};
