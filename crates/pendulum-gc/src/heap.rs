//! The bounds-checked cell array underlying every collector.

use std::fmt;

use pendulum_core::{Addr, Cell, HeapError};

/// A fixed-size, randomly-addressable array of tagged cells.
///
/// The heap is the only backing storage a collector touches: object
/// payloads, forwarding records, and the collector's own control
/// cursors all live in its cells. It never resizes, and every access
/// is validated against `[0, size)` — violations come back as
/// [`HeapError::OutOfBounds`], never silently coerced.
///
/// The heap enforces no discipline between cell variants; that is the
/// collector's job.
pub struct Heap {
    cells: Vec<Cell>,
}

impl Heap {
    /// Create a heap of exactly `size` cells, all painted [`Cell::Free`].
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Cell::Free; size],
        }
    }

    /// Total cell count, fixed at construction.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    fn check(&self, address: Addr) -> Result<usize, HeapError> {
        if address.0 < self.cells.len() {
            Ok(address.0)
        } else {
            Err(HeapError::OutOfBounds {
                address,
                size: self.cells.len(),
            })
        }
    }

    /// Read the cell at `address`.
    pub fn get(&self, address: Addr) -> Result<Cell, HeapError> {
        self.check(address).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `address` unconditionally.
    pub fn set(&mut self, address: Addr, cell: Cell) -> Result<(), HeapError> {
        let i = self.check(address)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Paint every cell in `[start, end)` with `cell`.
    ///
    /// `end` may equal the heap size (the range is half-open). An
    /// empty range is a no-op.
    pub fn fill(&mut self, start: Addr, end: Addr, cell: Cell) -> Result<(), HeapError> {
        if end.0 > self.cells.len() {
            return Err(HeapError::OutOfBounds {
                address: end,
                size: self.cells.len(),
            });
        }
        if start.0 < end.0 {
            self.cells[start.0..end.0].fill(cell);
        }
        Ok(())
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for cell in &self.cells {
            list.entry(&format_args!("{cell}"));
        }
        list.finish()
    }
}
