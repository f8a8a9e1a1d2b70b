//! The two-space copying collector.
//!
//! [`TwoSpaceCollector`] is the concrete [`Collector`]: it splits one
//! [`Heap`] into two spaces that trade roles on every collection.
//! Steady-state allocation bumps a cursor through the active ("from")
//! space; when a request does not fit, everything reachable from the
//! roots is relocated into the idle ("to") space, forwarding records
//! make shared references converge on a single copy, and the spaces
//! flip.
//!
//! A collection runs in four steps:
//! 1. repoint the control cursors at the to-space,
//! 2. seed — relocate the transient roots, then every root-set entry,
//! 3. drain — scan copied objects breadth-first, relocating children,
//! 4. flip — repaint the old space, swap the bases, restore the
//!    allocation limit.
//!
//! # Control region
//!
//! Collector state lives in the first four heap cells. The two cursor
//! slots carry a different meaning in each phase:
//!
//! ```text
//! slot 0: base of the active (from) space
//! slot 1: base of the idle (to) space
//! slot 2: bump pointer      — scan pointer while collecting
//! slot 3: allocation limit  — copy pointer while collecting
//! ```
//!
//! While collecting, the to-space between the scan and copy pointers
//! is itself the breadth-first worklist: objects land there when
//! copied and are processed in arrival order. The collector never
//! allocates outside the heap it manages.

use pendulum_core::{Addr, AllocRequest, Cell, Collector, GcError, Tag};

use crate::heap::Heap;
use crate::roots::RootSet;

/// Heap cells reserved for collector state.
pub const CONTROL_CELLS: usize = 4;

/// Smallest heap a [`TwoSpaceCollector`] accepts: the control region
/// plus room for at least one object across the two spaces.
pub const MIN_COLLECTOR_CELLS: usize = 7;

// Control-region slots.
const FROM_BASE_SLOT: Addr = Addr(0);
const TO_BASE_SLOT: Addr = Addr(1);
const CURSOR_SLOT: Addr = Addr(2);
const LIMIT_SLOT: Addr = Addr(3);

/// Counters accumulated across collections. Informational only; no
/// functional behaviour depends on them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Completed collections.
    pub collections: u64,
    /// Objects relocated into a to-space (forward resolutions are not
    /// copies and are not counted).
    pub objects_copied: u64,
    /// Cells moved by those relocations.
    pub cells_copied: u64,
}

/// A Cheney-style two-space copying collector over a fixed heap.
#[derive(Debug)]
pub struct TwoSpaceCollector {
    heap: Heap,
    roots: RootSet,
    stats: GcStats,
}

impl TwoSpaceCollector {
    /// Create a collector over a fresh heap of `size` cells.
    ///
    /// Rejects sizes below [`MIN_COLLECTOR_CELLS`] with
    /// [`GcError::InvalidSize`]. Cells `[4, size)` split into two
    /// near-equal spaces at `4 + (size - 4) / 2`; when the split is
    /// odd the upper space is one cell larger.
    pub fn new(size: usize) -> Result<Self, GcError> {
        if size < MIN_COLLECTOR_CELLS {
            return Err(GcError::InvalidSize { size });
        }
        // Heap::new paints every cell Free before the control cells
        // are installed.
        let mut heap = Heap::new(size);
        let from_base = Addr(CONTROL_CELLS);
        let to_base = Addr(CONTROL_CELLS + (size - CONTROL_CELLS) / 2);
        heap.set(FROM_BASE_SLOT, Cell::Addr(from_base))?;
        heap.set(TO_BASE_SLOT, Cell::Addr(to_base))?;
        heap.set(CURSOR_SLOT, Cell::Addr(from_base))?;
        heap.set(LIMIT_SLOT, Cell::Addr(to_base))?;
        Ok(Self {
            heap,
            roots: RootSet::new(),
            stats: GcStats::default(),
        })
    }

    /// Shared view of the managed heap, for inspection.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The current root set.
    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> GcStats {
        self.stats
    }

    /// Total heap size in cells, control region included.
    pub fn capacity(&self) -> usize {
        self.heap.size()
    }

    /// Cells currently allocated in the active space.
    pub fn used_cells(&self) -> usize {
        match (self.from_base(), self.alloc_ptr()) {
            (Ok(base), Ok(ptr)) => ptr.0.saturating_sub(base.0),
            _ => 0,
        }
    }

    // ── control region ─────────────────────────────────────────────
    //
    // Slots 2 and 3 each carry two meanings; the accessor pair in
    // force depends on whether a collection is running.

    fn control(&self, slot: Addr) -> Result<Addr, GcError> {
        match self.heap.get(slot)? {
            Cell::Addr(a) => Ok(a),
            found => Err(GcError::UnknownTag {
                address: slot,
                found,
            }),
        }
    }

    fn set_control(&mut self, slot: Addr, value: Addr) -> Result<(), GcError> {
        self.heap.set(slot, Cell::Addr(value))?;
        Ok(())
    }

    /// Base of the active space.
    fn from_base(&self) -> Result<Addr, GcError> {
        self.control(FROM_BASE_SLOT)
    }

    /// Base of the idle space.
    fn to_base(&self) -> Result<Addr, GcError> {
        self.control(TO_BASE_SLOT)
    }

    /// Next free cell in the active space (steady state, slot 2).
    fn alloc_ptr(&self) -> Result<Addr, GcError> {
        self.control(CURSOR_SLOT)
    }

    fn set_alloc_ptr(&mut self, value: Addr) -> Result<(), GcError> {
        self.set_control(CURSOR_SLOT, value)
    }

    /// One past the last usable cell of the active space (steady
    /// state, slot 3).
    fn limit(&self) -> Result<Addr, GcError> {
        self.control(LIMIT_SLOT)
    }

    fn set_limit(&mut self, value: Addr) -> Result<(), GcError> {
        self.set_control(LIMIT_SLOT, value)
    }

    /// Next unprocessed copied object in the to-space (collection
    /// phase, slot 2).
    fn scan_ptr(&self) -> Result<Addr, GcError> {
        self.control(CURSOR_SLOT)
    }

    fn set_scan_ptr(&mut self, value: Addr) -> Result<(), GcError> {
        self.set_control(CURSOR_SLOT, value)
    }

    /// Next free cell in the to-space (collection phase, slot 3).
    fn copy_ptr(&self) -> Result<Addr, GcError> {
        self.control(LIMIT_SLOT)
    }

    fn set_copy_ptr(&mut self, value: Addr) -> Result<(), GcError> {
        self.set_control(LIMIT_SLOT, value)
    }

    // ── collection ─────────────────────────────────────────────────

    /// Relocate the object at `from` into the to-space, leaving a
    /// forwarding record over its old cells.
    ///
    /// An already-forwarded object resolves to its existing copy, so
    /// every reachable object moves at most once per collection and
    /// shared references converge on one address. Cons children are
    /// copied verbatim — still pointing into the from-space — and are
    /// rewritten later by the scan loop.
    fn copy_from(&mut self, from: Addr) -> Result<Addr, GcError> {
        let target = self.copy_ptr()?;
        match self.heap.get(from)? {
            Cell::Tag(Tag::Forward) => match self.heap.get(from.offset(1))? {
                Cell::Addr(new) => Ok(new),
                found => Err(GcError::UnknownTag {
                    address: from.offset(1),
                    found,
                }),
            },
            Cell::Tag(Tag::Flat) => {
                let value = self.heap.get(from.offset(1))?;
                self.heap.set(target, Cell::Tag(Tag::Flat))?;
                self.heap.set(target.offset(1), value)?;
                self.forward(from, target)?;
                self.set_copy_ptr(target.offset(Tag::Flat.object_cells()))?;
                self.note_copy(Tag::Flat);
                Ok(target)
            }
            Cell::Tag(Tag::Cons) => {
                let head = self.heap.get(from.offset(1))?;
                let tail = self.heap.get(from.offset(2))?;
                self.heap.set(target, Cell::Tag(Tag::Cons))?;
                self.heap.set(target.offset(1), head)?;
                self.heap.set(target.offset(2), tail)?;
                self.forward(from, target)?;
                self.set_copy_ptr(target.offset(Tag::Cons.object_cells()))?;
                self.note_copy(Tag::Cons);
                Ok(target)
            }
            found => Err(GcError::UnknownTag {
                address: from,
                found,
            }),
        }
    }

    /// Install `[forward, new]` over a relocated object's old cells.
    fn forward(&mut self, old: Addr, new: Addr) -> Result<(), GcError> {
        self.heap.set(old, Cell::Tag(Tag::Forward))?;
        self.heap.set(old.offset(1), Cell::Addr(new))?;
        Ok(())
    }

    fn note_copy(&mut self, tag: Tag) {
        self.stats.objects_copied += 1;
        self.stats.cells_copied += tag.object_cells() as u64;
    }

    /// Process the copied-but-unscanned object at the scan pointer.
    fn scan_step(&mut self, scan: Addr) -> Result<(), GcError> {
        match self.heap.get(scan)? {
            Cell::Tag(Tag::Flat) => self.set_scan_ptr(scan.offset(Tag::Flat.object_cells())),
            Cell::Tag(Tag::Cons) => {
                for child in 1..=2 {
                    let slot = scan.offset(child);
                    let old = match self.heap.get(slot)? {
                        Cell::Addr(a) => a,
                        found => {
                            return Err(GcError::UnknownTag {
                                address: slot,
                                found,
                            })
                        }
                    };
                    let new = self.copy_from(old)?;
                    self.heap.set(slot, Cell::Addr(new))?;
                }
                self.set_scan_ptr(scan.offset(Tag::Cons.object_cells()))
            }
            // Forward never appears in the to-space; anything else at
            // an object boundary is corruption.
            found => Err(GcError::UnknownTag {
                address: scan,
                found,
            }),
        }
    }

    /// Repaint the exhausted space and swap the space roles.
    fn flip(&mut self) -> Result<(), GcError> {
        let old_from = self.from_base()?;
        let old_to = self.to_base()?;

        // The old space ended where the other space began when it was
        // the lower half, or at the end of the heap when it was the
        // upper half. The paint is diagnostic; control logic never
        // reads it.
        let old_end = if old_from < old_to {
            old_to
        } else {
            Addr(self.heap.size())
        };
        self.heap.fill(old_from, old_end, Cell::Free)?;

        self.set_control(FROM_BASE_SLOT, old_to)?;
        self.set_control(TO_BASE_SLOT, old_from)?;

        // Slot 3 returns to its steady-state limit role; slot 2 keeps
        // the drain's final value, the first free cell of the newly
        // active space.
        let new_limit = if old_to >= old_from {
            Addr(self.heap.size())
        } else {
            old_from
        };
        self.set_limit(new_limit)
    }
}

impl Collector for TwoSpaceCollector {
    fn allocate(&mut self, request: AllocRequest, as_root: bool) -> Result<Addr, GcError> {
        let needed = request.cells_needed();

        let request = if self.space_exists(needed) {
            request
        } else {
            // A cons request's children are the transient roots: the
            // new object is not written yet, so nothing else keeps
            // them alive through the collection. The retried write
            // must use the relocated addresses.
            let relocated = match request {
                AllocRequest::Flat { .. } => {
                    self.collect(None, None)?;
                    request
                }
                AllocRequest::Cons { head, tail } => {
                    match self.collect(Some(head), Some(tail))? {
                        (Some(head), Some(tail)) => AllocRequest::Cons { head, tail },
                        // collect returns a present address for every
                        // present transient root it was given.
                        _ => unreachable!("present transient roots survive collection"),
                    }
                }
            };
            if !self.space_exists(needed) {
                let available = self.limit()?.0.saturating_sub(self.alloc_ptr()?.0);
                return Err(GcError::OutOfMemory {
                    requested: needed,
                    available,
                });
            }
            relocated
        };

        let at = self.alloc_ptr()?;
        match request {
            AllocRequest::Flat { value } => {
                self.heap.set(at, Cell::Tag(Tag::Flat))?;
                self.heap.set(at.offset(1), Cell::Value(value))?;
            }
            AllocRequest::Cons { head, tail } => {
                self.heap.set(at, Cell::Tag(Tag::Cons))?;
                self.heap.set(at.offset(1), Cell::Addr(head))?;
                self.heap.set(at.offset(2), Cell::Addr(tail))?;
            }
        }
        self.set_alloc_ptr(at.offset(needed))?;
        if as_root {
            self.roots.add(at);
        }
        Ok(at)
    }

    fn space_exists(&self, cells: usize) -> bool {
        match (self.alloc_ptr(), self.limit()) {
            (Ok(ptr), Ok(limit)) => ptr
                .0
                .checked_add(cells)
                .is_some_and(|end| end <= limit.0),
            _ => false,
        }
    }

    fn collect(
        &mut self,
        root1: Option<Addr>,
        root2: Option<Addr>,
    ) -> Result<(Option<Addr>, Option<Addr>), GcError> {
        let to_base = self.to_base()?;
        self.set_scan_ptr(to_base)?;
        self.set_copy_ptr(to_base)?;

        // Seed: transient roots first, then every registered root.
        // Transient roots are relocated and handed back, never stored.
        let new_root1 = match root1 {
            Some(r) => Some(self.copy_from(r)?),
            None => None,
        };
        let new_root2 = match root2 {
            Some(r) => Some(self.copy_from(r)?),
            None => None,
        };

        for old in self.roots.snapshot() {
            let new = self.copy_from(old)?;
            self.roots.move_root(old, new);
        }

        // Drain: the to-space between the scan and copy pointers is
        // the worklist. The copy pointer only advances when a
        // not-yet-forwarded object is reached, so the loop reaches its
        // fixed point after every live object has been scanned once.
        loop {
            let scan = self.scan_ptr()?;
            if scan >= self.copy_ptr()? {
                break;
            }
            self.scan_step(scan)?;
        }

        self.flip()?;
        self.stats.collections += 1;
        Ok((new_root1, new_root2))
    }

    fn add_root(&mut self, root: Addr) {
        self.roots.add(root);
    }

    fn remove_root(&mut self, root: Addr) {
        self.roots.remove(root);
    }

    fn move_root(&mut self, old: Addr, new: Addr) {
        self.roots.move_root(old, new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_undersized_heaps() {
        for size in [0, 1, 5, 6] {
            assert_eq!(
                TwoSpaceCollector::new(size).unwrap_err(),
                GcError::InvalidSize { size }
            );
        }
        assert!(TwoSpaceCollector::new(MIN_COLLECTOR_CELLS).is_ok());
    }

    #[test]
    fn construction_installs_control_region() {
        let gc = TwoSpaceCollector::new(14).unwrap();
        let heap = gc.heap();
        assert_eq!(heap.get(FROM_BASE_SLOT).unwrap(), Cell::Addr(Addr(4)));
        assert_eq!(heap.get(TO_BASE_SLOT).unwrap(), Cell::Addr(Addr(9)));
        assert_eq!(heap.get(CURSOR_SLOT).unwrap(), Cell::Addr(Addr(4)));
        assert_eq!(heap.get(LIMIT_SLOT).unwrap(), Cell::Addr(Addr(9)));
        // Everything past the control region starts painted free.
        for i in CONTROL_CELLS..14 {
            assert_eq!(heap.get(Addr(i)).unwrap(), Cell::Free);
        }
    }

    #[test]
    fn odd_split_gives_the_upper_space_the_extra_cell() {
        let gc = TwoSpaceCollector::new(15).unwrap();
        // [4, 9) is five cells, [9, 15) is six.
        assert_eq!(gc.heap().get(TO_BASE_SLOT).unwrap(), Cell::Addr(Addr(9)));
    }

    #[test]
    fn flat_allocation_writes_tag_and_payload() {
        let mut gc = TwoSpaceCollector::new(14).unwrap();
        let at = gc.allocate(AllocRequest::Flat { value: 7 }, false).unwrap();
        assert_eq!(at, Addr(4));
        assert_eq!(gc.heap().get(at).unwrap(), Cell::Tag(Tag::Flat));
        assert_eq!(gc.heap().get(at.offset(1)).unwrap(), Cell::Value(7));
        assert_eq!(gc.used_cells(), 2);
        assert!(gc.roots().is_empty());
    }

    #[test]
    fn cons_allocation_writes_both_children() {
        let mut gc = TwoSpaceCollector::new(20).unwrap();
        let a = gc.allocate(AllocRequest::Flat { value: 1 }, false).unwrap();
        let b = gc.allocate(AllocRequest::Flat { value: 2 }, false).unwrap();
        let pair = gc
            .allocate(AllocRequest::Cons { head: a, tail: b }, true)
            .unwrap();
        assert_eq!(pair, Addr(8));
        assert_eq!(gc.heap().get(pair.offset(1)).unwrap(), Cell::Addr(a));
        assert_eq!(gc.heap().get(pair.offset(2)).unwrap(), Cell::Addr(b));
        assert!(gc.roots().contains(pair));
    }

    #[test]
    fn space_exists_is_exact_at_the_limit() {
        let mut gc = TwoSpaceCollector::new(14).unwrap();
        // Active space [4, 9) holds five cells.
        assert!(gc.space_exists(5));
        assert!(!gc.space_exists(6));
        gc.allocate(AllocRequest::Flat { value: 0 }, false).unwrap();
        assert!(gc.space_exists(3));
        assert!(!gc.space_exists(4));
    }

    #[test]
    fn noop_collection_flips_into_an_empty_space() {
        let mut gc = TwoSpaceCollector::new(14).unwrap();
        let (r1, r2) = gc.collect(None, None).unwrap();
        assert_eq!((r1, r2), (None, None));
        assert_eq!(gc.used_cells(), 0);
        // Flipped: the upper space is active and runs to the heap end.
        assert_eq!(gc.heap().get(FROM_BASE_SLOT).unwrap(), Cell::Addr(Addr(9)));
        assert_eq!(gc.heap().get(TO_BASE_SLOT).unwrap(), Cell::Addr(Addr(4)));
        assert_eq!(gc.heap().get(CURSOR_SLOT).unwrap(), Cell::Addr(Addr(9)));
        assert_eq!(gc.heap().get(LIMIT_SLOT).unwrap(), Cell::Addr(Addr(14)));
        assert_eq!(gc.stats().collections, 1);
        assert_eq!(gc.stats().objects_copied, 0);
    }

    #[test]
    fn second_flip_restores_the_lower_space() {
        let mut gc = TwoSpaceCollector::new(15).unwrap();
        gc.collect(None, None).unwrap();
        gc.collect(None, None).unwrap();
        assert_eq!(gc.heap().get(FROM_BASE_SLOT).unwrap(), Cell::Addr(Addr(4)));
        assert_eq!(gc.heap().get(TO_BASE_SLOT).unwrap(), Cell::Addr(Addr(9)));
        // The lower space's limit is the upper space's base, not the
        // heap end.
        assert_eq!(gc.heap().get(LIMIT_SLOT).unwrap(), Cell::Addr(Addr(9)));
    }

    #[test]
    fn corrupted_object_aborts_collection() {
        let mut gc = TwoSpaceCollector::new(14).unwrap();
        gc.allocate(AllocRequest::Flat { value: 1 }, true).unwrap();
        // Clobber the rooted object's tag cell.
        gc.heap.set(Addr(4), Cell::Value(9)).unwrap();
        let err = gc.collect(None, None).unwrap_err();
        assert_eq!(
            err,
            GcError::UnknownTag {
                address: Addr(4),
                found: Cell::Value(9)
            }
        );
    }

    #[test]
    fn corrupted_cons_child_aborts_the_scan() {
        let mut gc = TwoSpaceCollector::new(20).unwrap();
        let a = gc.allocate(AllocRequest::Flat { value: 1 }, false).unwrap();
        let pair = gc
            .allocate(AllocRequest::Cons { head: a, tail: a }, true)
            .unwrap();
        // A child cell holding a scalar is not a relocatable address.
        gc.heap.set(pair.offset(2), Cell::Value(3)).unwrap();
        assert!(matches!(
            gc.collect(None, None).unwrap_err(),
            GcError::UnknownTag { .. }
        ));
    }

    #[test]
    fn stats_count_copies_not_forward_resolutions() {
        let mut gc = TwoSpaceCollector::new(20).unwrap();
        let a = gc.allocate(AllocRequest::Flat { value: 5 }, true).unwrap();
        gc.allocate(AllocRequest::Cons { head: a, tail: a }, true)
            .unwrap();
        gc.collect(None, None).unwrap();
        let stats = gc.stats();
        // One flat and one cons moved; the shared child resolved
        // through its forwarding record the second time.
        assert_eq!(stats.objects_copied, 2);
        assert_eq!(stats.cells_copied, 5);
    }
}
