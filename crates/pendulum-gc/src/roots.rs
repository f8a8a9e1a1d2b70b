//! Externally-significant addresses that survive every collection.

use indexmap::IndexSet;
use smallvec::SmallVec;

use pendulum_core::Addr;

/// The set of heap addresses considered live by definition.
///
/// Semantics are those of a plain set: no duplicates, and the contract
/// does not depend on order. Iteration follows insertion order, which
/// makes the relocation order of roots deterministic. The collector
/// rewrites entries in place via [`RootSet::move_root`] after moving
/// the objects they denote; dropping a root once it is no longer
/// needed is the caller's responsibility — roots never decay.
#[derive(Clone, Debug, Default)]
pub struct RootSet {
    roots: IndexSet<Addr>,
}

impl RootSet {
    /// Create an empty root set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an address. Re-adding an existing root is a no-op.
    pub fn add(&mut self, root: Addr) {
        self.roots.insert(root);
    }

    /// Drop an address. Removing an absent root is a no-op.
    pub fn remove(&mut self, root: Addr) {
        // shift_remove keeps the order of the surviving entries.
        self.roots.shift_remove(&root);
    }

    /// Replace `old` with `new` — remove-then-add.
    pub fn move_root(&mut self, old: Addr, new: Addr) {
        self.remove(old);
        self.add(new);
    }

    /// Whether `root` is currently registered.
    pub fn contains(&self, root: Addr) -> bool {
        self.roots.contains(&root)
    }

    /// Number of registered roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether no roots are registered.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterate the roots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Addr> + '_ {
        self.roots.iter().copied()
    }

    /// Copy the current entries out for mutation-safe traversal.
    ///
    /// Collection rewrites the set while relocating, so it walks this
    /// snapshot instead of iterating the live set.
    pub fn snapshot(&self) -> SmallVec<[Addr; 8]> {
        self.roots.iter().copied().collect()
    }
}
