//! The collector protocol.

use crate::addr::Addr;
use crate::error::GcError;
use crate::request::AllocRequest;

/// The contract any collection strategy satisfies.
///
/// A host runtime drives its heap exclusively through this trait:
/// allocation requests go in, addresses come out, and the root
/// bookkeeping calls keep externally-held references current when a
/// collection moves objects.
pub trait Collector {
    /// Allocate one object, collecting first if the active space
    /// cannot hold it.
    ///
    /// At most one collection is attempted per request; if space is
    /// still insufficient afterwards the result is
    /// [`GcError::OutOfMemory`]. With `as_root` set, the returned
    /// address is also registered in the root set.
    fn allocate(&mut self, request: AllocRequest, as_root: bool) -> Result<Addr, GcError>;

    /// Whether the active space can take `cells` more cells without a
    /// collection. Advisory; [`Collector::allocate`] performs the same
    /// check itself.
    fn space_exists(&self, cells: usize) -> bool;

    /// Run a full collection.
    ///
    /// `root1` and `root2` are transient roots: relocated for this
    /// call only, never stored in the root set. Each present root's
    /// post-collection address comes back in the matching position;
    /// absent roots come back as `None`. Every address in the root set
    /// is relocated as a side effect and the set rewritten in place.
    fn collect(
        &mut self,
        root1: Option<Addr>,
        root2: Option<Addr>,
    ) -> Result<(Option<Addr>, Option<Addr>), GcError>;

    /// Mark an address live regardless of reachability.
    fn add_root(&mut self, root: Addr);

    /// Drop an address from the root set. Roots never decay; removal
    /// is always the caller's responsibility.
    fn remove_root(&mut self, root: Addr);

    /// Replace `old` with `new` — remove-then-add. The collector calls
    /// this itself for every root it relocates.
    fn move_root(&mut self, old: Addr, new: Addr);
}
