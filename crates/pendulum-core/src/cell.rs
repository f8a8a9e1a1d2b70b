//! The tagged per-cell value model.

use std::fmt;

use crate::addr::Addr;

/// Object tags occupying the first cell of every heap object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// An atomic scalar: `[Flat, value]`, two cells.
    Flat,
    /// A two-field pair: `[Cons, head, tail]`, three cells.
    Cons,
    /// A relocation record installed over a moved object's old
    /// location: `[Forward, new_address]`, two cells. Later references
    /// to the old address resolve through it to the single new copy.
    Forward,
}

impl Tag {
    /// Number of cells an object with this tag occupies, tag included.
    pub fn object_cells(self) -> usize {
        match self {
            Self::Flat | Self::Forward => 2,
            Self::Cons => 3,
        }
    }

    /// The tag's wire name, as it appears in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Cons => "cons",
            Self::Forward => "forward",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single heap cell.
///
/// The heap itself enforces no migration discipline between variants —
/// a cell's meaning follows from the tag cell of the object containing
/// it, or from the collector's control-region layout for cells 0–3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Paint sentinel for unused regions. Never consulted by the
    /// collection algorithm's control logic.
    Free,
    /// The leading tag cell of an object.
    Tag(Tag),
    /// An address payload: a control cursor, a cons child, or a
    /// forwarding target.
    Addr(Addr),
    /// An opaque user scalar carried by a flat object.
    Value(i64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Addr(addr) => write!(f, "addr({addr})"),
            Self::Value(v) => write!(f, "value({v})"),
        }
    }
}
