//! Id-property selection.
//!
//! Invariants:
//! - At most one property is the id at any time.
//! - An explicit id is never replaced.
//! - An explicit candidate replaces an implicit id; every other pair of
//!   candidates is a conflict.

use crate::error::ConflictKind;

///
/// IdSlot
///
/// Single-slot register for the id property, holding the position of the
/// selected property in the descriptor's property list.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IdSlot {
    #[default]
    Empty,
    Implicit(usize),
    Explicit(usize),
}

///
/// IdRejection
///
/// Why a candidate could not be accepted, and which slot entry blocked it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IdRejection {
    pub kind: ConflictKind,
    pub current: usize,
}

impl IdSlot {
    /// Position of the selected id property, if any.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::Implicit(index) | Self::Explicit(index) => Some(index),
        }
    }

    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::Explicit(_))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Offer the id candidate at `incoming` to the slot.
    ///
    /// This is the only transition function; the match below is the
    /// complete decision table.
    pub const fn offer(self, incoming: usize, explicit: bool) -> Result<Self, IdRejection> {
        match (self, explicit) {
            (Self::Empty, false) => Ok(Self::Implicit(incoming)),
            (Self::Empty | Self::Implicit(_), true) => Ok(Self::Explicit(incoming)),
            (Self::Implicit(current), false) => Err(IdRejection {
                kind: ConflictKind::ImplicitCollision,
                current,
            }),
            (Self::Explicit(current), false) => Err(IdRejection {
                kind: ConflictKind::ImplicitAfterExplicit,
                current,
            }),
            (Self::Explicit(current), true) => Err(IdRejection {
                kind: ConflictKind::ExplicitCollision,
                current,
            }),
        }
    }
}
