//! Typed handles into the IR arenas
//!
//! Ids are allocated monotonically by [`IRContext`](super::IRContext) and never
//! reused. Only the context mints them, so an id from one context is meaningless
//! in another.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: u32) -> Self {
                $name(index)
            }

            /// Get the raw arena index (allocation order)
            pub fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Handle to a [`Type`](super::Type)
    TypeId
);
define_id!(
    /// Handle to a [`Function`](super::Function)
    FunctionId
);
define_id!(
    /// Handle to an [`Item`](super::Item)
    ItemId
);

/// Ids that an [`Arena`](super::arena::Arena) can allocate
pub trait ArenaId: Copy + Eq {
    /// Arena name used in invariant reports
    const KIND: &'static str;

    /// Build the id for an arena slot
    fn from_slot(slot: u32) -> Self;

    /// Arena slot this id refers to
    fn slot(self) -> usize;
}

macro_rules! impl_arena_id {
    ($name:ident, $kind:literal) => {
        impl ArenaId for $name {
            const KIND: &'static str = $kind;

            fn from_slot(slot: u32) -> Self {
                $name::from_index(slot)
            }

            fn slot(self) -> usize {
                self.0 as usize
            }
        }
    };
}

impl_arena_id!(TypeId, "type");
impl_arena_id!(FunctionId, "function");
impl_arena_id!(ItemId, "item");
