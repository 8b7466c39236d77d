use std::fmt::Debug;

use crate::Show;

/// The raw integer type backing a [`StateId`].
pub type DefaultIdType = u32;

/// Stable identity of a state inside a [`crate::Graph`]. Ids are handed out in creation order and never
/// reused, even after the state they referred to was removed.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) DefaultIdType);

impl StateId {
    /// Returns the position of this id in the arena of its graph.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(n: usize) -> Self {
        Self(n as DefaultIdType)
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        format!("q{}", self.0)
    }
}

macro_rules! impl_integer_into_id {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StateId {
                fn from(n: $t) -> Self {
                    StateId(n as DefaultIdType)
                }
            }
        )*
    }
}

impl_integer_into_id!(u8, u16, u32, u64, usize, i32);
