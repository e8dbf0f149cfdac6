//! An ordered map and set based on a self-adjusting splay tree.
//!
//! Every key-directed access may rotate the touched node toward the root, so
//! the tree adapts its shape to the workload: hot keys end up near the top,
//! cold keys sink. The [`SplayPolicy`] controls how aggressively that
//! happens, separately for inserts and lookups. Because lookups reshape the
//! tree, they take `&mut self`; plain iteration is a pure read and does not.

extern crate compare;

pub use error::Error;
pub use map::Map;
pub use policy::{SplayMode, SplayPolicy};
pub use set::Set;

pub mod map;
pub mod set;

mod error;
mod node;
mod policy;

#[cfg(feature = "quickcheck")]
mod quickcheck;
