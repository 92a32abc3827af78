//! Join adapters.
//!
//! `hash` is the equality inner join: the right side is indexed by key on
//! first use and the left side drives traversal.

pub mod hash;

pub use hash::{HashJoin, JoinPos};
