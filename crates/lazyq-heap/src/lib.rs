#![forbid(unsafe_code)]
//! lazyq-heap: persistent data structures for lazy ordering.
//!
//! Every operation returns a new version and leaves the old one valid; versions
//! share unchanged substructure through `Rc`. Positions of an order-by adapter
//! hold a heap version each, so copying a position is O(1) and advancing a
//! copy never disturbs the original.

mod list;
pub mod pairing;

pub use pairing::{natural_less, NaturalOrder, PairingHeap};
