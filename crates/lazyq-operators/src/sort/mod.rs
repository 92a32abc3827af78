//! Ordering adapters.
//!
//! `order_by` is a lazy, stable sort driven by the persistent pairing heap in
//! `lazyq-heap`.

pub mod order_by;

pub use order_by::{OrderBy, OrderByPos};
