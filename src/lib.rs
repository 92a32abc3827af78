#![forbid(unsafe_code)]
//! lazyq: lazy, composable query operators over ordered sequences.
//!
//! Wrap a collection with [`from`], chain adapters, then consume:
//!
//! ```
//! use lazyq::prelude::*;
//!
//! let data = vec![5, 3, 8, 1, 4];
//! let top: Vec<i32> = lazyq::from(&data)
//!     .filter(|x| **x > 2)
//!     .order_by()
//!     .map(|x| *x * 10)
//!     .to_vec()?;
//! assert_eq!(top, vec![30, 40, 50, 80]);
//! # Ok::<(), lazyq::Error>(())
//! ```
//!
//! Nothing is evaluated until a position is dereferenced or advanced, except
//! for the documented eager adapters (`take`, `skip`, `take_while`,
//! `skip_while`, `flatten`, `select_many`, `remove_all`).

pub use lazyq_core::{
    Bounded, DynPosition, Error, ExactCursor, Materialization, Position, QueryConfig, Result,
    SharedCursor, SliceCursor,
};
pub use lazyq_heap::{natural_less, NaturalOrder, PairingHeap};
pub use lazyq_operators::identity::{from, from_positions};
pub use lazyq_operators::{Boxed, Id, ItemOf, Iter, Sequence};

pub mod prelude {
    pub use lazyq_core::prelude::*;
    pub use lazyq_operators::identity::{from, from_positions};
    pub use lazyq_operators::{Boxed, Id, ItemOf, Sequence};
}

/// Adapter types, for naming chains in signatures.
pub mod adapters {
    pub use lazyq_operators::*;
}
