#![forbid(unsafe_code)]
//! lazyq-core: the position layer every lazyq adapter is written against.
//!
//! Adapters never see a concrete container. They see a pair of positions that
//! can be dereferenced, advanced, (optionally) retreated, and compared. This
//! crate defines that capability set ([`Position`]), the cursors that bring
//! ordinary collections into it ([`Bounded`]), the boxed wrapper that erases
//! cursor types ([`DynPosition`]), and the shared error/config types.

pub mod config;
pub mod erased;
pub mod error;
pub mod position;
pub mod prelude;

pub use config::{Materialization, QueryConfig};
pub use erased::DynPosition;
pub use error::{Error, Result};
pub use position::{Bounded, ExactCursor, Position, SharedCursor, SliceCursor};
