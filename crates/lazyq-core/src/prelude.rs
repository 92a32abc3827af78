//! Convenient re-exports for downstream crates.

pub use crate::config::{Materialization, QueryConfig};
pub use crate::erased::DynPosition;
pub use crate::error::{Error, Result};
pub use crate::position::{Bounded, ExactCursor, Position, SharedCursor, SliceCursor};
