#![forbid(unsafe_code)]
//! lazyq-operators: lazy, chainable query operators over position pairs.
//!
//! Design intent:
//! - Every adapter stores its predecessor plus the callables it captured and
//!   does no work until one of its positions is dereferenced or advanced.
//! - `take`, `skip`, `take_while`, `skip_while`, `flatten` and `remove_all`
//!   are the exceptions: they walk their input at the call site.
//! - Stateful adapters (order-by, group, join) keep their materialized state in
//!   their positions, built on first use (or at construction, see
//!   [`lazyq_core::QueryConfig`]).

pub mod metrics;
pub mod traits;

pub mod concat;
pub mod distinct;
pub mod eager;
pub mod filter;
pub mod group;
pub mod identity;
pub mod insert;
pub mod map;
pub mod remove;
pub mod reverse;
pub mod zip;

pub mod join;
pub mod sort;

pub use concat::Concat;
pub use distinct::Distinct;
pub use filter::{Filter, FilterMap};
pub use group::Group;
pub use identity::{Boxed, Id};
pub use insert::{Append, Prepend};
pub use join::HashJoin;
pub use map::Map;
pub use remove::RemoveFirst;
pub use reverse::Reverse;
pub use sort::OrderBy;
pub use traits::{ItemOf, Iter, Sequence};
pub use zip::Zip;
