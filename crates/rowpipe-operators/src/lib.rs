#![forbid(unsafe_code)]
//! rowpipe-operators: lazy stream operators (map/filter/group/dedupe/join/window/sort).
//!
//! Design intent:
//! - A `Stream` is a chain of stages. Each stage owns its upstream, one
//!   predicate and one transform, and nothing is pulled until a terminal
//!   operation asks for it.
//! - A `Set` is the materialized form: indexable, sliceable, re-iterable.
//!   Operators that need the whole input (sort, reverse, joins, grouping)
//!   produce or require one.
//! - Single-threaded and synchronous; errors travel as `Result` items through
//!   every stage and stop terminal operations at the first failure.

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod map;
pub mod set;
pub mod stream;
pub mod traits;
pub mod window;

pub use filter::AttributeRadix;
pub use join::JoinKind;
pub use set::{Set, SortOrder};
pub use stream::Stream;
pub use traits::{always, identity, IntoStream};
pub use window::Windows;

pub use rowpipe_core::{Datum, Error, JoinedRecord, MapRecord, Record, Result, Scalar};
