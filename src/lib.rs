#![forbid(unsafe_code)]
//! rowpipe: lazy stream pipelines over record data.
//!
//! This crate re-exports the workspace members so callers can depend on one
//! package. The integration tests and benches of the workspace live here.

pub use rowpipe_core;
pub use rowpipe_io;
pub use rowpipe_operators;

pub mod prelude {
    pub use rowpipe_core::prelude::*;
    pub use rowpipe_operators::{AttributeRadix, IntoStream, JoinKind, Set, SortOrder, Stream};
}
