#![forbid(unsafe_code)]
//! rowpipe-io: sources that feed streams and sinks that drain them.
//!
//! Readers open their input eagerly (so a missing file fails at the call
//! site) and then yield rows lazily. Read failures after that point travel
//! through the stream as `rowpipe_core::Error::IoLike` items.

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{IoError, Result};
pub use readers::csv::{csv_from_reader, read_csv};
pub use readers::lines::{lines_from, read_lines, stdin_lines};
pub use writers::jsonl::{record_to_json, scalar_to_json, JsonlWriter};
pub use writers::lines::write_lines;
