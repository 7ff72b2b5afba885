#![forbid(unsafe_code)]
//! rowpipe-core: the value model and record types shared by every rowpipe crate.
//!
//! Design intent:
//! - Pure data and small helpers; no IO and no iterator machinery here.
//! - `Record` is the one capability every operator relies on. Attribute-style
//!   (`Datum`) and mapping-style (`MapRecord`) records implement it, and so does
//!   the `JoinedRecord` produced by joins, which lets joins nest.

pub mod config;
pub mod error;
pub mod hash;
pub mod joined;
pub mod prelude;
pub mod record;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use joined::JoinedRecord;
pub use record::{Datum, MapRecord, Record};
pub use types::{DataType, Scalar};
