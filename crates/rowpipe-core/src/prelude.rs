//! Convenient re-exports for downstream crates.

pub use crate::config::PipelineConfig;
pub use crate::error::{Error, Result};
pub use crate::joined::JoinedRecord;
pub use crate::record::{Datum, MapRecord, Record};
pub use crate::types::{DataType, Scalar};
