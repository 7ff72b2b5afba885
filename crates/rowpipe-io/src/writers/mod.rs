//! Streaming writers.

pub mod jsonl;
pub mod lines;
