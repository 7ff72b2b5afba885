//! Streaming NDJSON writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use rowpipe_core::{Record, Scalar};
use rowpipe_operators::Stream;

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl JsonlWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::create(path.as_ref())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), "opened jsonl sink");
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Write one record as a JSON object, fields in the record's own order.
    pub fn write_record<R: Record>(&mut self, row: &R) -> Result<()> {
        self.write_value(&record_to_json(row))
    }

    /// Write any JSON value on its own line.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        let line = serde_json::to_string(value)?;
        writeln!(self.writer, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    /// Drain a record stream into the sink; returns the number of lines written.
    pub fn write_stream<R: Record>(&mut self, rows: Stream<'_, R>) -> Result<usize> {
        let start = self.written;
        for row in rows {
            self.write_record(&row?)?;
        }
        self.writer.flush()?;
        Ok(self.written - start)
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn record_to_json<R: Record>(row: &R) -> Value {
    let obj: Map<String, Value> = row
        .attrs()
        .into_iter()
        .map(|(name, value)| (name.to_string(), scalar_to_json(value)))
        .collect();
    Value::Object(obj)
}

pub fn scalar_to_json(v: &Scalar) -> Value {
    match v {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::I64(i) => Value::from(*i),
        // Non-finite floats have no JSON form and become null.
        Scalar::F64(f) => Value::from(*f),
        Scalar::Str(s) => Value::String(s.clone()),
        Scalar::List(items) => Value::Array(items.iter().map(scalar_to_json).collect()),
    }
}
