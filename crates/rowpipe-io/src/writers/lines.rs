use std::fmt::Display;
use std::io::{BufWriter, Write};

use rowpipe_operators::Stream;

use crate::error::Result;

/// Write each element's `Display` form on its own line. Returns the line count.
pub fn write_lines<W: Write, T: Display>(writer: W, rows: Stream<'_, T>) -> Result<usize> {
    let mut out = BufWriter::new(writer);
    let mut count = 0;
    for row in rows {
        writeln!(out, "{}", row?)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
