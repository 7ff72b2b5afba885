//! Line sources: one `String` per line, newline stripped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rowpipe_core::Error;
use rowpipe_operators::Stream;

use crate::error::Result;

/// Stream the lines of a file. The file is opened immediately.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Stream<'static, String>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "opened line source");
    Ok(lines_from(BufReader::new(file)))
}

pub fn lines_from<'a, R: BufRead + 'a>(reader: R) -> Stream<'a, String> {
    Stream::from_results(
        reader
            .lines()
            .map(|line| line.map_err(|e| Error::IoLike(format!("read line: {e}")))),
    )
}

pub fn stdin_lines() -> Stream<'static, String> {
    lines_from(std::io::stdin().lock())
}
