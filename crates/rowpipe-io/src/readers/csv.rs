//! CSV source producing one `Datum` per data row.
//!
//! Field names come from the explicit header list when one is given (the
//! first row is then data), otherwise from the first row. With
//! `csv_has_headers = false` and no explicit list, fields are named by
//! column index. A row shorter than the header yields only the fields it
//! has; cells past the header are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use rowpipe_core::{Datum, Error, PipelineConfig, Scalar};
use rowpipe_operators::Stream;

use crate::error::Result;

pub fn read_csv(
    path: impl AsRef<Path>,
    headers: Option<Vec<String>>,
    config: &PipelineConfig,
) -> Result<Stream<'static, Datum>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "opened csv source");
    csv_from_reader(file, headers, config)
}

pub fn csv_from_reader<'a, R: Read + 'a>(
    reader: R,
    headers: Option<Vec<String>>,
    config: &PipelineConfig,
) -> Result<Stream<'a, Datum>> {
    let reader = ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(false)
        .flexible(true)
        .trim(if config.csv_trim { Trim::All } else { Trim::None })
        .from_reader(reader);

    let mut records = reader.into_records().peekable();

    let names: Vec<String> = match headers {
        Some(names) => names,
        None if config.csv_has_headers => match records.next() {
            Some(first) => first?.iter().map(str::to_string).collect(),
            None => return Ok(Stream::empty()),
        },
        None => {
            let width = match records.peek() {
                Some(Ok(first)) => first.len(),
                _ => 0,
            };
            (0..width).map(|i| i.to_string()).collect()
        }
    };

    let infer = config.infer_types;
    Ok(Stream::from_results(records.map(move |row| {
        row.map(|row| to_datum(&names, &row, infer))
            .map_err(|e| Error::IoLike(format!("csv row: {e}")))
    })))
}

fn to_datum(names: &[String], row: &StringRecord, infer: bool) -> Datum {
    names
        .iter()
        .zip(row.iter())
        .map(|(name, cell)| {
            let value = if infer {
                Scalar::infer(cell)
            } else {
                Scalar::from(cell)
            };
            (name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowpipe_core::Record;

    fn parse(text: &str, headers: Option<Vec<String>>, config: &PipelineConfig) -> Vec<Datum> {
        csv_from_reader(text.as_bytes(), headers, config)
            .expect("open")
            .to_list()
            .expect("rows")
    }

    #[test]
    fn first_row_names_fields_and_types_are_inferred() {
        let rows = parse("name, age\nann, 31\nbo,\n", None, &PipelineConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&Scalar::from("ann")));
        assert_eq!(rows[0].get("age"), Some(&Scalar::I64(31)));
        assert_eq!(rows[1].get("age"), Some(&Scalar::Null));
    }

    #[test]
    fn explicit_headers_treat_first_row_as_data() {
        let headers = Some(vec!["a".to_string(), "b".to_string()]);
        let rows = parse("1,2\n3\n", headers, &PipelineConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("b"), Some(&Scalar::I64(2)));
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn raw_strings_and_custom_delimiter() {
        let config = PipelineConfig {
            csv_delimiter: ';',
            infer_types: false,
            ..PipelineConfig::default()
        };
        let rows = parse("x;y\n1;true\n", None, &config);
        assert_eq!(rows[0].get("x"), Some(&Scalar::from("1")));
        assert_eq!(rows[0].get("y"), Some(&Scalar::from("true")));
    }

    #[test]
    fn headerless_input_uses_column_positions() {
        let config = PipelineConfig {
            csv_has_headers: false,
            ..PipelineConfig::default()
        };
        let rows = parse("7,8\n9,10\n", None, &config);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("1"), Some(&Scalar::I64(10)));
    }

    #[test]
    fn empty_input_is_an_empty_stream() {
        assert!(parse("", None, &PipelineConfig::default()).is_empty());
    }
}
