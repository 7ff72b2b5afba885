//! Pipeline configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Field delimiter for CSV sources.
    pub csv_delimiter: char,

    /// When true, the first CSV row names the fields unless headers are given explicitly.
    pub csv_has_headers: bool,

    /// Trim surrounding whitespace from CSV headers and cells.
    pub csv_trim: bool,

    /// Parse CSV cells into bool/int/float scalars instead of keeping strings.
    pub infer_types: bool,

    /// Number of leading and trailing elements shown when a `Set` is displayed.
    pub preview_rows: usize,

    /// Default seed for deterministic sampling.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            csv_delimiter: ',',
            csv_has_headers: true,
            csv_trim: true,
            infer_types: true,
            preview_rows: 5,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `ROWPIPE_CSV_DELIMITER`: single-character delimiter
    /// - `ROWPIPE_CSV_HAS_HEADERS`: `true`/`false`
    /// - `ROWPIPE_CSV_TRIM`: `true`/`false`
    /// - `ROWPIPE_INFER_TYPES`: `true`/`false`
    /// - `ROWPIPE_PREVIEW_ROWS`: preview size for displayed sets
    /// - `ROWPIPE_SEED`: sampling seed
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("ROWPIPE_CSV_DELIMITER") {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                cfg.csv_delimiter = c;
            }
        }

        if let Ok(s) = std::env::var("ROWPIPE_CSV_HAS_HEADERS") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.csv_has_headers = v;
            }
        }

        if let Ok(s) = std::env::var("ROWPIPE_CSV_TRIM") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.csv_trim = v;
            }
        }

        if let Ok(s) = std::env::var("ROWPIPE_INFER_TYPES") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.infer_types = v;
            }
        }

        if let Ok(s) = std::env::var("ROWPIPE_PREVIEW_ROWS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.preview_rows = v;
            }
        }

        if let Ok(s) = std::env::var("ROWPIPE_SEED") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.seed = Some(v);
            }
        }

        cfg
    }

    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.csv_delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "csv delimiter must be ASCII, got '{}'",
                self.csv_delimiter
            )));
        }
        if self.preview_rows == 0 {
            return Err(Error::Config("preview_rows must be at least 1".into()));
        }
        Ok(())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        self.validate()?;
        Ok(self.csv_delimiter as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_keys_with_defaults() {
        let cfg = PipelineConfig::from_json(r#"{"csv_delimiter": ";", "seed": 7}"#).unwrap();
        assert_eq!(cfg.csv_delimiter, ';');
        assert_eq!(cfg.seed, Some(7));
        assert!(cfg.csv_has_headers);
        assert_eq!(cfg.preview_rows, 5);
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let cfg = PipelineConfig {
            csv_delimiter: '§',
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        assert!(cfg.delimiter_byte().is_err());
    }

    #[test]
    fn rejects_zero_preview() {
        let err = PipelineConfig::from_json(r#"{"preview_rows": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
