//! Serialization options shared by the CSV and Excel collaborators

use crate::error::{VaultError, VaultResult};

/// Float format applied when the caller does not pick one
pub const DEFAULT_FLOAT_FORMAT: &str = "%.3f";

/// Cells read as `true` when a column is all-boolean
pub const TRUE_VALUES: &[&str] = &["True", "true", "TRUE", "yes", "Yes", "YES", "Y", "y"];

/// Cells read as `false` when a column is all-boolean
pub const FALSE_VALUES: &[&str] = &["False", "false", "FALSE", "no", "No", "NO", "N", "n"];

/// Options for writing a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// printf-style `%.<N>f`; `None` means [`DEFAULT_FLOAT_FORMAT`]
    pub float_format: Option<String>,
    /// Write the index column (first). When false the index column is dropped.
    pub write_index: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            float_format: None,
            write_index: true,
        }
    }
}

impl WriteOptions {
    pub fn with_float_format(mut self, format: impl Into<String>) -> Self {
        self.float_format = Some(format.into());
        self
    }

    /// Parsed float format, defaulting when unset
    pub fn float_format(&self) -> VaultResult<FloatFormat> {
        FloatFormat::parse(self.float_format.as_deref().unwrap_or(DEFAULT_FLOAT_FORMAT))
    }
}

/// Fixed-precision float format (`%.3f` → 3 decimals)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatFormat {
    pub precision: usize,
}

impl FloatFormat {
    /// Accepts `%f` (6 decimals) and `%.<N>f`
    pub fn parse(pattern: &str) -> VaultResult<Self> {
        let invalid = || VaultError::Parse(format!("Unsupported float format '{}'", pattern));

        let body = pattern
            .strip_prefix('%')
            .and_then(|s| s.strip_suffix('f'))
            .ok_or_else(invalid)?;

        let precision = match body {
            "" => 6,
            _ => body
                .strip_prefix('.')
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(invalid)?,
        };
        Ok(Self { precision })
    }

    /// Format for a CSV cell. NaN becomes an empty cell.
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            String::new()
        } else {
            format!("{:.*}", self.precision, value)
        }
    }

    /// Equivalent Excel number format (`0.000` for three decimals)
    pub fn excel_num_format(&self) -> String {
        if self.precision == 0 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(self.precision))
        }
    }
}

/// Options for reading a table back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Zero-based column used as the index, if any
    pub index_column: Option<usize>,
    /// Recognize ISO `YYYY-MM-DD` text columns as dates
    pub infer_dates: bool,
    pub true_values: Vec<String>,
    pub false_values: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            index_column: Some(0),
            infer_dates: true,
            true_values: TRUE_VALUES.iter().map(|s| s.to_string()).collect(),
            false_values: FALSE_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReadOptions {
    pub fn without_index(mut self) -> Self {
        self.index_column = None;
        self
    }

    pub(crate) fn parse_bool(&self, cell: &str) -> Option<bool> {
        if self.true_values.iter().any(|v| v == cell) {
            Some(true)
        } else if self.false_values.iter().any(|v| v == cell) {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_format_parse() {
        assert_eq!(FloatFormat::parse("%.3f").unwrap().precision, 3);
        assert_eq!(FloatFormat::parse("%.0f").unwrap().precision, 0);
        assert_eq!(FloatFormat::parse("%f").unwrap().precision, 6);
        assert!(FloatFormat::parse("%.3g").is_err());
        assert!(FloatFormat::parse(".3f").is_err());
        assert!(FloatFormat::parse("%.xf").is_err());
    }

    #[test]
    fn test_float_format_output() {
        let format = FloatFormat::parse("%.2f").unwrap();
        assert_eq!(format.format(1.005_f64 + 0.001), "1.01");
        assert_eq!(format.format(f64::NAN), "");
        assert_eq!(format.excel_num_format(), "0.00");
        assert_eq!(FloatFormat { precision: 0 }.excel_num_format(), "0");
    }

    #[test]
    fn test_default_write_options_use_three_decimals() {
        let options = WriteOptions::default();
        assert_eq!(options.float_format().unwrap().precision, 3);
        let options = options.with_float_format("%.1f");
        assert_eq!(options.float_format().unwrap().precision, 1);
    }

    #[test]
    fn test_parse_bool_vocab() {
        let options = ReadOptions::default();
        assert_eq!(options.parse_bool("Yes"), Some(true));
        assert_eq!(options.parse_bool("FALSE"), Some(false));
        assert_eq!(options.parse_bool("1"), None);
    }
}
