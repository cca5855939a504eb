//! Loader for the historical benchmark annual-return file.
//!
//! The file is delimited text with two columns, a date and a return:
//!
//! ```text
//! Date,Annual Return
//! 2023,24.23%
//! 12/30/2022,-19.44%
//! 2021-12-31,26.89
//! Source: S&P Dow Jones Indices
//! ```
//!
//! Leading header rows and trailing footer rows are dropped by count. Each
//! remaining row that cannot be parsed is skipped and reported.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use dartboard_core::{BenchmarkReturns, Year};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Layout of a benchmark file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkFileConfig {
    /// Rows to skip at the top.
    pub header_rows: usize,
    /// Rows to ignore at the bottom.
    pub footer_rows: usize,
    /// Field delimiter.
    pub delimiter: u8,
    /// Multiplier applied to every value, e.g. `100.0` for fractional returns.
    pub value_scale: f64,
}

impl Default for BenchmarkFileConfig {
    fn default() -> Self {
        Self {
            header_rows: 1,
            footer_rows: 1,
            delimiter: b',',
            value_scale: 1.0,
        }
    }
}

/// A benchmark row that could not be used.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// The row has fewer than two fields.
    #[error("line {line}: expected a date and a value")]
    MissingColumn {
        /// 1-based line number
        line: u64,
    },

    /// The row is not valid UTF-8.
    #[error("line {line}: invalid UTF-8")]
    InvalidEncoding {
        /// 1-based line number
        line: u64,
    },

    /// The first field is not a year or a recognised date.
    #[error("line {line}: unrecognised date {value:?}")]
    InvalidDate {
        /// 1-based line number
        line: u64,
        /// Raw field
        value: String,
    },

    /// The second field is not a finite number.
    #[error("line {line}: unrecognised return {value:?}")]
    InvalidValue {
        /// 1-based line number
        line: u64,
        /// Raw field
        value: String,
    },
}

/// Parsed returns plus the rows that were skipped.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkLoad {
    /// Year to percent return.
    pub returns: BenchmarkReturns,
    /// One entry per skipped data row.
    pub skipped: Vec<ParseError>,
}

/// Load a benchmark file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid delimited
/// text. Malformed rows are not errors; see [`BenchmarkLoad::skipped`].
pub fn load_benchmark(path: impl AsRef<Path>, config: &BenchmarkFileConfig) -> Result<BenchmarkLoad> {
    let file = File::open(path.as_ref())?;
    load_benchmark_from_reader(file, config)
}

/// Load a benchmark file, falling back to no benchmark on structural failure.
///
/// The returned error, if any, describes why the fallback was taken.
pub fn load_benchmark_or_empty(
    path: impl AsRef<Path>,
    config: &BenchmarkFileConfig,
) -> (BenchmarkLoad, Option<DataError>) {
    let path = path.as_ref();
    match load_benchmark(path, config) {
        Ok(load) => (load, None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "benchmark unavailable, continuing without it");
            (BenchmarkLoad::default(), Some(e))
        }
    }
}

/// Load benchmark rows from any reader.
///
/// # Errors
///
/// Returns an error on a read failure. Rows that are not valid UTF-8 are
/// skipped like any other malformed row.
pub fn load_benchmark_from_reader<R: Read>(
    reader: R,
    config: &BenchmarkFileConfig,
) -> Result<BenchmarkLoad> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(config.delimiter)
        .from_reader(reader);

    // Rows are decoded one at a time so bad bytes only cost their own row
    let records = csv_reader
        .byte_records()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let body_end = records.len().saturating_sub(config.footer_rows);
    let body = records.get(config.header_rows..body_end).unwrap_or_default();

    let mut load = BenchmarkLoad::default();
    for (index, record) in body.iter().enumerate() {
        let line = record
            .position()
            .map_or((config.header_rows + index + 1) as u64, csv::Position::line);
        let parsed = csv::StringRecord::from_byte_record(record.clone())
            .map_err(|_| ParseError::InvalidEncoding { line })
            .and_then(|record| parse_row(&record, line, config.value_scale));
        match parsed {
            Ok((year, value)) => {
                if let Some(previous) = load.returns.insert(year, value) {
                    debug!(year, previous, value, "duplicate benchmark year, keeping later row");
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping benchmark row");
                load.skipped.push(e);
            }
        }
    }

    Ok(load)
}

fn parse_row(
    record: &csv::StringRecord,
    line: u64,
    scale: f64,
) -> std::result::Result<(Year, f64), ParseError> {
    let (Some(date), Some(value)) = (record.get(0), record.get(1)) else {
        return Err(ParseError::MissingColumn { line });
    };

    let year = parse_year(date).ok_or_else(|| ParseError::InvalidDate {
        line,
        value: date.to_string(),
    })?;
    let percent = parse_percent(value)
        .map(|v| v * scale)
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidValue {
            line,
            value: value.to_string(),
        })?;

    Ok((year, percent))
}

/// Year from a bare year, an ISO date or a US `month/day/year` date.
pub fn parse_year(field: &str) -> Option<Year> {
    let field = field.trim();
    if field.len() == 4 && field.bytes().all(|b| b.is_ascii_digit()) {
        return field.parse().ok();
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(field, format).ok())
        .map(|date| date.year())
}

/// Number with an optional trailing `%`.
pub fn parse_percent(field: &str) -> Option<f64> {
    let field = field.trim();
    let number = field.strip_suffix('%').unwrap_or(field).trim();
    number.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::io::Write;

    const FILE: &str = "\
Date,Annual Return
2023,24.23%
12/30/2022,-19.44%
2021-12-31,26.89
not a date,5.0
2020,n/a
2019
Source: S&P Dow Jones Indices
";

    #[rstest]
    #[case("2023", Some(2023))]
    #[case("2023-12-29", Some(2023))]
    #[case("12/29/2023", Some(2023))]
    #[case(" 1999 ", Some(1999))]
    #[case("Dec 2023", None)]
    #[case("", None)]
    fn test_parse_year(#[case] input: &str, #[case] expected: Option<Year>) {
        assert_eq!(parse_year(input), expected);
    }

    #[rstest]
    #[case("24.23%", Some(24.23))]
    #[case("-19.44 %", Some(-19.44))]
    #[case("7", Some(7.0))]
    #[case("n/a", None)]
    fn test_parse_percent(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_percent(input), expected);
    }

    #[test]
    fn test_skips_header_footer_and_bad_rows() {
        let load = load_benchmark_from_reader(FILE.as_bytes(), &BenchmarkFileConfig::default())
            .unwrap();

        assert_eq!(load.returns.len(), 3);
        assert_relative_eq!(load.returns.get(2023).unwrap(), 24.23);
        assert_relative_eq!(load.returns.get(2022).unwrap(), -19.44);
        assert_relative_eq!(load.returns.get(2021).unwrap(), 26.89);
        assert_eq!(load.skipped.len(), 3);
        assert!(matches!(load.skipped[0], ParseError::InvalidDate { line: 5, .. }));
        assert!(matches!(load.skipped[1], ParseError::InvalidValue { line: 6, .. }));
        assert!(matches!(load.skipped[2], ParseError::MissingColumn { line: 7 }));
    }

    #[test]
    fn test_value_scale_and_delimiter() {
        let config = BenchmarkFileConfig {
            header_rows: 0,
            footer_rows: 0,
            delimiter: b';',
            value_scale: 100.0,
        };
        let load = load_benchmark_from_reader("2023;0.25\n2022;-0.1\n".as_bytes(), &config)
            .unwrap();
        assert_relative_eq!(load.returns.get(2023).unwrap(), 25.0);
        assert_relative_eq!(load.returns.get(2022).unwrap(), -10.0);
    }

    #[test]
    fn test_short_file_yields_nothing() {
        let load = load_benchmark_from_reader("Date,Return\n".as_bytes(), &BenchmarkFileConfig::default())
            .unwrap();
        assert!(load.returns.is_empty());
        assert!(load.skipped.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FILE.as_bytes()).unwrap();

        let load = load_benchmark(file.path(), &BenchmarkFileConfig::default()).unwrap();
        assert_eq!(load.returns.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        assert!(matches!(
            load_benchmark(&path, &BenchmarkFileConfig::default()),
            Err(DataError::Io(_))
        ));

        let (load, error) = load_benchmark_or_empty(&path, &BenchmarkFileConfig::default());
        assert!(load.returns.is_empty());
        assert!(error.is_some());
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut bytes = b"Date,Return\n2023,24.2\n2022,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\n2021,26.9\nfooter\n");

        let load = load_benchmark_from_reader(bytes.as_slice(), &BenchmarkFileConfig::default())
            .unwrap();

        assert_eq!(load.returns.len(), 2);
        assert_relative_eq!(load.returns.get(2023).unwrap(), 24.2);
        assert_relative_eq!(load.returns.get(2021).unwrap(), 26.9);
        assert_eq!(load.skipped, vec![ParseError::InvalidEncoding { line: 3 }]);
    }

    #[test]
    fn test_duplicate_year_keeps_later_row() {
        let config = BenchmarkFileConfig {
            header_rows: 0,
            footer_rows: 0,
            ..Default::default()
        };
        let load = load_benchmark_from_reader("2023,1.0\n2023-12-29,2.0\n".as_bytes(), &config)
            .unwrap();
        assert_eq!(load.returns.len(), 1);
        assert_relative_eq!(load.returns.get(2023).unwrap(), 2.0);
    }
}
