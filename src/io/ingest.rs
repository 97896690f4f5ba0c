//! CSV ingest.
//!
//! Turns a rate sheet into `(location, rate)` rows. Parsing of the rate value
//! itself happens in the grouping stage; this module only guarantees that both
//! columns exist and every row has both values.
//!
//! Any problem here is fatal for the run: no rows are returned on error.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::IngestError;

pub const DEFAULT_LOCATION_COLUMN: &str = "ZIPCODE";
pub const DEFAULT_RATE_COLUMN: &str = "LINEHAUL";

/// Which CSV columns hold the location key and the rate value.
///
/// Matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub location: String,
    pub rate: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION_COLUMN.to_string(),
            rate: DEFAULT_RATE_COLUMN.to_string(),
        }
    }
}

/// One input row, still textual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRow {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub location: String,
    pub rate: String,
}

impl RateRow {
    pub fn new(line: usize, location: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            line,
            location: location.into(),
            rate: rate.into(),
        }
    }
}

/// Read every row of a rate sheet from disk.
pub fn read_rate_rows(path: &Path, columns: &ColumnNames) -> Result<Vec<RateRow>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_rate_rows_from(file, columns)
}

/// Read every row of a rate sheet from any reader.
pub fn read_rate_rows_from<R: Read>(input: R, columns: &ColumnNames) -> Result<Vec<RateRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers().map_err(IngestError::Headers)?.clone();
    let header_map = build_header_map(&headers);

    let location_idx = column_index(&header_map, &columns.location)?;
    let rate_idx = column_index(&header_map, &columns.rate)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line.
        let record = result.map_err(|source| IngestError::Record { line: idx + 2, source })?;
        // Physical line number; blank lines skipped by the reader still count.
        let line = record.position().map_or(idx + 2, |pos| pos.line() as usize);

        let location = required_value(&record, location_idx, &columns.location, line)?;
        let rate = required_value(&record, rate_idx, &columns.rate, line)?;
        rows.push(RateRow::new(line, location, rate));
    }

    Ok(rows)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, IngestError> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
}

fn required_value(record: &StringRecord, idx: usize, column: &str, line: usize) -> Result<String, IngestError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| IngestError::MissingValue {
            line,
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn read(csv: &str) -> Result<Vec<RateRow>, IngestError> {
        read_rate_rows_from(csv.as_bytes(), &ColumnNames::default())
    }

    #[test]
    fn reads_rows_with_line_numbers() {
        let rows = read("ZIPCODE,LINEHAUL\n23451,100.0\n23460, 85.5 \n").unwrap();
        assert_eq!(
            rows,
            vec![RateRow::new(2, "23451", "100.0"), RateRow::new(3, "23460", "85.5")]
        );
    }

    #[test]
    fn headers_match_case_insensitively_and_ignore_bom() {
        let rows = read("\u{feff}zipcode,City,linehaul\n23451,Norfolk,100\n").unwrap();
        assert_eq!(rows, vec![RateRow::new(2, "23451", "100")]);
    }

    #[test]
    fn custom_columns_are_honored() {
        let columns = ColumnNames {
            location: "zip".to_string(),
            rate: "price".to_string(),
        };
        let rows = read_rate_rows_from("price,zip\n12.5,10001\n".as_bytes(), &columns).unwrap();
        assert_eq!(rows, vec![RateRow::new(2, "10001", "12.5")]);
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = read("ZIPCODE,PRICE\n23451,100\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref c) if c == "LINEHAUL"));
    }

    #[test]
    fn missing_value_reports_line() {
        let err = read("ZIPCODE,LINEHAUL\n23451,100\n,90\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingValue { line: 3, .. }));
    }

    #[test]
    fn row_of_empty_cells_is_fatal() {
        let err = read("ZIPCODE,LINEHAUL\n23451,100\n,\n23452,90\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingValue { line: 3, ref column } if column == "ZIPCODE"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let rows = read("ZIPCODE,LINEHAUL\n23451,100\n\n23452,100\n").unwrap();
        assert_eq!(
            rows,
            vec![RateRow::new(2, "23451", "100"), RateRow::new(4, "23452", "100")]
        );
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        assert!(read("ZIPCODE,LINEHAUL\n").unwrap().is_empty());
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ZIPCODE,LINEHAUL").unwrap();
        writeln!(file, "23451,100.0").unwrap();
        file.flush().unwrap();

        let rows = read_rate_rows(file.path(), &ColumnNames::default()).unwrap();
        assert_eq!(rows, vec![RateRow::new(2, "23451", "100.0")]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rate_rows(&dir.path().join("nope.csv"), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, IngestError::Open { .. }));
    }
}
