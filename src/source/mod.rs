//! Record source for loading the dataset.
//!
//! This module reads a delimited file with a header row and yields
//! one [`Record`] per data row, in file order.

use crate::models::{Record, REQUIRED_COLUMNS};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Options for reading the source file.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl From<&crate::config::InputConfig> for SourceOptions {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
        }
    }
}

/// CSV-backed record source.
pub struct CsvRecordSource<R> {
    reader: R,
    options: SourceOptions,
}

impl CsvRecordSource<File> {
    /// Open the file at `path`.
    pub fn open(path: &Path, options: SourceOptions) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file, options))
    }
}

impl<R: Read> CsvRecordSource<R> {
    /// Wrap any reader producing delimited text.
    pub fn from_reader(reader: R, options: SourceOptions) -> Self {
        Self { reader, options }
    }

    /// Read every row into memory.
    pub fn read_records(self) -> Result<Vec<Record>, SourceError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .from_reader(self.reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SourceError::MissingColumns(missing));
        }

        let header_count = headers.len();
        let headers: Arc<[String]> = headers.into();
        let mut records = Vec::new();

        for row in rdr.records() {
            let row = row?;
            let values: Vec<String> = row.iter().take(header_count).map(str::to_string).collect();
            records.push(Record::new(Arc::clone(&headers), values));
        }

        debug!("Read {} records ({} columns)", records.len(), header_count);
        Ok(records)
    }
}

/// Load all records from the file at `path`.
pub fn read_records(path: &Path, options: SourceOptions) -> Result<Vec<Record>, SourceError> {
    CsvRecordSource::open(path, options)?.read_records()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = include_str!("../../fixtures/penguins_sample.csv");

    fn read_str(input: &str, options: SourceOptions) -> Result<Vec<Record>, SourceError> {
        CsvRecordSource::from_reader(input.as_bytes(), options).read_records()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let records = read_str(SAMPLE, SourceOptions::default()).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].get("species"), Some("Adelie"));
        assert_eq!(records[0].get("bill_length_mm"), Some("39.1"));
        assert_eq!(records[3].get("body_mass_g"), Some("NA"));
        assert_eq!(records[9].get("sex"), Some("NA"));
    }

    #[test]
    fn test_short_row_leaves_fields_absent() {
        let input = "species,island,sex,bill_length_mm,body_mass_g\nAdelie,Dream\n";
        let records = read_str(input, SourceOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("island"), Some("Dream"));
        assert_eq!(records[0].get("sex"), None);
        assert_eq!(records[0].get("body_mass_g"), None);
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let input = "species,island,sex,bill_length_mm,body_mass_g\nAdelie,Dream,male,40,3000,extra\n";
        let records = read_str(input, SourceOptions::default()).unwrap();
        assert_eq!(records[0].fields().count(), 5);
    }

    #[test]
    fn test_missing_columns() {
        let input = "species,island\nAdelie,Dream\n";
        match read_str(input, SourceOptions::default()) {
            Err(SourceError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["sex", "bill_length_mm", "body_mass_g"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_delimiter() {
        let input = "species;island;sex;bill_length_mm;body_mass_g\nGentoo;Biscoe;female;46.1;4500\n";
        let records = read_str(input, SourceOptions { delimiter: b';' }).unwrap();
        assert_eq!(records[0].get("island"), Some("Biscoe"));
        assert_eq!(records[0].get("body_mass_g"), Some("4500"));
    }

    #[test]
    fn test_header_only_yields_no_records() {
        let input = "species,island,sex,bill_length_mm,body_mass_g\n";
        let records = read_str(input, SourceOptions::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let records = read_records(file.path(), SourceOptions::default()).unwrap();
        assert_eq!(records.len(), 10);
    }

    #[test]
    fn test_open_missing_file() {
        let err = read_records(Path::new("does/not/exist.csv"), SourceOptions::default())
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
