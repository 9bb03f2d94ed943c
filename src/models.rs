//! Data models for the penguin statistics tool.
//!
//! This module contains the core data structures used throughout
//! the application for representing input rows, group keys, and
//! the result records produced by the analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Column holding the species name.
pub const SPECIES: &str = "species";
/// Column holding the island name.
pub const ISLAND: &str = "island";
/// Column holding the recorded sex.
pub const SEX: &str = "sex";
/// Column holding the bill length in millimetres.
pub const BILL_LENGTH_MM: &str = "bill_length_mm";
/// Column holding the body mass in grams.
pub const BODY_MASS_G: &str = "body_mass_g";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [SPECIES, ISLAND, SEX, BILL_LENGTH_MM, BODY_MASS_G];

/// Sex values queried by the body mass report, in output order.
pub const SEXES: [&str; 2] = ["male", "female"];

/// A single input row: field name to raw string value.
///
/// Rows from the same file share one header list. A row shorter than
/// the header simply lacks the trailing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Creates a record from a shared header list and its row values.
    pub fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self { headers, values }
    }

    /// Creates a standalone record from `(field, value)` pairs.
    #[allow(dead_code)] // Used to build in-memory datasets
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (headers, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(headers.into(), values)
    }

    /// Returns the raw value of `field`, or `None` if the field is absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == field)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Iterates over the present `(field, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(&self.values)
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, value)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': '{}'", field, value)?;
        }
        write!(f, "}}")
    }
}

/// Tuple of categorical values that partitions records into buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    /// Builds the key for `record` from `key_fields`. Absent fields become `""`.
    pub fn from_record(record: &Record, key_fields: &[&str]) -> Self {
        Self(
            key_fields
                .iter()
                .map(|field| record.get(field).unwrap_or_default().to_string())
                .collect(),
        )
    }

    /// Returns the key component at `idx`, or `""` when out of range.
    pub fn part(&self, idx: usize) -> &str {
        self.0.get(idx).map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Average bill length for one (species, island) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLengthRow {
    #[serde(rename = "Species")]
    pub species: String,
    #[serde(rename = "Island")]
    pub island: String,
    /// Mean bill length, rounded to two decimals.
    #[serde(rename = "Average_bill_length_mm")]
    pub average_bill_length_mm: f64,
}

/// Share of one (species, sex) group heavier than the species average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMassRow {
    #[serde(rename = "Species")]
    pub species: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    /// Percentage in `[0, 100]`, rounded to two decimals.
    #[serde(rename = "%_above_avg_bodymass")]
    pub pct_above_avg_body_mass: f64,
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the records were read from.
    pub source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of records loaded from the source.
    pub records_loaded: usize,
    /// Number of species with a valid average body mass.
    pub species_count: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    /// Average bill length per (species, island).
    pub bill_lengths: Vec<BillLengthRow>,
    /// Percentage above species average body mass per (species, sex).
    pub body_mass: Vec<BodyMassRow>,
}
