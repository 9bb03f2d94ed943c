//! Aggregation of grouped measurements.
//!
//! This module reduces grouped values to summary statistics and
//! assembles the result rows for both reports.

use super::coerce::coerce_numeric;
use super::grouping::{group_by_species, group_by_species_and_island};
use crate::models::{BillLengthRow, BodyMassRow, Record, BODY_MASS_G, SEX, SEXES, SPECIES};
use std::collections::HashMap;
use tracing::debug;

/// Arithmetic mean of `values`, or 0 when empty.
pub fn compute_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentage of `values` strictly greater than `threshold`, rounded to
/// two decimals. Returns 0.0 when empty.
pub fn compute_percentage_above_avg(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let above = values.iter().filter(|&&v| v > threshold).count();
    round2(above as f64 / values.len() as f64 * 100.0)
}

/// Round to two decimal places.
///
/// Rounds the exact binary value, so `2.675` (stored just below the
/// tie) becomes `2.67`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Mean body mass per species, rounded to two decimals.
///
/// Species appear in the order they were first seen with a valid mass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesAverageTable {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl SpeciesAverageTable {
    fn insert(&mut self, species: String, average: f64) {
        self.index.insert(species.clone(), self.entries.len());
        self.entries.push((species, average));
    }

    /// Average for `species`, if it had any valid mass.
    #[allow(dead_code)] // Keyed lookup; the report iterates in order instead
    pub fn get(&self, species: &str) -> Option<f64> {
        self.index.get(species).map(|&idx| self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, avg)| (s.as_str(), *avg))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the species average table from every record, ignoring sex.
pub fn compute_species_avg_body_mass(records: &[Record]) -> SpeciesAverageTable {
    let mut table = SpeciesAverageTable::default();

    for (key, masses) in group_by_species(records).iter() {
        table.insert(key.part(0).to_string(), round2(compute_average(masses)));
    }

    table
}

/// Valid body masses of records matching `species` and `sex` exactly.
pub fn filter_by_species_and_sex(records: &[Record], species: &str, sex: &str) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.get(SPECIES) == Some(species) && r.get(SEX) == Some(sex))
        .filter_map(|r| coerce_numeric(r.get(BODY_MASS_G)))
        .collect()
}

/// Average bill length for each (species, island) pair.
pub fn calculate_average_bill_length(records: &[Record]) -> Vec<BillLengthRow> {
    group_by_species_and_island(records)
        .iter()
        .map(|(key, lengths)| BillLengthRow {
            species: key.part(0).to_string(),
            island: key.part(1).to_string(),
            average_bill_length_mm: round2(compute_average(lengths)),
        })
        .collect()
}

/// Percentage of each (species, sex) group above the species average body mass.
///
/// The comparison uses the rounded species average. Only `male` and
/// `female` are reported, in that order.
pub fn calculate_body_mass_percentage(records: &[Record]) -> Vec<BodyMassRow> {
    let species_avg = compute_species_avg_body_mass(records);
    let mut results = Vec::with_capacity(species_avg.len() * SEXES.len());

    for (species, avg_mass) in species_avg.iter() {
        for sex in SEXES {
            let values = filter_by_species_and_sex(records, species, sex);
            let pct = compute_percentage_above_avg(&values, avg_mass);
            debug!(
                "{} {}: {} of {} valid masses compared to {:.2}",
                species,
                sex,
                values.iter().filter(|&&v| v > avg_mass).count(),
                values.len(),
                avg_mass
            );

            results.push(BodyMassRow {
                species: species.to_string(),
                sex: sex.to_string(),
                pct_above_avg_body_mass: pct,
            });
        }
    }

    results
}

/// Run both reports over the same records.
pub fn analyze(records: &[Record]) -> (Vec<BillLengthRow>, Vec<BodyMassRow>) {
    (
        calculate_average_bill_length(records),
        calculate_body_mass_percentage(records),
    )
}
