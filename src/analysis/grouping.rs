//! Grouping engine.
//!
//! Partitions records into buckets keyed by categorical fields and
//! collects one numeric field per bucket. Buckets keep the order in
//! which their key was first seen.

use super::coerce::coerce_numeric;
use crate::models::{GroupKey, Record, BILL_LENGTH_MM, BODY_MASS_G, ISLAND, SPECIES};
use std::collections::HashMap;
use tracing::debug;

/// Insertion-ordered map from group key to collected values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedValues {
    entries: Vec<(GroupKey, Vec<f64>)>,
    index: HashMap<GroupKey, usize>,
}

impl GroupedValues {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the bucket for `key`, creating it on first use.
    pub fn push(&mut self, key: GroupKey, value: f64) {
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    /// Returns the bucket for `key`.
    #[allow(dead_code)] // Keyed lookup; the reports iterate in order instead
    pub fn get(&self, key: &GroupKey) -> Option<&[f64]> {
        self.index
            .get(key)
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    /// Iterates over buckets in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[f64])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group `value_field` of each record by the values of `key_fields`.
///
/// Records whose value is missing are skipped and never create a bucket.
pub fn group_by(records: &[Record], key_fields: &[&str], value_field: &str) -> GroupedValues {
    let mut grouped = GroupedValues::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(value) = coerce_numeric(record.get(value_field)) else {
            skipped += 1;
            continue;
        };
        grouped.push(GroupKey::from_record(record, key_fields), value);
    }

    debug!(
        "Grouped {} by {:?}: {} buckets, {} records skipped",
        value_field,
        key_fields,
        grouped.len(),
        skipped
    );

    grouped
}

/// Bill lengths grouped by (species, island).
pub fn group_by_species_and_island(records: &[Record]) -> GroupedValues {
    group_by(records, &[SPECIES, ISLAND], BILL_LENGTH_MM)
}

/// Body masses grouped by species.
pub fn group_by_species(records: &[Record]) -> GroupedValues {
    group_by(records, &[SPECIES], BODY_MASS_G)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn penguin(species: &str, island: &str, bill: &str, mass: &str) -> Record {
        Record::from_pairs([
            ("species", species),
            ("island", island),
            ("bill_length_mm", bill),
            ("body_mass_g", mass),
        ])
    }

    fn key(parts: &[&str]) -> GroupKey {
        GroupKey(parts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_group_by_species_and_island() {
        let records = vec![
            penguin("Adelie", "Torgersen", "39.1", "3750"),
            penguin("Gentoo", "Biscoe", "46.1", "4500"),
            penguin("Adelie", "Torgersen", "39.5", "3800"),
        ];

        let grouped = group_by_species_and_island(&records);

        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped.get(&key(&["Adelie", "Torgersen"])),
            Some(&[39.1, 39.5][..])
        );
        assert_eq!(grouped.get(&key(&["Gentoo", "Biscoe"])), Some(&[46.1][..]));
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![
            penguin("Gentoo", "Biscoe", "46.1", "4500"),
            penguin("Adelie", "Dream", "39.5", "3800"),
            penguin("Gentoo", "Biscoe", "50.0", "5700"),
            penguin("Chinstrap", "Dream", "46.5", "3500"),
        ];

        let grouped = group_by_species(&records);
        let keys: Vec<&str> = grouped.iter().map(|(k, _)| k.part(0)).collect();

        assert_eq!(keys, vec!["Gentoo", "Adelie", "Chinstrap"]);
    }

    #[test]
    fn test_missing_values_never_create_buckets() {
        let records = vec![
            penguin("Adelie", "Torgersen", "NA", "3750"),
            penguin("Gentoo", "Biscoe", "", "4500"),
            penguin("Chinstrap", "Dream", "oops", "3500"),
        ];

        let bills = group_by_species_and_island(&records);
        assert!(bills.is_empty());

        // Same rows still count for body mass.
        let masses = group_by_species(&records);
        assert_eq!(masses.len(), 3);
    }

    #[test]
    fn test_keys_are_not_normalized() {
        let records = vec![
            penguin("Adelie", "Dream", "39.0", "3000"),
            penguin("adelie", "Dream", "40.0", "3000"),
            penguin("Adelie", "", "41.0", "3000"),
        ];

        let grouped = group_by_species_and_island(&records);

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped.get(&key(&["Adelie", ""])), Some(&[41.0][..]));
    }

    #[test]
    fn test_absent_key_field_groups_as_empty() {
        let records = vec![Record::from_pairs([
            ("species", "Adelie"),
            ("bill_length_mm", "38.0"),
        ])];

        let grouped = group_by_species_and_island(&records);
        assert_eq!(grouped.get(&key(&["Adelie", ""])), Some(&[38.0][..]));
    }

    #[test]
    fn test_empty_input() {
        let grouped = group_by(&[], &[SPECIES], BODY_MASS_G);
        assert!(grouped.is_empty());
        assert_eq!(grouped.iter().count(), 0);
    }
}
