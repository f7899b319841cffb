// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Tabular datasets for ethics assessment
//!
//! A dataset is an ordered sequence of records sharing one schema of named
//! fields. Numeric fields carry model features and the optional ground-truth
//! label; categorical fields carry sensitive attributes used for group
//! partitioning. All types are value-like and immutable after construction.

use crate::error::EthicsError;
use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A single field value: numeric feature/label or categorical attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Number(f64),
    Category(String),
}

/// The shape of a field, used for schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Number(_) => FieldKind::Numeric,
            FieldValue::Category(_) => FieldKind::Categorical,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Category(v) => Some(v),
        }
    }
}

/// One record: named fields with fixed kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub(crate) fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Number(value));
        self
    }

    pub fn with_category(mut self, name: &str, value: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Category(value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Mapping from a categorical attribute value to the record indices in that
/// group. Groups are exhaustive and disjoint over the source dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPartition {
    pub attribute: String,
    pub groups: HashMap<String, Vec<usize>>,
}

impl GroupPartition {
    /// Number of distinct groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group names in sorted order, for deterministic iteration.
    pub fn sorted_group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// An ordered, schema-validated collection of records.
///
/// The record count and schema are fixed for the lifetime of the dataset;
/// assessment engines treat it as an immutable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub(crate) records: Vec<Record>,
    pub(crate) label_field: Option<String>,
}

impl Dataset {
    /// Build a dataset from records, validating that every record carries
    /// exactly the schema of the first one.
    pub fn new(records: Vec<Record>) -> Result<Self, EthicsError> {
        if records.is_empty() {
            return Err(EthicsError::EmptyDataset);
        }

        let schema: HashMap<&str, FieldKind> = records[0]
            .fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.kind()))
            .collect();

        for (idx, record) in records.iter().enumerate().skip(1) {
            if record.fields.len() != schema.len() {
                return Err(EthicsError::schema(
                    "*",
                    format!(
                        "record {} has {} fields, expected {}",
                        idx,
                        record.fields.len(),
                        schema.len()
                    ),
                ));
            }
            for (name, value) in &record.fields {
                match schema.get(name.as_str()) {
                    Some(kind) if *kind == value.kind() => {}
                    Some(_) => {
                        return Err(EthicsError::schema(
                            name.clone(),
                            format!("record {} changes the field kind", idx),
                        ));
                    }
                    None => {
                        return Err(EthicsError::schema(
                            name.clone(),
                            format!("record {} introduces a field absent from record 0", idx),
                        ));
                    }
                }
            }
        }

        Ok(Self {
            records,
            label_field: None,
        })
    }

    /// Designate a numeric field as the ground-truth label.
    pub fn with_label(mut self, field: &str) -> Result<Self, EthicsError> {
        match self.records[0].get(field) {
            Some(FieldValue::Number(_)) => {
                self.label_field = Some(field.to_string());
                Ok(self)
            }
            Some(FieldValue::Category(_)) => Err(EthicsError::schema(
                field,
                "label field must be numeric",
            )),
            None => Err(EthicsError::schema(field, "label field not present")),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn label_field(&self) -> Option<&str> {
        self.label_field.as_deref()
    }

    /// Numeric feature field names, excluding the designated label, sorted.
    pub fn numeric_features(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records[0]
            .fields
            .iter()
            .filter(|(name, value)| {
                value.kind() == FieldKind::Numeric && Some(name.as_str()) != self.label_field()
            })
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Numeric value of `field` in record `idx`, if present and numeric.
    pub fn number(&self, idx: usize, field: &str) -> Option<f64> {
        self.records.get(idx).and_then(|r| r.get(field)).and_then(FieldValue::as_number)
    }

    /// Ground-truth label vector. Positive outcomes are values > 0.5.
    pub fn labels(&self) -> Result<Vec<f64>, EthicsError> {
        let field = self.label_field.as_deref().ok_or(EthicsError::MissingLabel)?;
        self.records
            .iter()
            .map(|r| {
                r.get(field)
                    .and_then(FieldValue::as_number)
                    .ok_or_else(|| EthicsError::schema(field, "label value missing or non-numeric"))
            })
            .collect()
    }

    /// Split the dataset into groups by the distinct values of a categorical
    /// attribute. Grouping is exact string equality on the raw value.
    pub fn partition(&self, attribute: &str) -> Result<GroupPartition, EthicsError> {
        match self.records[0].get(attribute) {
            Some(FieldValue::Category(_)) => {}
            Some(FieldValue::Number(_)) => {
                return Err(EthicsError::schema(
                    attribute,
                    "partition attribute must be categorical",
                ));
            }
            None => {
                return Err(EthicsError::schema(attribute, "attribute not present"));
            }
        }

        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, record) in self.records.iter().enumerate() {
            let value = record
                .get(attribute)
                .and_then(FieldValue::as_category)
                .ok_or_else(|| EthicsError::schema(attribute, format!("record {} has no categorical value", idx)))?;
            groups.entry(value.to_string()).or_default().push(idx);
        }

        Ok(GroupPartition {
            attribute: attribute.to_string(),
            groups,
        })
    }

    /// Check that `other` shares this dataset's prediction-relevant schema
    /// (field names and kinds) and record count.
    pub fn check_compatible(&self, other: &Dataset) -> Result<(), EthicsError> {
        if self.len() != other.len() {
            return Err(EthicsError::schema(
                "*",
                format!("record counts differ: {} vs {}", self.len(), other.len()),
            ));
        }
        for (name, value) in &self.records[0].fields {
            match other.records[0].get(name) {
                Some(v) if v.kind() == value.kind() => {}
                Some(_) => {
                    return Err(EthicsError::schema(name.clone(), "field kind differs"));
                }
                None => {
                    return Err(EthicsError::schema(name.clone(), "field absent"));
                }
            }
        }
        if other.records[0].fields.len() != self.records[0].fields.len() {
            return Err(EthicsError::schema("*", "field sets differ"));
        }
        Ok(())
    }

    /// Generate a seeded synthetic credit-decision dataset for development
    /// and testing: two numeric features, two sensitive attributes, and a
    /// binary `approved` label correlated with the score feature.
    pub fn synthetic(size: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let regions = ["north", "south", "east", "west"];
        let age_bands = ["18-34", "35-54", "55+"];

        let records: Vec<Record> = (0..size)
            .map(|_| {
                let region = regions[rng.gen_range(0..regions.len())];
                let age_band = age_bands[rng.gen_range(0..age_bands.len())];
                let income: f64 = 20_000.0 + rng.gen::<f64>() * 80_000.0;
                let score: f64 = rng.gen::<f64>();
                let approved = if score > 0.45 { 1.0 } else { 0.0 };
                Record::new()
                    .with_number("income", (income * 100.0).round() / 100.0)
                    .with_number("score", score)
                    .with_number("approved", approved)
                    .with_category("region", region)
                    .with_category("age_band", age_band)
            })
            .collect();

        // Uniform construction, so the schema invariant holds by build.
        Self {
            records,
            label_field: Some("approved".to_string()),
        }
    }

    /// Load a dataset from a CSV file with a header row. Cells that parse as
    /// floats become numeric fields; everything else is categorical.
    pub fn from_csv(path: &Path, label_field: Option<&str>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;
        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read header row in {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row.with_context(|| format!("Failed to read row {} in {}", idx, path.display()))?;
            let mut record = Record::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                record = match cell.trim().parse::<f64>() {
                    Ok(v) => record.with_number(header, v),
                    Err(_) => record.with_category(header, cell.trim()),
                };
            }
            records.push(record);
        }

        let mut dataset = Dataset::new(records)
            .with_context(|| format!("Inconsistent schema in {}", path.display()))?;
        if let Some(field) = label_field {
            dataset = dataset
                .with_label(field)
                .with_context(|| format!("Bad label field '{}' in {}", field, path.display()))?;
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_records() -> Vec<Record> {
        vec![
            Record::new().with_number("score", 0.9).with_category("region", "A"),
            Record::new().with_number("score", 0.8).with_category("region", "A"),
            Record::new().with_number("score", 0.2).with_category("region", "B"),
            Record::new().with_number("score", 0.1).with_category("region", "B"),
        ]
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = Dataset::new(vec![]).unwrap_err();
        assert!(matches!(err, EthicsError::EmptyDataset));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let records = vec![
            Record::new().with_number("score", 0.9),
            Record::new().with_category("score", "high"),
        ];
        let err = Dataset::new(records).unwrap_err();
        assert!(matches!(err, EthicsError::Schema { .. }));
    }

    #[test]
    fn test_extra_field_rejected() {
        let records = vec![
            Record::new().with_number("score", 0.9),
            Record::new().with_number("score", 0.8).with_category("region", "A"),
        ];
        assert!(Dataset::new(records).is_err());
    }

    #[test]
    fn test_partition_exhaustive_and_disjoint() {
        let dataset = Dataset::new(four_records()).unwrap();
        let partition = dataset.partition("region").unwrap();

        assert_eq!(partition.group_count(), 2);
        assert_eq!(partition.groups["A"], vec![0, 1]);
        assert_eq!(partition.groups["B"], vec![2, 3]);

        let mut all: Vec<usize> = partition.groups.values().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_partition_single_group() {
        let records = vec![
            Record::new().with_category("region", "A"),
            Record::new().with_category("region", "A"),
        ];
        let dataset = Dataset::new(records).unwrap();
        let partition = dataset.partition("region").unwrap();
        assert_eq!(partition.group_count(), 1);
    }

    #[test]
    fn test_partition_missing_attribute() {
        let dataset = Dataset::new(four_records()).unwrap();
        assert!(dataset.partition("gender").is_err());
    }

    #[test]
    fn test_partition_numeric_attribute_rejected() {
        let dataset = Dataset::new(four_records()).unwrap();
        assert!(dataset.partition("score").is_err());
    }

    #[test]
    fn test_labels_require_designation() {
        let dataset = Dataset::new(four_records()).unwrap();
        assert!(matches!(dataset.labels().unwrap_err(), EthicsError::MissingLabel));

        let labeled = Dataset::new(four_records()).unwrap().with_label("score").unwrap();
        assert_eq!(labeled.labels().unwrap().len(), 4);
    }

    #[test]
    fn test_label_must_be_numeric() {
        let dataset = Dataset::new(four_records()).unwrap();
        assert!(dataset.with_label("region").is_err());
    }

    #[test]
    fn test_numeric_features_exclude_label() {
        let dataset = Dataset::new(four_records()).unwrap().with_label("score").unwrap();
        assert!(dataset.numeric_features().is_empty());
    }

    #[test]
    fn test_synthetic_reproducible() {
        let a = Dataset::synthetic(50, 42);
        let b = Dataset::synthetic(50, 42);
        assert_eq!(a.len(), 50);
        assert_eq!(a.number(7, "score"), b.number(7, "score"));
        assert_eq!(a.label_field(), Some("approved"));
    }

    #[test]
    fn test_check_compatible() {
        let a = Dataset::new(four_records()).unwrap();
        let b = Dataset::new(four_records()).unwrap();
        assert!(a.check_compatible(&b).is_ok());

        let shorter = Dataset::new(four_records()[..2].to_vec()).unwrap();
        assert!(a.check_compatible(&shorter).is_err());
    }
}
