// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Error taxonomy for the assessment engines
//!
//! All violations are detected eagerly at the start of the offending
//! operation. The documented edge cases (single-group parity, zero-max-rate
//! disparate impact, zero-scale perturbation) are defined scores, not errors.

use thiserror::Error;

/// Errors surfaced by dataset handling and the assessment engines.
#[derive(Debug, Error)]
pub enum EthicsError {
    /// A dataset with zero records was supplied.
    #[error("dataset contains no records")]
    EmptyDataset,

    /// A required field is absent or has the wrong shape.
    #[error("schema violation on field '{field}': {reason}")]
    Schema { field: String, reason: String },

    /// An operation needs ground-truth labels but the dataset has none.
    #[error("ground-truth label field required but not designated")]
    MissingLabel,

    /// The dataset has no numeric feature fields to perturb.
    #[error("dataset has no numeric feature fields to perturb")]
    UnsupportedSchema,

    /// The configured noise scale is negative or not finite.
    #[error("noise scale {0} is invalid; expected a finite value >= 0")]
    InvalidNoiseScale(f64),

    /// A prediction vector is not index-aligned with its source dataset.
    #[error("prediction vector has {got} entries, dataset has {expected}")]
    PredictionLength { expected: usize, got: usize },
}

impl EthicsError {
    /// Convenience constructor for schema violations.
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
