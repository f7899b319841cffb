// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Prediction adapter interface and reference predictors
//!
//! The assessment engines treat the model under test as an opaque prediction
//! function: they only ever call [`Predictor::predict`]. The reference
//! predictors here exist for demos and tests; a real deployment implements
//! the trait over its own inference stack.

use crate::dataset::{Dataset, FieldValue};
use crate::error::EthicsError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Per-record outcomes (0/1 labels or probabilities), index-aligned with the
/// dataset they were derived from.
pub type PredictionVector = Vec<f64>;

/// The prediction adapter consumed by the fairness and robustness engines.
///
/// Implementations must not mutate their input and must be safe to call
/// repeatedly with different datasets within one assessment.
pub trait Predictor {
    fn predict(&self, dataset: &Dataset) -> Result<PredictionVector, EthicsError>;

    fn name(&self) -> &str;
}

/// Verify the index-alignment invariant between a dataset and a prediction
/// vector produced for it.
pub(crate) fn check_aligned(dataset: &Dataset, predictions: &[f64]) -> Result<(), EthicsError> {
    if predictions.len() != dataset.len() {
        return Err(EthicsError::PredictionLength {
            expected: dataset.len(),
            got: predictions.len(),
        });
    }
    Ok(())
}

/// Predicts the same outcome for every record.
#[derive(Debug, Clone)]
pub struct ConstantPredictor {
    pub label: f64,
}

impl ConstantPredictor {
    pub fn new(label: f64) -> Self {
        Self { label }
    }
}

impl Predictor for ConstantPredictor {
    fn predict(&self, dataset: &Dataset) -> Result<PredictionVector, EthicsError> {
        Ok(vec![self.label; dataset.len()])
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

/// Predicts 1.0 when a single numeric feature clears a threshold.
#[derive(Debug, Clone)]
pub struct ThresholdPredictor {
    pub field: String,
    pub threshold: f64,
}

impl ThresholdPredictor {
    pub fn new(field: &str, threshold: f64) -> Self {
        Self {
            field: field.to_string(),
            threshold,
        }
    }
}

impl Predictor for ThresholdPredictor {
    fn predict(&self, dataset: &Dataset) -> Result<PredictionVector, EthicsError> {
        dataset
            .records()
            .iter()
            .enumerate()
            .map(|(idx, record)| match record.get(&self.field) {
                Some(FieldValue::Number(v)) => Ok(if *v >= self.threshold { 1.0 } else { 0.0 }),
                _ => Err(EthicsError::schema(
                    self.field.clone(),
                    format!("record {} has no numeric value", idx),
                )),
            })
            .collect()
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Predicts positively with a per-group probability on a categorical
/// attribute. Useful for demonstrating disparity: give groups different
/// acceptance rates and the fairness engine will surface the spread.
///
/// Draws are seeded per call, so the predictor is deterministic for a fixed
/// input, as the engines assume.
#[derive(Debug, Clone)]
pub struct GroupRatePredictor {
    pub attribute: String,
    pub rates: HashMap<String, f64>,
    pub fallback_rate: f64,
    pub seed: u64,
}

impl GroupRatePredictor {
    pub fn new(attribute: &str, rates: &[(&str, f64)], seed: u64) -> Self {
        Self {
            attribute: attribute.to_string(),
            rates: rates.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            fallback_rate: 0.5,
            seed,
        }
    }
}

impl Predictor for GroupRatePredictor {
    fn predict(&self, dataset: &Dataset) -> Result<PredictionVector, EthicsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        dataset
            .records()
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let group = record
                    .get(&self.attribute)
                    .and_then(FieldValue::as_category)
                    .ok_or_else(|| {
                        EthicsError::schema(
                            self.attribute.clone(),
                            format!("record {} has no categorical value", idx),
                        )
                    })?;
                let rate = self.rates.get(group).copied().unwrap_or(self.fallback_rate);
                Ok(if rng.gen::<f64>() < rate { 1.0 } else { 0.0 })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "GroupRate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn small_dataset() -> Dataset {
        Dataset::new(vec![
            Record::new().with_number("score", 0.9).with_category("region", "A"),
            Record::new().with_number("score", 0.1).with_category("region", "B"),
        ])
        .unwrap()
    }

    #[test]
    fn test_constant_predictor() {
        let dataset = small_dataset();
        let preds = ConstantPredictor::new(1.0).predict(&dataset).unwrap();
        assert_eq!(preds, vec![1.0, 1.0]);
    }

    #[test]
    fn test_threshold_predictor() {
        let dataset = small_dataset();
        let preds = ThresholdPredictor::new("score", 0.5).predict(&dataset).unwrap();
        assert_eq!(preds, vec![1.0, 0.0]);
    }

    #[test]
    fn test_threshold_predictor_missing_field() {
        let dataset = small_dataset();
        assert!(ThresholdPredictor::new("income", 0.5).predict(&dataset).is_err());
    }

    #[test]
    fn test_group_rate_predictor_deterministic() {
        let dataset = small_dataset();
        let model = GroupRatePredictor::new("region", &[("A", 1.0), ("B", 0.0)], 7);
        let first = model.predict(&dataset).unwrap();
        let second = model.predict(&dataset).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![1.0, 0.0]);
    }
}
