// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Fairness metrics over grouped model predictions
//!
//! Implements the three group-rate metrics:
//! - Demographic parity: 1 minus the spread of group acceptance rates
//! - Equal opportunity: the same spread restricted to ground-truth positives
//! - Disparate impact: minimum over maximum group acceptance rate
//!   (the four-fifths-rule ratio convention)
//!
//! All scores are pure arithmetic over one prediction vector; identical
//! inputs yield bit-identical scores.

use crate::dataset::{Dataset, GroupPartition};
use crate::error::EthicsError;
use crate::model::{check_aligned, Predictor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Disparate impact values below this are flagged in rendered reports.
pub const DISPARATE_IMPACT_FLAG: f64 = 0.8;

/// Ground-truth values above this count as positive outcomes.
const POSITIVE_CUTOFF: f64 = 0.5;

/// Fairness scores for one sensitive attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeFairness {
    /// `1 - (max group rate - min group rate)`, clamped to [0, 1].
    pub demographic_parity: f64,
    /// Demographic parity restricted to ground-truth-positive records.
    pub equal_opportunity: f64,
    /// `min group rate / max group rate`; 1.0 when the max rate is zero.
    pub disparate_impact: f64,
}

/// Fairness scores per sensitive attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessReport {
    pub attributes: HashMap<String, AttributeFairness>,
}

impl FairnessReport {
    /// Smallest disparate impact across attributes, or 1.0 with none assessed.
    pub fn worst_disparate_impact(&self) -> f64 {
        self.attributes
            .values()
            .map(|a| a.disparate_impact)
            .fold(1.0, f64::min)
    }

    /// Mean of all three metrics across attributes; 1.0 when no sensitive
    /// attributes were assessed (no disparity detectable).
    pub fn mean_score(&self) -> f64 {
        if self.attributes.is_empty() {
            return 1.0;
        }
        let sum: f64 = self
            .attributes
            .values()
            .map(|a| (a.demographic_parity + a.equal_opportunity + a.disparate_impact) / 3.0)
            .sum();
        sum / self.attributes.len() as f64
    }

    /// Format as a human-readable string.
    pub fn format(&self) -> String {
        let mut out = String::from("Fairness Report\n===============\n");
        let mut names: Vec<&String> = self.attributes.keys().collect();
        names.sort_unstable();
        for name in names {
            let scores = &self.attributes[name];
            let flag = if scores.disparate_impact < DISPARATE_IMPACT_FLAG {
                "  [FLAGGED]"
            } else {
                ""
            };
            out.push_str(&format!(
                "{}\n  Demographic Parity: {:.4}\n  Equal Opportunity:  {:.4}\n  Disparate Impact:   {:.4}{}\n",
                name, scores.demographic_parity, scores.equal_opportunity, scores.disparate_impact, flag
            ));
        }
        out
    }
}

/// Assess fairness of a model over the given sensitive attributes.
///
/// Predictions are computed once for the full dataset and reused across all
/// attributes and groups, so the scores stay mutually consistent even if the
/// adapter were noisy.
pub fn assess_fairness(
    model: &dyn Predictor,
    dataset: &Dataset,
    attributes: &[String],
) -> Result<FairnessReport, EthicsError> {
    let predictions = model.predict(dataset)?;
    check_aligned(dataset, &predictions)?;

    let mut report = FairnessReport {
        attributes: HashMap::new(),
    };

    for attribute in attributes {
        let partition = dataset.partition(attribute)?;
        let scores = attribute_fairness(dataset, &partition, &predictions)?;
        tracing::debug!(
            attribute = attribute.as_str(),
            parity = scores.demographic_parity,
            impact = scores.disparate_impact,
            "fairness scores computed"
        );
        report.attributes.insert(attribute.clone(), scores);
    }

    Ok(report)
}

fn attribute_fairness(
    dataset: &Dataset,
    partition: &GroupPartition,
    predictions: &[f64],
) -> Result<AttributeFairness, EthicsError> {
    let rates = group_rates(partition, predictions, None);

    let equal_opportunity = {
        let labels = dataset.labels()?;
        let positive: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l > POSITIVE_CUTOFF)
            .map(|(i, _)| i)
            .collect();
        let positive_rates = group_rates(partition, predictions, Some(&positive));
        spread_score(&positive_rates)
    };

    Ok(AttributeFairness {
        demographic_parity: spread_score(&rates),
        equal_opportunity,
        disparate_impact: ratio_score(&rates),
    })
}

/// Mean prediction per group, optionally restricted to a set of record
/// indices. Groups left with no members after restriction are excluded.
fn group_rates(partition: &GroupPartition, predictions: &[f64], keep: Option<&[usize]>) -> Vec<f64> {
    partition
        .groups
        .values()
        .filter_map(|indices| {
            let members: Vec<usize> = match keep {
                Some(keep) => indices.iter().copied().filter(|i| keep.contains(i)).collect(),
                None => indices.clone(),
            };
            if members.is_empty() {
                return None;
            }
            let sum: f64 = members.iter().map(|&i| predictions[i]).sum();
            Some(sum / members.len() as f64)
        })
        .collect()
}

/// `1 - (max - min)` over group rates, clamped to [0, 1]. Fewer than two
/// groups means no disparity is possible and scores 1.0.
fn spread_score(rates: &[f64]) -> f64 {
    if rates.len() < 2 {
        return 1.0;
    }
    let max = rates.iter().fold(f64::MIN, |a, &b| a.max(b));
    let min = rates.iter().fold(f64::MAX, |a, &b| a.min(b));
    (1.0 - (max - min)).clamp(0.0, 1.0)
}

/// `min / max` over group rates. A zero maximum means no disparity is
/// detectable and scores 1.0, not a division fault.
fn ratio_score(rates: &[f64]) -> f64 {
    if rates.len() < 2 {
        return 1.0;
    }
    let max = rates.iter().fold(f64::MIN, |a, &b| a.max(b));
    let min = rates.iter().fold(f64::MAX, |a, &b| a.min(b));
    if max == 0.0 {
        return 1.0;
    }
    min / max
}
