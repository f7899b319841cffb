// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Robustness probes: prediction agreement under input shift
//!
//! Three checks, each reduced to an agreement rate in [0, 1]:
//! - Adversarial: one gaussian perturbation at the configured scale
//! - Out-of-distribution: a caller-supplied OOD dataset
//! - Stability: mean adversarial agreement across several scales
//!
//! The original dataset's prediction vector is computed exactly once and
//! reused by every check.

use crate::dataset::Dataset;
use crate::error::EthicsError;
use crate::model::{check_aligned, Predictor};
use crate::perturb::{perturb, NoiseSpec};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for the robustness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobustnessConfig {
    /// Noise applied for the single adversarial check.
    pub adversarial_noise: NoiseSpec,
    /// Scales swept by the stability check, so no single scale dominates.
    pub stability_scales: Vec<f64>,
    /// Agreement tolerance for continuous outputs. The default of 0.0
    /// requires exact label equality, the documented limitation for
    /// probabilistic predictors.
    pub label_tolerance: f64,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            adversarial_noise: NoiseSpec::default(),
            stability_scales: vec![0.05, 0.1, 0.2],
            label_tolerance: 0.0,
        }
    }
}

/// Agreement scores from the robustness probes. The out-of-distribution
/// score is present only when an OOD dataset was supplied; the aggregate
/// averages the sub-scores that were actually computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobustnessReport {
    pub adversarial: f64,
    pub out_of_distribution: Option<f64>,
    pub stability: f64,
    pub aggregate: f64,
}

impl RobustnessReport {
    /// Format as a human-readable string.
    pub fn format(&self) -> String {
        let ood = self
            .out_of_distribution
            .map_or("not assessed".to_string(), |v| format!("{:.4}", v));
        format!(
            r#"Robustness Report
=================
Adversarial Agreement:  {:.4}
OOD Agreement:          {}
Stability (multi-scale):{:.4}
Aggregate:              {:.4}
"#,
            self.adversarial, ood, self.stability, self.aggregate
        )
    }
}

/// Assess robustness of a model against perturbed and out-of-distribution
/// inputs. The RNG handle drives all noise draws for the call.
pub fn assess_robustness<R: Rng + ?Sized>(
    model: &dyn Predictor,
    dataset: &Dataset,
    ood: Option<&Dataset>,
    config: &RobustnessConfig,
    rng: &mut R,
) -> Result<RobustnessReport, EthicsError> {
    if config.stability_scales.is_empty() {
        return Err(EthicsError::schema(
            "stability_scales",
            "at least one perturbation scale is required",
        ));
    }
    config.adversarial_noise.validate()?;
    for scale in &config.stability_scales {
        NoiseSpec::gaussian(*scale).validate()?;
    }
    if let Some(ood) = ood {
        dataset.check_compatible(ood)?;
    }

    let original = model.predict(dataset)?;
    check_aligned(dataset, &original)?;

    let adversarial = perturbed_agreement(model, dataset, &original, &config.adversarial_noise, config.label_tolerance, rng)?;

    let out_of_distribution = match ood {
        Some(ood) => {
            let shifted = model.predict(ood)?;
            check_aligned(ood, &shifted)?;
            Some(agreement(&original, &shifted, config.label_tolerance))
        }
        None => None,
    };

    let mut scale_scores = Vec::with_capacity(config.stability_scales.len());
    for scale in &config.stability_scales {
        let spec = NoiseSpec::gaussian(*scale);
        scale_scores.push(perturbed_agreement(model, dataset, &original, &spec, config.label_tolerance, rng)?);
    }
    let stability = scale_scores.iter().sum::<f64>() / scale_scores.len() as f64;

    let mut parts = vec![adversarial, stability];
    if let Some(ood_score) = out_of_distribution {
        parts.push(ood_score);
    }
    let aggregate = parts.iter().sum::<f64>() / parts.len() as f64;

    tracing::debug!(adversarial, stability, aggregate, "robustness scores computed");

    Ok(RobustnessReport {
        adversarial,
        out_of_distribution,
        stability,
        aggregate,
    })
}

fn perturbed_agreement<R: Rng + ?Sized>(
    model: &dyn Predictor,
    dataset: &Dataset,
    original: &[f64],
    spec: &NoiseSpec,
    tolerance: f64,
    rng: &mut R,
) -> Result<f64, EthicsError> {
    let perturbed = perturb(dataset, spec, rng)?;
    let predictions = model.predict(&perturbed)?;
    check_aligned(&perturbed, &predictions)?;
    Ok(agreement(original, &predictions, tolerance))
}

/// Fraction of index-aligned prediction pairs within `tolerance` of each
/// other. A tolerance of 0.0 is exact equality.
fn agreement(a: &[f64], b: &[f64], tolerance: f64) -> f64 {
    let matches = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| (**x - **y).abs() <= tolerance)
        .count();
    matches as f64 / a.len() as f64
}
