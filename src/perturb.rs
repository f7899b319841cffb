// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Noise perturbation of numeric dataset features
//!
//! Produces transient perturbed copies of a dataset for robustness probes.
//! One independent noise sample is drawn per numeric feature per record;
//! categorical fields and the ground-truth label pass through unchanged.
//!
//! The random source is an injected handle, never ambient global state, so
//! tests can reproduce exact noise sequences with a seeded generator.

use crate::dataset::{Dataset, FieldValue};
use crate::error::EthicsError;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Supported noise distributions. Gaussian is the only required variant;
/// the enum leaves room for heavier-tailed alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseDistribution {
    Gaussian,
}

/// Configuration for one perturbation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    pub distribution: NoiseDistribution,
    pub scale: f64,
}

impl Default for NoiseSpec {
    fn default() -> Self {
        Self {
            distribution: NoiseDistribution::Gaussian,
            scale: 0.1,
        }
    }
}

impl NoiseSpec {
    pub fn gaussian(scale: f64) -> Self {
        Self {
            distribution: NoiseDistribution::Gaussian,
            scale,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EthicsError> {
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(EthicsError::InvalidNoiseScale(self.scale));
        }
        Ok(())
    }
}

/// Derive a perturbed copy of `dataset` by adding elementwise noise to every
/// numeric feature field. Repeated calls draw fresh noise from `rng`.
pub fn perturb<R: Rng + ?Sized>(
    dataset: &Dataset,
    spec: &NoiseSpec,
    rng: &mut R,
) -> Result<Dataset, EthicsError> {
    spec.validate()?;

    let features = dataset.numeric_features();
    if features.is_empty() {
        return Err(EthicsError::UnsupportedSchema);
    }

    let sampler = match spec.distribution {
        NoiseDistribution::Gaussian => Normal::new(0.0, spec.scale)
            .map_err(|_| EthicsError::InvalidNoiseScale(spec.scale))?,
    };

    let mut perturbed = dataset.clone();
    for record in &mut perturbed.records {
        for feature in &features {
            if let Some(FieldValue::Number(v)) = record.fields.get_mut(feature.as_str()) {
                *v += sampler.sample(rng);
            }
        }
    }

    Ok(perturbed)
}
