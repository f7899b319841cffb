// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Quantitative ethics assessment engine for AI models
//!
//! This crate provides:
//! - Tabular datasets with schema validation and group partitioning
//! - Fairness metrics (demographic parity, equal opportunity, disparate impact)
//! - Perturbation-based robustness probes with seeded randomness
//! - Keyword checklist scoring for documentation-scanned principles
//! - A top-level evaluation across all seven ethical principles

pub mod checklist;
pub mod dataset;
pub mod error;
pub mod fairness;
pub mod framework;
pub mod model;
pub mod perturb;
pub mod robustness;

pub use checklist::{checklist_score, coverage, ChecklistCatalog, KeywordSet};
pub use dataset::{Dataset, FieldKind, FieldValue, GroupPartition, Record};
pub use error::EthicsError;
pub use fairness::{assess_fairness, AttributeFairness, FairnessReport, DISPARATE_IMPACT_FLAG};
pub use framework::{evaluate, DocumentationBundle, EthicsConfig, EthicsReport};
pub use model::{ConstantPredictor, GroupRatePredictor, PredictionVector, Predictor, ThresholdPredictor};
pub use perturb::{perturb, NoiseDistribution, NoiseSpec};
pub use robustness::{assess_robustness, RobustnessConfig, RobustnessReport};
