// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Top-level ethics evaluation across all seven principles
//!
//! Fairness and robustness run the quantitative engines; transparency,
//! accountability, privacy, safety and explainability run the checklist
//! scorer over the supplied documentation. Each principle has its own named
//! field in the result, so callers never reconstruct outcomes from missing
//! map keys. A failing engine fails the whole evaluation.

use crate::checklist::{checklist_score, ChecklistCatalog};
use crate::dataset::Dataset;
use crate::error::EthicsError;
use crate::fairness::{assess_fairness, FairnessReport};
use crate::model::Predictor;
use crate::robustness::{assess_robustness, RobustnessConfig, RobustnessReport};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Free-text inputs for the documentation-scanned principles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentationBundle {
    /// Model documentation (transparency).
    pub documentation: String,
    /// Governance structure description (accountability).
    pub governance: String,
    /// Audit trail description (accountability).
    pub audit_trail: String,
    /// Data handling procedures (privacy).
    pub data_handling: String,
    /// Intended use case description (safety).
    pub use_case: String,
    /// Risk assessment description (safety).
    pub risk_assessment: String,
    /// Explainability method description (explainability).
    pub explainability_method: String,
}

/// Configuration for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthicsConfig {
    /// Categorical fields assessed for fairness, independently.
    pub sensitive_attributes: Vec<String>,
    /// Robustness probe configuration.
    pub robustness: RobustnessConfig,
    /// Keyword catalog for the documentation-scanned principles.
    pub catalog: ChecklistCatalog,
    /// Seed for the perturbation noise source.
    pub seed: u64,
}

impl Default for EthicsConfig {
    fn default() -> Self {
        Self {
            sensitive_attributes: vec![],
            robustness: RobustnessConfig::default(),
            catalog: ChecklistCatalog::default(),
            seed: 42,
        }
    }
}

/// Evaluation outcome, one field per principle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthicsReport {
    pub fairness: FairnessReport,
    pub transparency: f64,
    pub accountability: f64,
    pub privacy: f64,
    pub safety: f64,
    pub robustness: RobustnessReport,
    pub explainability: f64,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl EthicsReport {
    /// Mean of all seven principle scores; fairness and robustness
    /// contribute their aggregate means.
    pub fn overall_score(&self) -> f64 {
        let parts = [
            self.fairness.mean_score(),
            self.transparency,
            self.accountability,
            self.privacy,
            self.safety,
            self.robustness.aggregate,
            self.explainability,
        ];
        parts.iter().sum::<f64>() / parts.len() as f64
    }

    /// Generate a markdown report.
    pub fn to_markdown(&self) -> String {
        let mut report = String::new();

        report.push_str("# AI Ethics Evaluation Report\n\n");
        report.push_str(&format!(
            "**Generated:** {}\n\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        report.push_str(&format!("**Version:** {}\n\n", self.version));
        report.push_str(&format!("**Overall Score:** {:.4}\n\n", self.overall_score()));

        report.push_str("## Principle Scores\n\n");
        report.push_str("| Principle | Score |\n");
        report.push_str("|-----------|-------|\n");
        report.push_str(&format!("| Fairness | {:.4} |\n", self.fairness.mean_score()));
        report.push_str(&format!("| Transparency | {:.4} |\n", self.transparency));
        report.push_str(&format!("| Accountability | {:.4} |\n", self.accountability));
        report.push_str(&format!("| Privacy | {:.4} |\n", self.privacy));
        report.push_str(&format!("| Safety | {:.4} |\n", self.safety));
        report.push_str(&format!("| Robustness | {:.4} |\n", self.robustness.aggregate));
        report.push_str(&format!("| Explainability | {:.4} |\n", self.explainability));

        report.push_str("\n## Fairness\n\n");
        report.push_str(&format!("```\n{}```\n", self.fairness.format()));

        report.push_str("\n## Robustness\n\n");
        report.push_str(&format!("```\n{}```\n", self.robustness.format()));

        report
    }

    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report saved to {}", path.display());
        Ok(())
    }
}

/// Evaluate a model against all seven ethical principles.
pub fn evaluate(
    model: &dyn Predictor,
    dataset: &Dataset,
    ood: Option<&Dataset>,
    docs: &DocumentationBundle,
    config: &EthicsConfig,
) -> Result<EthicsReport, EthicsError> {
    tracing::info!(
        model = model.name(),
        records = dataset.len(),
        attributes = config.sensitive_attributes.len(),
        "starting ethics evaluation"
    );

    let fairness = assess_fairness(model, dataset, &config.sensitive_attributes)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let robustness = assess_robustness(model, dataset, ood, &config.robustness, &mut rng)?;

    let accountability_text = format!("{}\n{}", docs.governance, docs.audit_trail);
    let safety_text = format!("{}\n{}", docs.use_case, docs.risk_assessment);

    let report = EthicsReport {
        fairness,
        transparency: checklist_score(&docs.documentation, &config.catalog.transparency),
        accountability: checklist_score(&accountability_text, &config.catalog.accountability),
        privacy: checklist_score(&docs.data_handling, &config.catalog.privacy),
        safety: checklist_score(&safety_text, &config.catalog.safety),
        robustness,
        explainability: checklist_score(&docs.explainability_method, &config.catalog.explainability),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    tracing::info!(overall = report.overall_score(), "ethics evaluation complete");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstantPredictor, GroupRatePredictor};

    fn sample_docs() -> DocumentationBundle {
        DocumentationBundle {
            documentation: "Model architecture: four layers. Trained on a public dataset \
                            after preprocessing; we report accuracy and recall."
                .to_string(),
            governance: "An oversight board is the responsible party.".to_string(),
            audit_trail: "All decisions go to an audit trail with version control.".to_string(),
            data_handling: "We practice data minimization and anonymization; consent \
                            is collected and retention is limited."
                .to_string(),
            use_case: "Intended use: credit pre-screening within a documented scope.".to_string(),
            risk_assessment: "Risk assessment identified harm scenarios with mitigation."
                .to_string(),
            explainability_method: "Feature importance via SHAP with a textual explanation."
                .to_string(),
        }
    }

    #[test]
    fn test_end_to_end_evaluate() {
        let dataset = Dataset::synthetic(200, 42);
        let model = GroupRatePredictor::new(
            "region",
            &[("north", 0.8), ("south", 0.4), ("east", 0.6), ("west", 0.6)],
            7,
        );
        let config = EthicsConfig {
            sensitive_attributes: vec!["region".to_string(), "age_band".to_string()],
            ..Default::default()
        };

        let report = evaluate(&model, &dataset, None, &sample_docs(), &config).unwrap();

        assert_eq!(report.fairness.attributes.len(), 2);
        assert!(report.fairness.attributes["region"].demographic_parity < 1.0);
        assert!(report.transparency > 0.0);
        assert!(report.privacy > 0.0);
        assert!(report.overall_score() > 0.0 && report.overall_score() <= 1.0);
    }

    #[test]
    fn test_constant_model_is_fair_and_robust() {
        let dataset = Dataset::synthetic(100, 1);
        let config = EthicsConfig {
            sensitive_attributes: vec!["region".to_string()],
            ..Default::default()
        };
        let report = evaluate(
            &ConstantPredictor::new(1.0),
            &dataset,
            None,
            &DocumentationBundle::default(),
            &config,
        )
        .unwrap();

        let scores = &report.fairness.attributes["region"];
        assert!((scores.demographic_parity - 1.0).abs() < 1e-12);
        assert!((scores.disparate_impact - 1.0).abs() < 1e-12);
        assert!((report.robustness.aggregate - 1.0).abs() < 1e-12);
        // Empty documentation scores zero on every checklist principle.
        assert_eq!(report.transparency, 0.0);
        assert_eq!(report.safety, 0.0);
    }

    #[test]
    fn test_failing_engine_fails_whole_call() {
        let dataset = Dataset::synthetic(50, 3);
        let config = EthicsConfig {
            sensitive_attributes: vec!["missing_attribute".to_string()],
            ..Default::default()
        };
        let err = evaluate(
            &ConstantPredictor::new(1.0),
            &dataset,
            None,
            &DocumentationBundle::default(),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, EthicsError::Schema { .. }));
    }

    #[test]
    fn test_report_serializes_and_renders() {
        let dataset = Dataset::synthetic(80, 9);
        let config = EthicsConfig {
            sensitive_attributes: vec!["region".to_string()],
            ..Default::default()
        };
        let report = evaluate(
            &ConstantPredictor::new(1.0),
            &dataset,
            None,
            &sample_docs(),
            &config,
        )
        .unwrap();

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("demographic_parity"));

        let markdown = report.to_markdown();
        assert!(markdown.contains("AI Ethics Evaluation Report"));
        assert!(markdown.contains("| Fairness |"));
        assert!(markdown.contains("Robustness Report"));
    }

    #[test]
    fn test_save_json_round_trip() {
        let dataset = Dataset::synthetic(30, 5);
        let config = EthicsConfig::default();
        let report = evaluate(
            &ConstantPredictor::new(1.0),
            &dataset,
            None,
            &DocumentationBundle::default(),
            &config,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("report.json");
        report.save_json(&path).unwrap();

        let loaded: EthicsReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!((loaded.overall_score() - report.overall_score()).abs() < 1e-12);
    }
}
