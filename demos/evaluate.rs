// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! End-to-end evaluation walkthrough
//!
//! Builds a synthetic credit-decision dataset, runs a deliberately biased
//! predictor through all seven principles, and prints the rendered report.
//!
//! Run with: cargo run --example evaluate

use anyhow::Result;
use ethics_eval::{
    evaluate, Dataset, DocumentationBundle, EthicsConfig, GroupRatePredictor,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dataset = Dataset::synthetic(1_000, 42);

    // Acceptance rates differ by region, so the fairness engine has a
    // disparity to surface.
    let model = GroupRatePredictor::new(
        "region",
        &[("north", 0.85), ("south", 0.35), ("east", 0.6), ("west", 0.6)],
        7,
    );

    let docs = DocumentationBundle {
        documentation: "The model architecture stacks four dense layers with relu \
                        activation functions. Training data: an internal dataset after \
                        preprocessing. We report accuracy, precision and recall from the \
                        evaluation, and one known limitation around sparse regions."
            .to_string(),
        governance: "A model oversight board is the responsible party for deployment \
                     decisions, with a documented escalation path."
            .to_string(),
        audit_trail: "Every scoring decision lands in an audit trail with version \
                      control over model artifacts."
            .to_string(),
        data_handling: "Data minimization applies at ingestion; records are subject to \
                        anonymization, consent tracking and a twelve month retention \
                        window before deletion."
            .to_string(),
        use_case: "Intended use: pre-screening credit applications; misuse outside that \
                   scope is documented."
            .to_string(),
        risk_assessment: "The risk assessment covers harm scenarios and mitigation \
                          steps, ranked by severity."
            .to_string(),
        explainability_method: "Per-decision feature importance via SHAP, delivered as \
                                a textual explanation."
            .to_string(),
    };

    let config = EthicsConfig {
        sensitive_attributes: vec!["region".to_string(), "age_band".to_string()],
        ..Default::default()
    };

    let report = evaluate(&model, &dataset, None, &docs, &config)?;

    println!("{}", report.to_markdown());

    let out = std::path::Path::new("demo_results/ethics_report.json");
    report.save_json(out)?;
    println!("JSON report saved to: {}", out.display());

    Ok(())
}
