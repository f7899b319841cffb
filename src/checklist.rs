// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Keyword checklist scoring for documentation-scanned principles
//!
//! Transparency, privacy, accountability, safety and explainability are
//! assessed by scanning free-text documentation for domain keyword sets and
//! averaging the coverage fractions. The keyword catalog is supplied
//! configuration data, serde-loadable, so deployments can swap or localize
//! the term lists without touching the quantitative engines.

use serde::{Deserialize, Serialize};

/// A named set of keywords whose presence evidences one documentation
/// aspect (e.g. "architecture disclosure").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSet {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Case-insensitive substring presence count over the set, divided by the
/// set size. An empty set scores 0.0: nothing checked, nothing evidenced.
pub fn coverage(text: &str, set: &KeywordSet) -> f64 {
    if set.keywords.is_empty() {
        return 0.0;
    }
    let haystack = text.to_lowercase();
    let hits = set
        .keywords
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .count();
    hits as f64 / set.keywords.len() as f64
}

/// Mean coverage across all sets of a checklist; 0.0 for an empty checklist.
pub fn checklist_score(text: &str, sets: &[KeywordSet]) -> f64 {
    if sets.is_empty() {
        return 0.0;
    }
    sets.iter().map(|s| coverage(text, s)).sum::<f64>() / sets.len() as f64
}

/// The keyword catalog for all five documentation-scanned principles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistCatalog {
    pub transparency: Vec<KeywordSet>,
    pub privacy: Vec<KeywordSet>,
    pub accountability: Vec<KeywordSet>,
    pub safety: Vec<KeywordSet>,
    pub explainability: Vec<KeywordSet>,
}

impl Default for ChecklistCatalog {
    fn default() -> Self {
        Self {
            transparency: vec![
                KeywordSet::new(
                    "architecture_disclosure",
                    &["architecture", "layers", "neurons", "activation functions"],
                ),
                KeywordSet::new(
                    "training_data_description",
                    &["training data", "dataset", "data collection", "preprocessing"],
                ),
                KeywordSet::new(
                    "performance_metrics_disclosure",
                    &["accuracy", "precision", "recall", "evaluation"],
                ),
                KeywordSet::new(
                    "limitations_disclosure",
                    &["limitation", "known issues", "failure modes", "out of scope"],
                ),
            ],
            privacy: vec![
                KeywordSet::new(
                    "data_minimization",
                    &["data minimization", "collect only necessary", "limit data collection"],
                ),
                KeywordSet::new(
                    "anonymization_techniques",
                    &["anonymization", "pseudonymization", "de-identification"],
                ),
                KeywordSet::new(
                    "consent_mechanisms",
                    &["consent", "opt-in", "user agreement"],
                ),
                KeywordSet::new(
                    "data_retention_policies",
                    &["retention", "deletion", "storage period"],
                ),
            ],
            accountability: vec![
                KeywordSet::new(
                    "governance_structure",
                    &["governance", "oversight", "responsible party", "escalation"],
                ),
                KeywordSet::new(
                    "audit_trail",
                    &["audit trail", "logging", "traceability", "version control"],
                ),
                KeywordSet::new(
                    "incident_response",
                    &["incident", "rollback", "remediation"],
                ),
            ],
            safety: vec![
                KeywordSet::new(
                    "intended_use",
                    &["intended use", "scope", "misuse", "contraindication"],
                ),
                KeywordSet::new(
                    "risk_assessment",
                    &["risk assessment", "mitigation", "harm", "severity"],
                ),
            ],
            explainability: vec![
                KeywordSet::new(
                    "explanation_method",
                    &["feature importance", "shap", "lime", "saliency", "attention"],
                ),
                KeywordSet::new(
                    "explanation_delivery",
                    &["explanation", "interpretab", "rationale", "counterfactual"],
                ),
            ],
        }
    }
}
