//! Combined fairness audit
//!
//! Runs the selected metric components over a set of sensitive attributes
//! and labels in one call. Each component still fails as a whole; an audit
//! either returns every requested table or the first error.

use crate::app::coverage::{CoverageReport, coverage_gap_intersectional};
use crate::app::divergence::{
    GroupDivergenceReport, LabelDivergenceReport, js_divergence_by_group,
    js_divergence_by_label_and_group,
};
use crate::app::representation::{RepresentationReport, data_representation_fairness};
use crate::app::risk_ratio::{
    RiskRatioReport, risk_ratio_multilabel, risk_ratio_multilabel_intersectional,
};
use crate::domain::dataset::Dataset;
use crate::domain::error::{FairnessError, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Metric components an audit can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Representation,
    RiskRatio,
    Coverage,
    Divergence,
    DivergenceByLabel,
}

/// Audit configuration
#[derive(Clone, Debug)]
pub struct AuditOptions {
    /// Sensitive attributes analysed one at a time
    pub attributes: Vec<String>,
    /// Binary label columns
    pub labels: Vec<String>,
    /// Attribute pair for intersectional metrics
    pub intersection: Option<(String, String)>,
    /// Components to run; `None` runs every component that applies
    pub metrics: Option<Vec<Metric>>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            labels: Vec::new(),
            intersection: None,
            metrics: None,
        }
    }
}

impl AuditOptions {
    /// Add a sensitive attribute
    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attributes.push(attribute.to_string());
        self
    }

    /// Add a label column
    pub fn with_label(mut self, label: &str) -> Self {
        self.labels.push(label.to_string());
        self
    }

    /// Set the attribute pair for intersectional metrics
    pub fn with_intersection(mut self, first: &str, second: &str) -> Self {
        self.intersection = Some((first.to_string(), second.to_string()));
        self
    }

    /// Restrict the audit to the given components
    pub fn with_metrics(mut self, metrics: &[Metric]) -> Self {
        self.metrics = Some(metrics.to_vec());
        self
    }

    fn runs(&self, metric: Metric) -> bool {
        self.metrics.as_ref().is_none_or(|m| m.contains(&metric))
    }

    fn selected(&self, metric: Metric) -> bool {
        self.metrics.as_ref().is_some_and(|m| m.contains(&metric))
    }
}

/// Every table produced for one sensitive attribute
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AttributeAudit {
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<RepresentationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_ratio: Option<RiskRatioReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divergence: Option<GroupDivergenceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divergence_by_label: Option<LabelDivergenceReport>,
}

/// Tables produced for the intersection of two attributes
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IntersectionAudit {
    pub first: String,
    pub second: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_ratio: Option<RiskRatioReport>,
}

/// Result of a full audit
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub samples: usize,
    pub attributes: Vec<AttributeAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersection: Option<IntersectionAudit>,
}

/// Run every selected component
pub fn run_audit(dataset: &Dataset, options: &AuditOptions) -> Result<AuditReport> {
    if options.attributes.is_empty() && options.intersection.is_none() {
        return Err(FairnessError::DegenerateInput(
            "audit needs at least one sensitive attribute".to_string(),
        ));
    }

    let labels: Vec<&str> = options.labels.iter().map(String::as_str).collect();
    let needs_labels = [Metric::RiskRatio, Metric::Divergence, Metric::DivergenceByLabel]
        .iter()
        .any(|&m| options.runs(m));
    if needs_labels && labels.is_empty() {
        return Err(FairnessError::DegenerateInput(
            "label-based metrics selected without label columns".to_string(),
        ));
    }

    // Aggregate divergence compares label mixes, so it needs two labels
    let run_divergence = if labels.len() < 2 && options.runs(Metric::Divergence) {
        if options.selected(Metric::Divergence) {
            return Err(FairnessError::DegenerateInput(format!(
                "aggregate divergence needs at least 2 labels, got {}",
                labels.len()
            )));
        }
        warn!(labels = labels.len(), "skipping aggregate divergence");
        false
    } else {
        options.runs(Metric::Divergence)
    };

    let mut attributes = Vec::with_capacity(options.attributes.len());
    for attribute in &options.attributes {
        let mut audit = AttributeAudit {
            attribute: attribute.clone(),
            ..Default::default()
        };
        if options.runs(Metric::Representation) {
            audit.representation = Some(data_representation_fairness(dataset, attribute)?);
        }
        if options.runs(Metric::RiskRatio) {
            audit.risk_ratio = Some(risk_ratio_multilabel(dataset, attribute, &labels)?);
        }
        if run_divergence {
            audit.divergence = Some(js_divergence_by_group(dataset, attribute, &labels)?);
        }
        if options.runs(Metric::DivergenceByLabel) {
            audit.divergence_by_label =
                Some(js_divergence_by_label_and_group(dataset, attribute, &labels)?);
        }
        info!(attribute = %attribute, "audited attribute");
        attributes.push(audit);
    }

    let intersection = match &options.intersection {
        Some((first, second)) => {
            let mut audit = IntersectionAudit {
                first: first.clone(),
                second: second.clone(),
                ..Default::default()
            };
            if options.runs(Metric::Coverage) {
                audit.coverage = Some(coverage_gap_intersectional(dataset, first, second)?);
            }
            if options.runs(Metric::RiskRatio) {
                audit.risk_ratio = Some(risk_ratio_multilabel_intersectional(
                    dataset, first, second, &labels,
                )?);
            }
            info!(first = %first, second = %second, "audited intersection");
            Some(audit)
        }
        None => None,
    };

    Ok(AuditReport {
        samples: dataset.num_rows(),
        attributes,
        intersection,
    })
}
