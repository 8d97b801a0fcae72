//! Label-distribution divergence between groups and the population
//!
//! Two views are provided:
//! - aggregate: each group's vector of label means, normalized into a
//!   distribution over labels, against the same vector for the population
//! - per label: each group's {0, 1} frequencies for one label against the
//!   population's frequencies for that label
//!
//! Both report the base-2 Jensen-Shannon distance.

use crate::constants::{COL_INTERPRETATION, COL_JS_VALUE, COL_LABEL, DIVERGENCE_DECIMALS};
use crate::domain::dataset::Dataset;
use crate::domain::error::{FairnessError, Result, UndefinedRatio};
use crate::domain::grouping::{GroupId, Groups};
use crate::domain::interpretation::{DIVERGENCE_RULES, DivergenceInterpretation};
use crate::domain::report::{TabularReport, format_number};
use crate::domain::stats::{jensen_shannon_distance, normalize, prevalence, round_to};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Divergence of one group's label distribution from the population
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupDivergenceRow {
    pub group: GroupId,
    pub js_value: f64,
    pub interpretation: DivergenceInterpretation,
}

/// Aggregate divergence for every group of an attribute
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupDivergenceReport {
    pub attribute: String,
    pub rows: Vec<GroupDivergenceRow>,
}

/// Divergence of one group's outcome distribution for one label
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelDivergenceRow {
    pub label: String,
    pub group: GroupId,
    pub js_value: f64,
    pub interpretation: DivergenceInterpretation,
}

/// Per-label divergence for every (label, group) pair
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelDivergenceReport {
    pub attribute: String,
    pub rows: Vec<LabelDivergenceRow>,
}

/// Aggregate JS distance per group
///
/// Needs at least two labels. Fails with `UndefinedRatio` when the
/// population or a group has no positive observation on any label.
pub fn js_divergence_by_group(
    dataset: &Dataset,
    attribute: &str,
    labels: &[&str],
) -> Result<GroupDivergenceReport> {
    if labels.len() < 2 {
        warn!(attribute, labels = labels.len(), "aggregate divergence needs two labels");
        return Err(FairnessError::DegenerateInput(format!(
            "aggregate divergence needs at least 2 labels, got {}",
            labels.len()
        )));
    }

    let groups = Groups::by_attribute(dataset, attribute)?;
    let columns: Vec<Vec<u8>> = labels
        .iter()
        .map(|label| dataset.binary_column(label))
        .collect::<Result<_>>()?;

    let all_rows: Vec<usize> = (0..groups.total()).collect();
    let population = normalize(&label_means(&columns, &all_rows)).ok_or_else(|| {
        warn!(attribute, "population label vector has zero mass");
        FairnessError::from(UndefinedRatio::ZeroPopulationMass)
    })?;

    let mut rows = Vec::with_capacity(groups.len());
    for (group, members) in groups.iter() {
        let distribution = normalize(&label_means(&columns, members)).ok_or_else(|| {
            warn!(attribute, group = %group, "group label vector has zero mass");
            FairnessError::from(UndefinedRatio::ZeroGroupMass {
                group: group.to_string(),
            })
        })?;

        let js = jensen_shannon_distance(&distribution, &population)?;
        rows.push(GroupDivergenceRow {
            group: group.clone(),
            js_value: round_to(js, DIVERGENCE_DECIMALS),
            interpretation: DIVERGENCE_RULES.classify(js),
        });
    }

    debug!(
        attribute,
        labels = labels.len(),
        groups = rows.len(),
        "computed aggregate divergence"
    );

    Ok(GroupDivergenceReport {
        attribute: attribute.to_string(),
        rows,
    })
}

/// JS distance per label and group over {0, 1} outcome frequencies
pub fn js_divergence_by_label_and_group(
    dataset: &Dataset,
    attribute: &str,
    labels: &[&str],
) -> Result<LabelDivergenceReport> {
    if labels.is_empty() {
        warn!(attribute, "per-label divergence requested without labels");
        return Err(FairnessError::DegenerateInput(
            "no label columns given".to_string(),
        ));
    }

    let groups = Groups::by_attribute(dataset, attribute)?;

    let per_label: Vec<Vec<LabelDivergenceRow>> = labels
        .par_iter()
        .map(|label| divergence_for_label(dataset, &groups, label))
        .collect::<Result<_>>()?;
    let rows: Vec<LabelDivergenceRow> = per_label.into_iter().flatten().collect();

    debug!(
        attribute,
        labels = labels.len(),
        rows = rows.len(),
        "computed per-label divergence"
    );

    Ok(LabelDivergenceReport {
        attribute: attribute.to_string(),
        rows,
    })
}

fn divergence_for_label(
    dataset: &Dataset,
    groups: &Groups,
    label: &str,
) -> Result<Vec<LabelDivergenceRow>> {
    let values = dataset.binary_column(label)?;
    let all_rows: Vec<usize> = (0..groups.total()).collect();
    let population = outcome_frequencies(&values, &all_rows);

    groups
        .iter()
        .map(|(group, members)| {
            let js = jensen_shannon_distance(&outcome_frequencies(&values, members), &population)?;
            Ok(LabelDivergenceRow {
                label: label.to_string(),
                group: group.clone(),
                js_value: round_to(js, DIVERGENCE_DECIMALS),
                interpretation: DIVERGENCE_RULES.classify(js),
            })
        })
        .collect()
}

/// Mean of every label column over `rows`
fn label_means(columns: &[Vec<u8>], rows: &[usize]) -> Vec<f64> {
    columns.iter().map(|c| prevalence(c, rows)).collect()
}

/// [P(label = 0), P(label = 1)] over `rows`
fn outcome_frequencies(values: &[u8], rows: &[usize]) -> [f64; 2] {
    let positive = prevalence(values, rows);
    [1.0 - positive, positive]
}

impl TabularReport for GroupDivergenceReport {
    fn column_names(&self) -> Vec<String> {
        vec![
            self.attribute.clone(),
            COL_JS_VALUE.to_string(),
            COL_INTERPRETATION.to_string(),
        ]
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.group.to_string(),
                    format_number(r.js_value),
                    r.interpretation.to_string(),
                ]
            })
            .collect()
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

impl TabularReport for LabelDivergenceReport {
    fn column_names(&self) -> Vec<String> {
        vec![
            COL_LABEL.to_string(),
            self.attribute.clone(),
            COL_JS_VALUE.to_string(),
            COL_INTERPRETATION.to_string(),
        ]
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.label.clone(),
                    r.group.to_string(),
                    format_number(r.js_value),
                    r.interpretation.to_string(),
                ]
            })
            .collect()
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }
}
