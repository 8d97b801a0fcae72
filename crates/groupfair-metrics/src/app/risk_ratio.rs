//! Multi-label risk ratios
//!
//! For every label, each group's prevalence is compared with the prevalence
//! of the reference group (the group with the highest prevalence for that label).

use crate::constants::{
    COL_ATTRIBUTE, COL_INTERPRETATION, COL_LABEL, COL_PREVALENCE, COL_REFERENCE_GROUP,
    COL_RISK_RATIO, PREVALENCE_DECIMALS, RISK_RATIO_DECIMALS,
};
use crate::domain::dataset::Dataset;
use crate::domain::error::{FairnessError, Result, UndefinedRatio};
use crate::domain::grouping::{GroupId, Groups};
use crate::domain::interpretation::{RISK_RULES, RiskInterpretation};
use crate::domain::report::{TabularReport, format_number};
use crate::domain::stats::{prevalence, round_to};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Risk ratio of one group for one label
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskRatioRow {
    pub label: String,
    pub group: GroupId,
    pub prevalence: f64,
    pub risk_ratio: f64,
    pub reference_group: GroupId,
    pub interpretation: RiskInterpretation,
}

/// Risk ratios for every (label, group) pair
///
/// Rows follow label order, then group order within each label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskRatioReport {
    pub rows: Vec<RiskRatioRow>,
}

impl RiskRatioReport {
    /// Rows belonging to one label
    pub fn rows_for_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a RiskRatioRow> {
        self.rows.iter().filter(move |r| r.label == label)
    }
}

/// Risk ratios over the groups of a single sensitive attribute
///
/// The reference group of each label is the group with the highest
/// prevalence; ties go to the smallest group identifier.
pub fn risk_ratio_multilabel(
    dataset: &Dataset,
    attribute: &str,
    labels: &[&str],
) -> Result<RiskRatioReport> {
    let groups = Groups::by_attribute(dataset, attribute)?;
    let report = risk_ratios_over(dataset, &groups, labels)?;
    debug!(
        attribute,
        labels = labels.len(),
        rows = report.rows.len(),
        "computed risk ratios"
    );
    Ok(report)
}

/// Risk ratios over the intersection of two sensitive attributes
///
/// Groups are ordered by (first value, second value). The reference group
/// of each label is the group with the highest prevalence; ties go to the
/// smallest group identifier.
pub fn risk_ratio_multilabel_intersectional(
    dataset: &Dataset,
    first: &str,
    second: &str,
    labels: &[&str],
) -> Result<RiskRatioReport> {
    let groups = Groups::by_intersection(dataset, first, second)?;
    let report = risk_ratios_over(dataset, &groups, labels)?;
    debug!(
        first,
        second,
        labels = labels.len(),
        rows = report.rows.len(),
        "computed intersectional risk ratios"
    );
    Ok(report)
}

/// Shared algorithm for both entry points
///
/// Labels are processed in parallel and reassembled in input order.
fn risk_ratios_over(dataset: &Dataset, groups: &Groups, labels: &[&str]) -> Result<RiskRatioReport> {
    if labels.is_empty() {
        warn!("risk ratio requested without labels");
        return Err(FairnessError::DegenerateInput(
            "no label columns given".to_string(),
        ));
    }

    let per_label: Vec<Vec<RiskRatioRow>> = labels
        .par_iter()
        .map(|label| risk_ratios_for_label(dataset, groups, label))
        .collect::<Result<_>>()?;

    Ok(RiskRatioReport {
        rows: per_label.into_iter().flatten().collect(),
    })
}

fn risk_ratios_for_label(dataset: &Dataset, groups: &Groups, label: &str) -> Result<Vec<RiskRatioRow>> {
    let values = dataset.binary_column(label)?;

    let rates: Vec<(&GroupId, f64)> = groups
        .iter()
        .map(|(group, rows)| (group, prevalence(&values, rows)))
        .collect();

    // Strict comparison keeps the first (smallest) group among ties
    let (reference, reference_rate) = rates
        .iter()
        .copied()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .ok_or_else(|| FairnessError::DegenerateInput("no groups".to_string()))?;

    if reference_rate == 0.0 {
        warn!(label, "zero reference prevalence");
        return Err(UndefinedRatio::ZeroReferencePrevalence {
            label: label.to_string(),
        }
        .into());
    }

    Ok(rates
        .iter()
        .map(|&(group, rate)| {
            let ratio = round_to(rate / reference_rate, RISK_RATIO_DECIMALS);
            RiskRatioRow {
                label: label.to_string(),
                group: group.clone(),
                prevalence: round_to(rate, PREVALENCE_DECIMALS),
                risk_ratio: ratio,
                reference_group: reference.clone(),
                interpretation: RISK_RULES.classify(ratio),
            }
        })
        .collect())
}

impl TabularReport for RiskRatioReport {
    fn column_names(&self) -> Vec<String> {
        [
            COL_LABEL,
            COL_ATTRIBUTE,
            COL_PREVALENCE,
            COL_RISK_RATIO,
            COL_REFERENCE_GROUP,
            COL_INTERPRETATION,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.label.clone(),
                    r.group.to_string(),
                    format_number(r.prevalence),
                    format_number(r.risk_ratio),
                    r.reference_group.to_string(),
                    r.interpretation.to_string(),
                ]
            })
            .collect()
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;

    /// Group A: 10 rows, 9 approved. Group B: 10 rows, 3 approved.
    fn approvals() -> Dataset {
        let mut group = Vec::new();
        let mut approved = Vec::new();
        for i in 0..10 {
            group.push("A");
            approved.push(i64::from(i < 9));
        }
        for i in 0..10 {
            group.push("B");
            approved.push(i64::from(i < 3));
        }
        Dataset::new()
            .with_column("group", group)
            .unwrap()
            .with_column("approved", approved)
            .unwrap()
    }

    fn single(v: &str) -> GroupId {
        GroupId::Single(Value::from(v))
    }

    #[test]
    fn test_reference_group_and_ratios() {
        let report = risk_ratio_multilabel(&approvals(), "group", &["approved"]).unwrap();

        assert_eq!(report.rows.len(), 2);
        let a = &report.rows[0];
        assert_eq!(a.group, single("A"));
        assert_eq!(a.prevalence, 0.9);
        assert_eq!(a.risk_ratio, 1.0);
        assert_eq!(a.reference_group, single("A"));
        assert_eq!(a.interpretation, RiskInterpretation::EqualPrevalence);

        let b = &report.rows[1];
        assert_eq!(b.prevalence, 0.3);
        assert_eq!(b.risk_ratio, 0.33);
        assert_eq!(b.reference_group, single("A"));
        assert_eq!(b.interpretation, RiskInterpretation::Underrepresentation);
    }

    #[test]
    fn test_reference_differs_per_label() {
        let ds = Dataset::new()
            .with_column("g", vec!["A", "A", "B", "B"])
            .unwrap()
            .with_column("y1", vec![1i64, 1, 0, 1])
            .unwrap()
            .with_column("y2", vec![0i64, 1, 1, 1])
            .unwrap();

        let report = risk_ratio_multilabel(&ds, "g", &["y1", "y2"]).unwrap();
        let labels: Vec<&str> = report.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["y1", "y1", "y2", "y2"]);

        assert_eq!(report.rows[0].reference_group, single("A"));
        assert_eq!(report.rows[2].reference_group, single("B"));
        assert_eq!(report.rows[2].risk_ratio, 0.5);
    }

    #[test]
    fn test_tie_breaks_to_smallest_group() {
        let ds = Dataset::new()
            .with_column("g", vec!["C", "B", "A"])
            .unwrap()
            .with_column("y", vec![1i64, 1, 0])
            .unwrap();

        let report = risk_ratio_multilabel(&ds, "g", &["y"]).unwrap();
        for row in &report.rows {
            assert_eq!(row.reference_group, single("B"));
        }
        let c = report.rows.iter().find(|r| r.group == single("C")).unwrap();
        assert_eq!(c.interpretation, RiskInterpretation::EqualPrevalence);
    }

    #[test]
    fn test_intersectional_tie_breaks_to_smallest_group() {
        let ds = Dataset::new()
            .with_column("race", vec!["b", "a", "a", "b"])
            .unwrap()
            .with_column("sex", vec!["F", "M", "F", "M"])
            .unwrap()
            .with_column("y", vec![1i64, 1, 0, 0])
            .unwrap();

        let report = risk_ratio_multilabel_intersectional(&ds, "race", "sex", &["y"]).unwrap();
        for row in &report.rows {
            assert_eq!(row.reference_group.to_string(), "a | M");
        }
    }

    #[test]
    fn test_zero_prevalence_label_is_undefined() {
        let ds = Dataset::new()
            .with_column("g", vec!["A", "B"])
            .unwrap()
            .with_column("y", vec![0i64, 0])
            .unwrap();

        assert_eq!(
            risk_ratio_multilabel(&ds, "g", &["y"]),
            Err(FairnessError::UndefinedRatio(
                UndefinedRatio::ZeroReferencePrevalence {
                    label: "y".to_string()
                }
            ))
        );
    }

    #[test]
    fn test_no_labels_is_degenerate() {
        assert!(matches!(
            risk_ratio_multilabel(&approvals(), "group", &[]),
            Err(FairnessError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_missing_label() {
        assert_eq!(
            risk_ratio_multilabel(&approvals(), "group", &["approved", "hired"]),
            Err(FairnessError::InvalidColumn("hired".to_string()))
        );
    }

    #[test]
    fn test_ratios_never_exceed_one() {
        let ds = Dataset::new()
            .with_column("g", vec!["A", "A", "B", "B"])
            .unwrap()
            .with_column("y", vec![1i64, 1, 1, 0])
            .unwrap();

        // Reference is A (1.0); B is 0.5
        let report = risk_ratio_multilabel(&ds, "g", &["y"]).unwrap();
        assert_eq!(report.rows[1].interpretation, RiskInterpretation::Underrepresentation);
        assert!(report.rows.iter().all(|r| r.risk_ratio <= 1.0));
    }

    #[test]
    fn test_intersectional_groups() {
        let ds = Dataset::new()
            .with_column("race", vec!["a", "a", "b", "b"])
            .unwrap()
            .with_column("sex", vec!["F", "M", "F", "M"])
            .unwrap()
            .with_column("y", vec![1i64, 0, 1, 1])
            .unwrap();

        let report = risk_ratio_multilabel_intersectional(&ds, "race", "sex", &["y"]).unwrap();
        let groups: Vec<String> = report.rows.iter().map(|r| r.group.to_string()).collect();
        assert_eq!(groups, vec!["a | F", "a | M", "b | F", "b | M"]);
        assert_eq!(report.rows[0].reference_group.to_string(), "a | F");
        assert_eq!(report.rows[1].risk_ratio, 0.0);
        assert_eq!(report.rows[1].interpretation, RiskInterpretation::Underrepresentation);
    }

    #[test]
    fn test_rows_for_label() {
        let report = risk_ratio_multilabel(&approvals(), "group", &["approved"]).unwrap();
        assert_eq!(report.rows_for_label("approved").count(), 2);
        assert_eq!(report.rows_for_label("other").count(), 0);
    }
}
