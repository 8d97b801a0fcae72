//! Representation metrics
//!
//! Per-group sample counts, representation rates, disparate impact ratio (DIR)
//! and generalised disparate impact (GDI) for one sensitive attribute.

use crate::constants::{
    COL_DIR, COL_DIR_INTERPRETATION, COL_GDI, COL_GDI_INTERPRETATION, COL_REPRESENTATION_RATE,
    COL_SAMPLES, REPRESENTATION_DECIMALS,
};
use crate::domain::dataset::Dataset;
use crate::domain::error::Result;
use crate::domain::grouping::{GroupId, Groups};
use crate::domain::interpretation::{DIR_RULES, DirInterpretation, GDI_RULES, GdiInterpretation};
use crate::domain::report::{TabularReport, format_number};
use crate::domain::stats::round_to;
use serde::Serialize;
use tracing::debug;

/// One group's representation metrics
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepresentationRow {
    pub group: GroupId,
    pub samples: usize,
    /// Share of all samples, in percent
    pub representation_rate: f64,
    /// Share relative to the largest group's share
    pub disparate_impact_ratio: f64,
    pub dir_interpretation: DirInterpretation,
    /// Share relative to the uniform share 1/groups
    pub generalised_di_ratio: f64,
    pub gdi_interpretation: GdiInterpretation,
}

/// Representation metrics for every observed value of an attribute
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepresentationReport {
    pub attribute: String,
    pub rows: Vec<RepresentationRow>,
}

/// Compute representation metrics for `attribute`
///
/// Rows are ordered by attribute value ascending. The largest group always
/// has DIR 1; a single-group dataset has DIR = GDI = 1.
pub fn data_representation_fairness(
    dataset: &Dataset,
    attribute: &str,
) -> Result<RepresentationReport> {
    let groups = Groups::by_attribute(dataset, attribute)?;
    let total = groups.total() as f64;
    let max_count = groups.counts().map(|(_, n)| n).max().unwrap_or(0) as f64;
    let expected = 1.0 / groups.len() as f64;

    let rows: Vec<RepresentationRow> = groups
        .counts()
        .map(|(group, samples)| {
            let proportion = samples as f64 / total;
            let max_proportion = max_count / total;

            let dir = round_to(proportion / max_proportion, REPRESENTATION_DECIMALS);
            let gdi = round_to(proportion / expected, REPRESENTATION_DECIMALS);

            RepresentationRow {
                group: group.clone(),
                samples,
                representation_rate: round_to(proportion * 100.0, REPRESENTATION_DECIMALS),
                disparate_impact_ratio: dir,
                dir_interpretation: DIR_RULES.classify(dir),
                generalised_di_ratio: gdi,
                gdi_interpretation: GDI_RULES.classify(gdi),
            }
        })
        .collect();

    debug!(
        attribute,
        groups = rows.len(),
        samples = groups.total(),
        "computed representation metrics"
    );

    Ok(RepresentationReport {
        attribute: attribute.to_string(),
        rows,
    })
}

impl TabularReport for RepresentationReport {
    fn column_names(&self) -> Vec<String> {
        [
            self.attribute.as_str(),
            COL_SAMPLES,
            COL_REPRESENTATION_RATE,
            COL_DIR,
            COL_DIR_INTERPRETATION,
            COL_GDI,
            COL_GDI_INTERPRETATION,
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
                    r.group.to_string(),
                    r.samples.to_string(),
                    format_number(r.representation_rate),
                    format_number(r.disparate_impact_ratio),
                    r.dir_interpretation.to_string(),
                    format_number(r.generalised_di_ratio),
                    r.gdi_interpretation.to_string(),
                ]
            })
            .collect()
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }
}
