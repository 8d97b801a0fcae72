//! Intersectional coverage gap
//!
//! This module compares the observed size of every intersection group with
//! the size it would have under a uniform split across observed groups.

use crate::constants::{
    COL_COVERAGE_GAP, COL_IDEAL_PROPORTION, COL_INTERSECTION_GROUP, COL_PROPORTION, COL_SAMPLES,
    COVERAGE_DECIMALS,
};
use crate::domain::dataset::Dataset;
use crate::domain::error::Result;
use crate::domain::grouping::{GroupId, Groups};
use crate::domain::report::{TabularReport, format_number};
use crate::domain::stats::round_to;
use serde::Serialize;
use tracing::debug;

/// Coverage of one intersection group
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageRow {
    pub group: GroupId,
    pub samples: usize,
    /// Observed share, in percent
    pub proportion: f64,
    /// Uniform share over observed groups, in percent
    pub ideal_proportion: f64,
    /// Ideal minus observed share (fraction, not rendered)
    pub coverage_gap: f64,
    /// Samples missing (positive) or in excess (negative) versus the uniform split
    pub coverage_gap_samples: i64,
}

/// Coverage gaps of every observed intersection group
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageReport {
    pub first: String,
    pub second: String,
    pub total: usize,
    pub rows: Vec<CoverageRow>,
}

impl CoverageReport {
    /// Sum of per-group gaps in samples (zero up to rounding)
    pub fn gap_residual(&self) -> i64 {
        self.rows.iter().map(|r| r.coverage_gap_samples).sum()
    }
}

/// Compute coverage gaps for the intersection of `first` and `second`
///
/// Only observed combinations form groups, so the ideal share is
/// 1 / (number of observed combinations), not 1 / (|first| x |second|).
pub fn coverage_gap_intersectional(
    dataset: &Dataset,
    first: &str,
    second: &str,
) -> Result<CoverageReport> {
    let groups = Groups::by_intersection(dataset, first, second)?;
    let total = groups.total() as f64;
    let ideal = 1.0 / groups.len() as f64;

    let rows: Vec<CoverageRow> = groups
        .counts()
        .map(|(group, samples)| {
            let proportion = samples as f64 / total;
            let gap = ideal - proportion;
            CoverageRow {
                group: group.clone(),
                samples,
                proportion: round_to(proportion * 100.0, COVERAGE_DECIMALS),
                ideal_proportion: round_to(ideal * 100.0, COVERAGE_DECIMALS),
                coverage_gap: round_to(gap, COVERAGE_DECIMALS),
                coverage_gap_samples: (gap * total).round_ties_even() as i64,
            }
        })
        .collect();

    debug!(
        first,
        second,
        groups = rows.len(),
        samples = groups.total(),
        "computed coverage gaps"
    );

    Ok(CoverageReport {
        first: first.to_string(),
        second: second.to_string(),
        total: groups.total(),
        rows,
    })
}

impl TabularReport for CoverageReport {
    fn column_names(&self) -> Vec<String> {
        [
            COL_INTERSECTION_GROUP,
            COL_SAMPLES,
            COL_PROPORTION,
            COL_IDEAL_PROPORTION,
            COL_COVERAGE_GAP,
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
                    format_number(r.proportion),
                    format_number(r.ideal_proportion),
                    r.coverage_gap_samples.to_string(),
                ]
            })
            .collect()
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }
}
