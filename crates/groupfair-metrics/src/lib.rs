//! groupfair-metrics - Group-fairness diagnostics for labeled datasets
//!
//! This crate provides functionality to:
//! - Measure how groups of a sensitive attribute are represented (DIR / GDI)
//! - Compare label prevalence across groups with multi-label risk ratios
//! - Find intersectional coverage gaps across two attributes
//! - Measure how far each group's label distribution is from the population
//!   (Jensen-Shannon distance)
//!
//! Every metric borrows the dataset immutably and returns a fresh report.

pub mod app;
pub mod constants;
pub mod domain;
pub mod infra;

// Re-export commonly used types
pub use app::audit::{AuditOptions, AuditReport, Metric, run_audit};
pub use app::coverage::{CoverageReport, CoverageRow, coverage_gap_intersectional};
pub use app::divergence::{
    GroupDivergenceReport, GroupDivergenceRow, LabelDivergenceReport, LabelDivergenceRow,
    js_divergence_by_group, js_divergence_by_label_and_group,
};
pub use app::representation::{
    RepresentationReport, RepresentationRow, data_representation_fairness,
};
pub use app::risk_ratio::{
    RiskRatioReport, RiskRatioRow, risk_ratio_multilabel, risk_ratio_multilabel_intersectional,
};
pub use domain::dataset::{Dataset, Value};
pub use domain::error::{FairnessError, UndefinedRatio};
pub use domain::grouping::GroupId;
pub use domain::report::TabularReport;
