//! Fairness metric constants
//!
//! Note: interpretation thresholds live next to their bucket rules in domain/interpretation.rs.

// =============================================================================
// Rounding precision (decimal places)
// =============================================================================

/// Precision of representation rates, DIR and GDI
pub const REPRESENTATION_DECIMALS: i32 = 4;

/// Precision of per-group label prevalence
pub const PREVALENCE_DECIMALS: i32 = 4;

/// Precision of risk ratios
pub const RISK_RATIO_DECIMALS: i32 = 2;

/// Precision of coverage proportions (percent and fraction)
pub const COVERAGE_DECIMALS: i32 = 4;

/// Precision of Jensen-Shannon distances
pub const DIVERGENCE_DECIMALS: i32 = 4;

// =============================================================================
// Intersection groups
// =============================================================================

/// Separator placed between the two attribute values of an intersection group
pub const INTERSECTION_SEPARATOR: &str = " | ";

// =============================================================================
// Output column headers
// =============================================================================

pub const COL_SAMPLES: &str = "Samples";
pub const COL_REPRESENTATION_RATE: &str = "Representation rate, %";
pub const COL_DIR: &str = "Disparate impact ratio";
pub const COL_DIR_INTERPRETATION: &str = "DI interpretation";
pub const COL_GDI: &str = "Generalised DI ratio";
pub const COL_GDI_INTERPRETATION: &str = "GDI interpretation";

pub const COL_LABEL: &str = "Label";
pub const COL_ATTRIBUTE: &str = "Attribute";
pub const COL_PREVALENCE: &str = "Prevalence";
pub const COL_RISK_RATIO: &str = "Risk ratio";
pub const COL_REFERENCE_GROUP: &str = "Reference group";
pub const COL_INTERPRETATION: &str = "Interpretation";

pub const COL_INTERSECTION_GROUP: &str = "Intersection group";
pub const COL_PROPORTION: &str = "Proportion, %";
pub const COL_IDEAL_PROPORTION: &str = "Ideal proportion, %";
pub const COL_COVERAGE_GAP: &str = "Coverage Gap, samples";

pub const COL_JS_VALUE: &str = "JS_value";
