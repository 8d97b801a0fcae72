//! Error types shared by every metric computation

use thiserror::Error;

/// Errors raised by dataset access and metric computation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FairnessError {
    /// A requested attribute or label column does not exist
    #[error("column '{0}' not found in dataset")]
    InvalidColumn(String),
    /// A label column holds something other than 0/1
    #[error("label column '{column}' holds non-binary value '{value}' at row {row}")]
    NonBinaryLabel {
        column: String,
        row: usize,
        value: String,
    },
    /// Column length differs from the rest of the dataset
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },
    /// Column name declared twice
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    /// Input too small or malformed for the requested metric
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
    /// Division by a zero denominator
    #[error("undefined ratio: {0}")]
    UndefinedRatio(UndefinedRatio),
}

/// Zero-denominator conditions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndefinedRatio {
    /// No group has a positive observation for the label
    #[error("zero reference prevalence for label '{label}'")]
    ZeroReferencePrevalence { label: String },
    /// Population label vector sums to zero
    #[error("labels have zero population prevalence, divergence undefined")]
    ZeroPopulationMass,
    /// Group label vector sums to zero
    #[error("group '{group}' has zero label prevalence, divergence undefined")]
    ZeroGroupMass { group: String },
}

impl From<UndefinedRatio> for FairnessError {
    fn from(e: UndefinedRatio) -> Self {
        Self::UndefinedRatio(e)
    }
}

pub type Result<T> = std::result::Result<T, FairnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_ratio_message() {
        let err: FairnessError = UndefinedRatio::ZeroReferencePrevalence {
            label: "approved".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "undefined ratio: zero reference prevalence for label 'approved'"
        );
    }

    #[test]
    fn test_invalid_column_message() {
        let err = FairnessError::InvalidColumn("age".to_string());
        assert_eq!(err.to_string(), "column 'age' not found in dataset");
    }
}
