//! In-memory tabular dataset
//!
//! A dataset is a set of equally sized, named columns of discrete values.
//! Metric functions only ever borrow it; derived columns are never written back.

use crate::domain::error::{FairnessError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete cell value
///
/// Values are totally ordered so that groups come out sorted by attribute value.
/// Mixed-type columns order by variant first (`Bool < Int < Text`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    /// Interpret the value as a binary label
    pub fn as_binary(&self) -> Option<u8> {
        match self {
            Self::Bool(b) => Some(u8::from(*b)),
            Self::Int(0) => Some(0),
            Self::Int(1) => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Named columns of equal length
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    index: FxHashMap<String, usize>,
    num_rows: usize,
}

impl Dataset {
    /// Create an empty dataset (no columns, no rows)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn with_column<V>(mut self, name: &str, values: Vec<V>) -> Result<Self>
    where
        V: Into<Value>,
    {
        self.push_column(name, values.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Append a column in place
    pub fn push_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(FairnessError::DuplicateColumn(name.to_string()));
        }
        if !self.columns.is_empty() && values.len() != self.num_rows {
            return Err(FairnessError::RaggedColumn {
                column: name.to_string(),
                expected: self.num_rows,
                found: values.len(),
            });
        }

        self.num_rows = values.len();
        self.index.insert(name.to_string(), self.columns.len());
        self.names.push(name.to_string());
        self.columns.push(values);
        Ok(())
    }

    /// Number of records
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&[Value]> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].as_slice())
            .ok_or_else(|| FairnessError::InvalidColumn(name.to_string()))
    }

    /// Read a label column as 0/1 values
    pub fn binary_column(&self, name: &str) -> Result<Vec<u8>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.as_binary().ok_or_else(|| FairnessError::NonBinaryLabel {
                    column: name.to_string(),
                    row,
                    value: value.to_string(),
                })
            })
            .collect()
    }
}
