//! Dataset file I/O operations
//!
//! Datasets are read from JSON: an array of flat records, every record with
//! the same keys. Cell values must be discrete (string, bool, integer, or a
//! float with no fractional part).

use crate::domain::dataset::{Dataset, Value};
use crate::domain::error::FairnessError;
use serde_json::{Map, Value as JsonValue};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Dataset loading errors
#[derive(Debug, Error)]
pub enum DatasetIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset must be a JSON array of objects")]
    NotAnArray,
    #[error("record {row} is not a JSON object")]
    NotAnObject { row: usize },
    #[error("record {row} has no fields")]
    EmptyRecord { row: usize },
    #[error("record {row} has keys that differ from record 0")]
    KeyMismatch { row: usize },
    #[error("record {row}, column '{column}': {reason}")]
    InvalidCell {
        row: usize,
        column: String,
        reason: String,
    },
    #[error(transparent)]
    Dataset(#[from] FairnessError),
}

/// Load a dataset from a JSON file
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DatasetIoError> {
    let file = File::open(path)?;
    read_dataset(BufReader::new(file))
}

/// Read a dataset from any JSON source
pub fn read_dataset(reader: impl Read) -> Result<Dataset, DatasetIoError> {
    let json: JsonValue = serde_json::from_reader(reader)?;
    dataset_from_json(json)
}

/// Parse a dataset from a JSON string
pub fn parse_dataset(text: &str) -> Result<Dataset, DatasetIoError> {
    let json: JsonValue = serde_json::from_str(text)?;
    dataset_from_json(json)
}

fn dataset_from_json(json: JsonValue) -> Result<Dataset, DatasetIoError> {
    let JsonValue::Array(records) = json else {
        return Err(DatasetIoError::NotAnArray);
    };

    let records: Vec<Map<String, JsonValue>> = records
        .into_iter()
        .enumerate()
        .map(|(row, record)| match record {
            JsonValue::Object(map) => Ok(map),
            _ => Err(DatasetIoError::NotAnObject { row }),
        })
        .collect::<Result<_, _>>()?;

    let Some(first) = records.first() else {
        return Ok(Dataset::new());
    };
    if first.is_empty() {
        return Err(DatasetIoError::EmptyRecord { row: 0 });
    }
    let names: Vec<String> = first.keys().cloned().collect();

    for (row, record) in records.iter().enumerate().skip(1) {
        if record.len() != names.len() || !names.iter().all(|k| record.contains_key(k)) {
            return Err(DatasetIoError::KeyMismatch { row });
        }
    }

    let mut dataset = Dataset::new();
    for name in &names {
        let column = records
            .iter()
            .enumerate()
            .map(|(row, record)| to_value(&record[name]).map_err(|reason| {
                DatasetIoError::InvalidCell {
                    row,
                    column: name.clone(),
                    reason,
                }
            }))
            .collect::<Result<Vec<_>, _>>()?;
        dataset.push_column(name, column)?;
    }

    Ok(dataset)
}

fn to_value(json: &JsonValue) -> Result<Value, String> {
    match json {
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Int(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::Int(f as i64)),
                _ => Err(format!("non-discrete number {}", n)),
            }
        }
        JsonValue::Null => Err("missing value".to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => Err("nested value".to_string()),
    }
}
