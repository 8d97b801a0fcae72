//! Group derivation
//!
//! Groups are computed from observed values only and kept in a sorted map,
//! so iteration order is deterministic and exhaustive over what was seen.

use crate::constants::INTERSECTION_SEPARATOR;
use crate::domain::dataset::{Dataset, Value};
use crate::domain::error::{FairnessError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Group identifier
///
/// Intersection groups keep both components; the `" | "` encoding is only
/// produced when the key is displayed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupId {
    Single(Value),
    Intersection(Value, Value),
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(v) => write!(f, "{}", v),
            Self::Intersection(a, b) => write!(f, "{}{}{}", a, INTERSECTION_SEPARATOR, b),
        }
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Single(v) => v.serialize(serializer),
            Self::Intersection(..) => serializer.collect_str(self),
        }
    }
}

/// Partition of row indices by group
#[derive(Clone, Debug)]
pub struct Groups {
    members: BTreeMap<GroupId, Vec<usize>>,
    total: usize,
}

impl Groups {
    /// Group rows by a single sensitive attribute
    pub fn by_attribute(dataset: &Dataset, attribute: &str) -> Result<Self> {
        let column = dataset.column(attribute)?;
        Self::from_keys(column.iter().map(|v| GroupId::Single(v.clone())))
    }

    /// Group rows by the pair of two sensitive attributes
    pub fn by_intersection(dataset: &Dataset, first: &str, second: &str) -> Result<Self> {
        let a = dataset.column(first)?;
        let b = dataset.column(second)?;
        Self::from_keys(
            a.iter()
                .zip(b)
                .map(|(x, y)| GroupId::Intersection(x.clone(), y.clone())),
        )
    }

    fn from_keys(keys: impl Iterator<Item = GroupId>) -> Result<Self> {
        let mut members: BTreeMap<GroupId, Vec<usize>> = BTreeMap::new();
        let mut total = 0;
        for (row, key) in keys.enumerate() {
            members.entry(key).or_default().push(row);
            total += 1;
        }

        if total == 0 {
            return Err(FairnessError::DegenerateInput(
                "dataset has no rows".to_string(),
            ));
        }

        Ok(Self { members, total })
    }

    /// Number of distinct groups
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; construction rejects empty datasets
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total number of rows across all groups
    pub fn total(&self) -> usize {
        self.total
    }

    /// Groups and their row indices, ascending by group
    pub fn iter(&self) -> impl Iterator<Item = (&GroupId, &[usize])> {
        self.members.iter().map(|(k, rows)| (k, rows.as_slice()))
    }

    /// Groups and their sizes, ascending by group
    pub fn counts(&self) -> impl Iterator<Item = (&GroupId, usize)> {
        self.members.iter().map(|(k, rows)| (k, rows.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new()
            .with_column("race", vec!["b", "a", "b", "c", "a", "b"])
            .unwrap()
            .with_column("sex", vec!["F", "M", "M", "F", "M", "F"])
            .unwrap()
    }

    #[test]
    fn test_by_attribute_sorted_counts() {
        let groups = Groups::by_attribute(&sample(), "race").unwrap();
        let counts: Vec<(String, usize)> = groups
            .counts()
            .map(|(g, n)| (g.to_string(), n))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 3),
                ("c".to_string(), 1)
            ]
        );
        assert_eq!(groups.total(), 6);
    }

    #[test]
    fn test_by_intersection_only_observed() {
        let groups = Groups::by_intersection(&sample(), "race", "sex").unwrap();
        let names: Vec<String> = groups.iter().map(|(g, _)| g.to_string()).collect();

        // "a | F" and "c | M" never occur
        assert_eq!(names, vec!["a | M", "b | F", "b | M", "c | F"]);
    }

    #[test]
    fn test_rows_are_preserved() {
        let groups = Groups::by_attribute(&sample(), "race").unwrap();
        let (_, rows) = groups.iter().next().unwrap();
        assert_eq!(rows, &[1, 4]);
    }

    #[test]
    fn test_empty_dataset_is_degenerate() {
        let ds = Dataset::new()
            .with_column("race", Vec::<&str>::new())
            .unwrap();
        assert!(matches!(
            Groups::by_attribute(&ds, "race"),
            Err(FairnessError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_missing_attribute() {
        assert_eq!(
            Groups::by_intersection(&sample(), "race", "age").unwrap_err(),
            FairnessError::InvalidColumn("age".to_string())
        );
    }

    #[test]
    fn test_group_id_serializes_as_display() {
        let id = GroupId::Intersection(Value::from("a"), Value::Int(3));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a | 3\"");

        let id = GroupId::Single(Value::Int(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
