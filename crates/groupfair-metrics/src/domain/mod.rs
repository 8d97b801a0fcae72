//! Domain layer - Pure computational logic
//!
//! This module contains the dataset model, grouping, statistics and
//! interpretation rules, without I/O dependencies.

pub mod dataset;
pub mod error;
pub mod grouping;
pub mod interpretation;
pub mod report;
pub mod stats;
