//! Infrastructure layer - I/O and external dependencies
//!
//! This module handles dataset loading and report export.

pub mod dataset_io;
pub mod report_io;
