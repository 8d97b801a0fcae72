//! Application layer - Use case implementations
//!
//! Each module implements one metric component on top of the domain layer.

pub mod audit;
pub mod coverage;
pub mod divergence;
pub mod representation;
pub mod risk_ratio;
