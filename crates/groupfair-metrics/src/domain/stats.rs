//! Numeric helpers: rounding, prevalence and Jensen-Shannon distance

use crate::domain::error::{FairnessError, Result, UndefinedRatio};

/// Round to `decimals` places, ties to even
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Mean of a 0/1 label over the given rows
///
/// `rows` must be non-empty; groups never are.
#[inline]
pub fn prevalence(label: &[u8], rows: &[usize]) -> f64 {
    let positives: usize = rows.iter().map(|&r| label[r] as usize).sum();
    positives as f64 / rows.len() as f64
}

/// Normalize a non-negative vector to sum to 1
///
/// Returns `None` when the vector carries no mass.
pub fn normalize(weights: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|w| w / sum).collect())
}

/// Jensen-Shannon distance (base 2) between two discrete distributions
///
/// Both inputs are normalized first. The result is the square root of the
/// JS divergence and lies in [0, 1]. Zero entries contribute nothing
/// (0 * log 0 = 0).
pub fn jensen_shannon_distance(p: &[f64], q: &[f64]) -> Result<f64> {
    if p.len() != q.len() {
        return Err(FairnessError::DegenerateInput(format!(
            "distribution lengths differ ({} vs {})",
            p.len(),
            q.len()
        )));
    }
    if p.len() < 2 {
        return Err(FairnessError::DegenerateInput(
            "distributions need at least 2 outcomes".to_string(),
        ));
    }
    if p.iter().chain(q).any(|w| !w.is_finite() || *w < 0.0) {
        return Err(FairnessError::DegenerateInput(
            "distribution weights must be finite and non-negative".to_string(),
        ));
    }

    let p = normalize(p).ok_or(UndefinedRatio::ZeroPopulationMass)?;
    let q = normalize(q).ok_or(UndefinedRatio::ZeroPopulationMass)?;

    let mut divergence = 0.0;
    for (&pi, &qi) in p.iter().zip(&q) {
        let mi = (pi + qi) / 2.0;
        divergence += relative_entropy(pi, mi) + relative_entropy(qi, mi);
    }
    divergence /= 2.0 * std::f64::consts::LN_2;

    Ok(divergence.max(0.0).sqrt())
}

#[inline]
fn relative_entropy(x: f64, m: f64) -> f64 {
    if x > 0.0 { x * (x / m).ln() } else { 0.0 }
}
