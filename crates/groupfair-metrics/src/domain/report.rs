//! Tabular result contract
//!
//! Every metric returns a typed report; this trait exposes it as a
//! table with fixed column order for rendering and export.

/// A metric result viewed as a table
pub trait TabularReport {
    /// Column headers, in output order
    fn column_names(&self) -> Vec<String>;

    /// Rendered cells, one vector per row, aligned with `column_names`
    fn cells(&self) -> Vec<Vec<String>>;

    /// Number of rows
    fn num_rows(&self) -> usize {
        self.cells().len()
    }
}

/// Format a float the way result tables print it (shortest round-trip form)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(80.0), "80.0");
        assert_eq!(format_number(33.3333), "33.3333");
    }
}
