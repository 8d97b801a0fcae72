//! Report rendering and export
//!
//! Reports are rendered as aligned plain-text tables or serialized to JSON.

use crate::domain::report::TabularReport;
use comfy_table::{Cell, CellAlignment, Table, presets};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Output format of a rendered report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Render a report as a text table
///
/// Text columns are left-aligned, numeric columns right-aligned.
pub fn render_text(report: &dyn TabularReport) -> String {
    let headers = report.column_names();
    let rows = report.cells();

    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| !rows.is_empty() && rows.iter().all(|r| r[col].parse::<f64>().is_ok()))
        .collect();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(headers.iter().map(Cell::new).collect::<Vec<_>>());

    for row in &rows {
        table.add_row(
            row.iter()
                .zip(&numeric)
                .map(|(cell, &right)| {
                    let cell = Cell::new(cell);
                    if right {
                        cell.set_alignment(CellAlignment::Right)
                    } else {
                        cell
                    }
                })
                .collect::<Vec<_>>(),
        );
    }

    let mut out = table.to_string();
    out.push('\n');
    out
}

/// Serialize any report to pretty JSON
pub fn to_json<T: Serialize + ?Sized>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render a report in the given format
pub fn render<T>(report: &T, format: ReportFormat) -> io::Result<String>
where
    T: TabularReport + Serialize,
{
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => to_json(report).map_err(io::Error::other),
    }
}

/// Write rendered output to a file, creating parent directories
pub fn save_report(path: impl AsRef<Path>, contents: &str) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl TabularReport for Fixed {
        fn column_names(&self) -> Vec<String> {
            vec!["group".to_string(), "Samples".to_string()]
        }

        fn cells(&self) -> Vec<Vec<String>> {
            vec![
                vec!["A".to_string(), "80".to_string()],
                vec!["Bravo".to_string(), "5".to_string()],
            ]
        }
    }

    #[test]
    fn test_render_text_alignment() {
        let text = render_text(&Fixed);
        let lines: Vec<&str> = text.lines().collect();

        let header = lines.iter().find(|l| l.contains("group")).unwrap();
        assert!(header.contains("Samples"));

        // Numeric column is right-aligned: both values end at the same column
        let a = lines.iter().find(|l| l.contains(" A ")).unwrap();
        let bravo = lines.iter().find(|l| l.contains("Bravo")).unwrap();
        let a_end = a.find("80").unwrap() + 2;
        let bravo_end = bravo.find('5').unwrap() + 1;
        assert_eq!(a_end, bravo_end);

        // Text column is left-aligned: both values start at the same column
        assert_eq!(a.find('A'), bravo.find('B'));
    }

    #[test]
    fn test_render_text_empty_report() {
        struct Empty;

        impl TabularReport for Empty {
            fn column_names(&self) -> Vec<String> {
                vec!["Label".to_string()]
            }

            fn cells(&self) -> Vec<Vec<String>> {
                Vec::new()
            }
        }

        let text = render_text(&Empty);
        assert!(text.contains("Label"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("text".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_save_report_creates_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("report.txt");

        save_report(&path, "hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
