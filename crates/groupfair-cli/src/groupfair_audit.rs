//! Group-fairness audit CLI
//!
//! Usage: groupfair_audit <DATASET> --attribute <COL>... [--label <COL>...] [options]
//!
//! The dataset is a JSON array of flat records.
//!
//! Example:
//!   groupfair_audit applicants.json --attribute race --attribute sex \
//!       --label approved --label hired --intersect race sex
//!   groupfair_audit applicants.json --attribute race --label approved \
//!       --metric risk-ratio --format json --output reports/race.json

use clap::{ArgAction, Parser, ValueEnum};
use groupfair_metrics::app::audit::AuditReport;
use groupfair_metrics::infra::dataset_io::load_dataset;
use groupfair_metrics::infra::report_io::{ReportFormat, render_text, save_report, to_json};
use groupfair_metrics::{AuditOptions, Dataset, Metric, TabularReport, run_audit};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Group-fairness diagnostics over a labeled dataset
#[derive(Parser, Debug)]
#[command(name = "groupfair_audit", version, about, long_about = None)]
struct Cli {
    /// Dataset file (JSON array of records)
    dataset: PathBuf,

    /// Sensitive attribute column (repeatable)
    #[arg(short, long = "attribute")]
    attributes: Vec<String>,

    /// Binary label column (repeatable)
    #[arg(short, long = "label")]
    labels: Vec<String>,

    /// Two attributes to combine for intersectional metrics
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    intersect: Option<Vec<String>>,

    /// Metric to compute
    #[arg(short, long, value_enum, default_value_t = MetricArg::All)]
    metric: MetricArg,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MetricArg {
    Representation,
    RiskRatio,
    Coverage,
    Divergence,
    DivergenceByLabel,
    All,
}

impl MetricArg {
    /// Explicit selection; `None` lets the audit run whatever applies
    fn metric(self) -> Option<Metric> {
        match self {
            Self::Representation => Some(Metric::Representation),
            Self::RiskRatio => Some(Metric::RiskRatio),
            Self::Coverage => Some(Metric::Coverage),
            Self::Divergence => Some(Metric::Divergence),
            Self::DivergenceByLabel => Some(Metric::DivergenceByLabel),
            Self::All => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_options(cli: &Cli) -> Result<AuditOptions, String> {
    let mut options = AuditOptions::default();
    if let Some(metric) = cli.metric.metric() {
        options = options.with_metrics(&[metric]);
    }
    for attribute in &cli.attributes {
        options = options.with_attribute(attribute);
    }
    for label in &cli.labels {
        options = options.with_label(label);
    }

    if let Some(pair) = &cli.intersect {
        if let [first, second] = pair.as_slice() {
            options = options.with_intersection(first, second);
        } else {
            return Err("--intersect requires exactly two columns".to_string());
        }
    } else if cli.metric == MetricArg::Coverage {
        return Err("--metric coverage requires --intersect FIRST SECOND".to_string());
    }

    Ok(options)
}

/// Every table of an audit, titled, in a stable order
fn audit_tables(report: &AuditReport) -> Vec<(String, &dyn TabularReport)> {
    let mut tables: Vec<(String, &dyn TabularReport)> = Vec::new();

    for audit in &report.attributes {
        let name = &audit.attribute;
        if let Some(r) = &audit.representation {
            tables.push((format!("Representation: {}", name), r));
        }
        if let Some(r) = &audit.risk_ratio {
            tables.push((format!("Risk ratios: {}", name), r));
        }
        if let Some(r) = &audit.divergence {
            tables.push((format!("JS divergence: {}", name), r));
        }
        if let Some(r) = &audit.divergence_by_label {
            tables.push((format!("JS divergence by label: {}", name), r));
        }
    }

    if let Some(inter) = &report.intersection {
        let name = format!("{} x {}", inter.first, inter.second);
        if let Some(r) = &inter.coverage {
            tables.push((format!("Coverage gap: {}", name), r));
        }
        if let Some(r) = &inter.risk_ratio {
            tables.push((format!("Risk ratios: {}", name), r));
        }
    }

    tables
}

fn render_report(report: &AuditReport, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Json => to_json(report).map_err(|e| format!("JSON encoding failed: {}", e)),
        ReportFormat::Text => {
            let mut out = format!("Samples: {}\n", report.samples);
            for (title, table) in audit_tables(report) {
                out.push('\n');
                out.push_str(&format!("[{}]\n", title));
                out.push_str(&render_text(table));
            }
            Ok(out)
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = build_options(cli)?;

    let start = Instant::now();
    let dataset: Dataset = load_dataset(&cli.dataset)
        .map_err(|e| format!("Failed to load '{}': {}", cli.dataset.display(), e))?;
    info!(
        path = %cli.dataset.display(),
        rows = dataset.num_rows(),
        columns = dataset.column_names().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded dataset"
    );

    let report = run_audit(&dataset, &options).map_err(|e| e.to_string())?;
    let rendered = render_report(&report, cli.format.into())?;

    match &cli.output {
        Some(path) => {
            save_report(path, &rendered)
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
