//! CLI entry point for the data cleaner.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use struqtura_cleaner::reporting::{ReportGenerator, ReportParams, SummaryReport};
use struqtura_cleaner::{
    CLEANED_FILE_NAME, CleaningConfig, CleaningOutcome, CleaningRequest, CleaningWorkflow, ColumnDescription,
    FillRule, MissingValueStrategy, TableFormat, preview, write_csv,
};
use tracing::{info, warn};

/// CLI-compatible missing value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Fill numeric gaps with the column mean
    Mean,
    /// Fill numeric gaps with the column median
    Median,
    /// Fill numeric gaps with the most frequent value
    #[value(name = "most_frequent")]
    MostFrequent,
}

impl From<CliStrategy> for MissingValueStrategy {
    fn from(cli: CliStrategy) -> Self {
        match cli {
            CliStrategy::Mean => MissingValueStrategy::Mean,
            CliStrategy::Median => MissingValueStrategy::Median,
            CliStrategy::MostFrequent => MissingValueStrategy::MostFrequent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Struqtura Team",
    version,
    about = "Clean tabular data: impute missing values and drop duplicate rows",
    long_about = "Loads a CSV, XLSX, JSON, Parquet, XML or SQLite file, fills missing values \
                  and writes the cleaned table as CSV.\n\n\
                  Numeric columns are filled with the chosen strategy; text columns always \
                  use their most frequent value. SQLite files are read from the table \
                  named main_table.\n\n\
                  EXAMPLES:\n  \
                  # Mean imputation, duplicates removed\n  \
                  struqtura-cleaner -i data.csv\n\n  \
                  # Median imputation, keep duplicate rows\n  \
                  struqtura-cleaner -i data.xlsx --strategy median --keep-duplicates\n\n  \
                  # Machine-readable report\n  \
                  struqtura-cleaner -i data.json --json"
)]
struct Args {
    /// Path to the file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Input format (csv, xlsx, json, parquet, xml, sqlite)
    ///
    /// If not specified, the format is inferred from the file extension
    #[arg(long)]
    format: Option<String>,

    /// Strategy for imputing missing numeric values
    #[arg(long, value_enum, default_value = "mean")]
    strategy: CliStrategy,

    /// Keep duplicate rows instead of removing them
    #[arg(long)]
    keep_duplicates: bool,

    /// JSON file with a cleaning configuration
    ///
    /// Overrides --strategy and --keep-duplicates, e.g.
    /// {"missing_value_strategy": "median", "remove_duplicates": false}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of cleaned rows to preview
    #[arg(long, default_value = "10")]
    preview: usize,

    /// Print descriptive statistics of the cleaned table
    #[arg(long)]
    describe: bool,

    /// Write the missing-value mask of the input to <input_name>_missing_mask.json
    #[arg(long)]
    mask: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (disabled if --json is set)
    init_logging(&args.log_level, args.quiet, args.json);

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(&args.input)
        .to_string();

    let mut request = CleaningRequest::new(file_name, std::fs::read(input)?).with_config(config);
    if let Some(ref format) = args.format {
        request = request.with_format(format.parse::<TableFormat>()?);
    }

    let outcome = CleaningWorkflow::run(request)?;
    if outcome.cleaned.height() == 0 {
        warn!("Cleaned table has no rows");
    }

    let output_dir = PathBuf::from(&args.output);
    let output_path = write_csv(&outcome.cleaned, &output_dir, CLEANED_FILE_NAME)?;

    let input_stem = extract_file_stem(&args.input);
    let generator = ReportGenerator::new(&output_dir);

    if args.mask {
        let mask_path = generator.write_mask_to_file(&outcome.missing_mask, &input_stem)?;
        info!("Missing mask written to: {}", mask_path.display());
    }

    let output_file = output_path.display().to_string();
    let missing_after = outcome
        .cleaned
        .get_columns()
        .iter()
        .map(|column| column.null_count())
        .sum();
    let report = ReportGenerator::build_summary_report(ReportParams {
        input_file: &args.input,
        input_format: outcome.format.name(),
        output_file: Some(&output_file),
        original_shape: outcome.original.shape(),
        cleaned_shape: outcome.cleaned.shape(),
        original_mask: &outcome.missing_mask,
        missing_after,
        report: &outcome.report,
        descriptions: &outcome.descriptions,
    });

    // Handle JSON output to stdout
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &outcome, &args);

    Ok(())
}

/// A `--config` file wins over the individual flags.
fn build_config(args: &Args) -> Result<CleaningConfig> {
    if let Some(ref path) = args.config {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Could not read config file {}: {}", path.display(), e))?;
        return Ok(CleaningConfig::from_json(&json)?);
    }

    Ok(CleaningConfig::builder()
        .missing_value_strategy(args.strategy.into())
        .remove_duplicates(!args.keep_duplicates)
        .build()?)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn format_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

/// Print a human-readable summary of the cleaning results.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(report: &SummaryReport, outcome: &CleaningOutcome, args: &Args) {
    let cleaning = &report.cleaning;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({}, {} rows x {} columns)",
        report.input_file, report.input_format, report.original_shape.0, report.original_shape.1
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        report.output_file.as_deref().unwrap_or(CLEANED_FILE_NAME),
        report.cleaned_shape.0,
        report.cleaned_shape.1
    );
    println!();

    println!("Cleaning Summary:");
    println!("  Strategy: {}", cleaning.strategy);
    println!(
        "  Rows: {} -> {} ({} duplicates removed)",
        cleaning.rows_before, cleaning.rows_after, cleaning.duplicates_removed
    );
    println!(
        "  Missing cells: {} -> {} ({} filled)",
        report.missing_before,
        report.missing_after,
        cleaning.total_filled()
    );
    println!();

    // Per-column fills
    let touched: Vec<_> = cleaning
        .columns
        .iter()
        .filter(|column| column.rule != FillRule::Untouched)
        .collect();
    if !touched.is_empty() {
        println!("Columns:");
        println!(
            "  {:<20} {:<12} {:<16} {:<8} {:<15}",
            "Column", "Kind", "Rule", "Filled", "Value"
        );
        println!("  {}", "-".repeat(70));
        for column in touched {
            println!(
                "  {:<20} {:<12} {:<16} {:<8} {:<15}",
                truncate_str(&column.name, 19),
                format!("{:?}", column.kind).to_lowercase(),
                column.rule.display_name(),
                column.filled,
                truncate_str(column.fill_value.as_deref().unwrap_or("-"), 15)
            );
        }
        println!();
    }

    if args.mask && report.missing_before > 0 {
        println!("Missing Values (input, '#' = missing):");
        println!("{}", outcome.missing_mask.render_text(args.preview));
        println!();
    }

    if args.describe {
        println!("Descriptive Statistics:");
        for description in &report.descriptions {
            match description {
                ColumnDescription::Numeric {
                    name,
                    count,
                    mean,
                    std,
                    min,
                    median,
                    max,
                    ..
                } => println!(
                    "  {:<20} count={} mean={} std={} min={} median={} max={}",
                    truncate_str(name, 19),
                    count,
                    format_stat(*mean),
                    format_stat(*std),
                    format_stat(*min),
                    format_stat(*median),
                    format_stat(*max)
                ),
                ColumnDescription::Categorical {
                    name,
                    count,
                    unique,
                    top,
                    freq,
                } => println!(
                    "  {:<20} count={} unique={} top={} freq={}",
                    truncate_str(name, 19),
                    count,
                    unique,
                    top.as_deref().unwrap_or("-"),
                    freq.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string())
                ),
            }
        }
        println!();
    }

    if args.preview > 0 {
        println!("Preview (first {} rows):", args.preview);
        println!("{}", preview(&outcome.cleaned, args.preview));
        println!();
    }

    // Hints for more output options
    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
