use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use perceptron_compare::config::{Config, ConfigOverrides};
use perceptron_compare::measurement::{parse_export_a, MeasurementTable};
use perceptron_compare::output::csv::{aggregates_to_csv, comparison_to_csv, measurement_to_tsv};
use perceptron_compare::output::json::render_json;
use perceptron_compare::output::table::{
    render_aggregate_table, render_comparison_table, render_match_table,
    render_measurement_table,
};
use perceptron_compare::output::xlsx::write_workbook;
use perceptron_compare::pipeline::{run_comparison, CompareOptions, ComparisonReport};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "perceptron-compare",
    about = "Point-by-point comparison of Perceptron measurement exports"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two Export Format A files point by point
    Compare {
        file_a: PathBuf,
        file_b: PathBuf,
        /// Write the multi-sheet workbook to this path
        #[arg(short, long)]
        export: Option<PathBuf>,
        /// Also print both filtered measurement tables
        #[arg(long)]
        full: bool,
        #[arg(long)]
        decimals: Option<u32>,
    },
    /// Parse a single export and show what was read
    Inspect { file: PathBuf },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;

    match &cli.command {
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
            Ok(())
        }
        Commands::Inspect { file } => {
            let bytes = fs::read(file)
                .with_context(|| format!("failed reading export: {}", file.display()))?;
            let table = parse_export_a(&bytes);
            print_measurement(&table, &config, cli.output)
        }
        Commands::Compare {
            file_a,
            file_b,
            export,
            full,
            decimals,
        } => {
            config.apply_overrides(ConfigOverrides {
                decimals: *decimals,
                export_path: export
                    .as_ref()
                    .map(|path| path.to_string_lossy().into_owned()),
            });

            let bytes_a = fs::read(file_a)
                .with_context(|| format!("failed reading export A: {}", file_a.display()))?;
            let bytes_b = fs::read(file_b)
                .with_context(|| format!("failed reading export B: {}", file_b.display()))?;

            let options = CompareOptions {
                decimals: config.precision.decimals,
            };
            let report = run_comparison(&bytes_a, &bytes_b, &options)?;

            print_report(&report, &config, cli.output, *full)?;

            if export.is_some() || config.export.write_by_default {
                let path = config.resolved_export_path();
                write_workbook(&report, &path)?;
                info!("workbook written to {}", path.display());
            }
            Ok(())
        }
    }
}

fn print_report(
    report: &ComparisonReport,
    config: &Config,
    format: OutputFormat,
    full: bool,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("Matched PSN ({}):", report.matched.len());
            println!("{}", render_match_table(&report.matched));
            println!(
                "\nComparison by point ({} vs {}):",
                report.job_a, report.job_b
            );
            println!("{}", render_comparison_table(report));
            println!("\nMean difference by axis:");
            println!(
                "{}",
                render_aggregate_table(&report.aggregates, report.decimals)
            );
            if full {
                let limit = config.display.preview_rows;
                println!("\nRear A ({}):", report.job_a);
                println!("{}", render_measurement_table(&report.table_a, limit));
                println!("\nRear B ({}):", report.job_b);
                println!("{}", render_measurement_table(&report.table_b, limit));
            }
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => {
            println!("{}", comparison_to_csv(&report.comparisons, report.decimals)?);
            println!("{}", aggregates_to_csv(&report.aggregates, report.decimals)?);
        }
    }
    Ok(())
}

fn print_measurement(
    table: &MeasurementTable,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "Job {} with {} rows and {} axes",
                table.job_id().unwrap_or("-"),
                table.rows.len(),
                table.axes.len()
            );
            println!(
                "{}",
                render_measurement_table(table, config.display.preview_rows)
            );
        }
        OutputFormat::Json => println!("{}", render_json(table)?),
        OutputFormat::Csv => println!("{}", measurement_to_tsv(table)?),
    }
    Ok(())
}
