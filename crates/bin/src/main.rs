//! Albany CLI binary.
//!
//! Runs rolling factor regressions, rolling statistics and the Innovation
//! study on JSON inputs. Results go to stdout, logs to stderr.

mod config;
mod input;
mod render;

use albany::study::{StudyInput, StudyReport, run_study};
use albany_data::Panel;
use albany_output::{AnnualizedTable, SeriesSummary, rolling_result_json, summarize_result};
use albany_regression::{
    FactorSelection, FamaFrenchFactor, RollingRegression, correlation, rolling_annualized_stats,
    rolling_correlation,
};
use clap::{Parser, Subcommand};
use config::{Overrides, WindowTarget};
use render::OutputFormat;
use serde_json::json;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "albany")]
#[command(about = "Albany: rolling factor regressions and risk statistics", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `debug` or `albany_regression=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rolling alpha and betas of one panel column
    Regress {
        /// Panel JSON document (`-` for stdin)
        #[arg(long)]
        panel: PathBuf,

        /// Dependent column
        #[arg(long)]
        dependent: String,

        /// Window length in observations
        #[arg(long)]
        window: Option<usize>,

        /// Comma-separated factors, `all` or `none`
        #[arg(long)]
        factors: Option<FactorSelection>,

        /// Arbitrary regressor columns instead of factors
        #[arg(long, value_delimiter = ',', conflicts_with = "factors")]
        regressors: Option<Vec<String>>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Rolling annualized mean, volatility and Sharpe ratio of one column
    Stats {
        /// Panel JSON document (`-` for stdin)
        #[arg(long)]
        panel: PathBuf,

        /// Column to summarize
        #[arg(long)]
        column: String,

        /// Window length in observations
        #[arg(long)]
        window: Option<usize>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Full-sample and rolling correlation of two columns
    Correlate {
        /// Panel JSON document (`-` for stdin)
        #[arg(long)]
        panel: PathBuf,

        /// First column
        #[arg(long)]
        left: String,

        /// Second column
        #[arg(long)]
        right: String,

        /// Window length in observations
        #[arg(long)]
        window: Option<usize>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run the Innovation study
    Study {
        /// Study input JSON document (`-` for stdin)
        #[arg(long)]
        input: PathBuf,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List the factor universe
    Factors,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Regress {
            panel,
            dependent,
            window,
            factors,
            regressors,
            config: config_path,
            format,
        } => {
            let overrides = Overrides {
                window,
                target: WindowTarget::Regression,
                factors,
            };
            let config = overrides.apply(config::load(config_path.as_deref())?);
            let panel: Panel = input::read_json(&panel)?;
            info!(rows = panel.len(), columns = panel.column_names().len(), "loaded panel");

            let engine = RollingRegression::new(config.regression)?;
            let result = match &regressors {
                Some(columns) => {
                    let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                    engine.estimate_on(&panel, &dependent, &columns)?
                }
                None => engine.estimate(&panel, &dependent)?,
            };
            info!(
                records = result.len(),
                degenerate = result.degenerate_count(),
                "rolling regression finished"
            );

            match format {
                OutputFormat::Json => {
                    let title = format!("Rolling regression: {dependent}");
                    let report = render::report(&title, &rolling_result_json(&result))?;
                    render::print_report(&report)?;
                }
                text => {
                    println!("{}", text.table(&result));
                    println!("{}", text.table(summarize_result(&result)?.as_slice()));
                }
            }
        }
        Commands::Stats {
            panel,
            column,
            window,
            config: config_path,
            format,
        } => {
            let overrides = Overrides {
                window,
                target: WindowTarget::Stats,
                ..Default::default()
            };
            let config = overrides.apply(config::load(config_path.as_deref())?);
            let panel: Panel = input::read_json(&panel)?;
            let series = panel.series(&column)?;
            let records = rolling_annualized_stats(&series, &config.stats)?;

            match format {
                OutputFormat::Json => {
                    let title = format!("Rolling annualized statistics: {column}");
                    render::print_report(&render::report(&title, &records)?)?;
                }
                text => {
                    println!("{}", text.table(&AnnualizedTable::new(&column, &records)));
                    println!("{}", SeriesSummary::from_series(&series));
                }
            }
        }
        Commands::Correlate {
            panel,
            left,
            right,
            window,
            config: config_path,
            format,
        } => {
            let overrides = Overrides {
                window,
                target: WindowTarget::Correlation,
                ..Default::default()
            };
            let config = overrides.apply(config::load(config_path.as_deref())?);
            let panel: Panel = input::read_json(&panel)?;
            let (a, b) = (panel.series(&left)?, panel.series(&right)?);
            let full_sample = correlation(&a, &b);
            let rolling = rolling_correlation(&a, &b, config.correlation_window)?;

            match format {
                OutputFormat::Json => {
                    let contents = json!({
                        "left": left,
                        "right": right,
                        "window": config.correlation_window,
                        "correlation": full_sample,
                        "rolling": rolling,
                    });
                    let title = format!("Correlation: {left} vs {right}");
                    render::print_report(&render::report(&title, &contents)?)?;
                }
                text => {
                    println!(
                        "Full-sample correlation {left} vs {right}: {}",
                        albany_output::format_value(full_sample)
                    );
                    println!("{}", text.table(&rolling));
                }
            }
        }
        Commands::Study {
            input: input_path,
            config: config_path,
            format,
        } => {
            let config = config::load(config_path.as_deref())?;
            let study_input: StudyInput = input::read_json(&input_path)?;
            let report = run_study(&study_input, &config)?;

            match format {
                OutputFormat::Json => {
                    render::print_report(&render::report("Innovation study", &report)?)?;
                }
                text => print_study(&report, text)?,
            }
        }
        Commands::Factors => list_factors(),
    }

    Ok(())
}

fn init_logging(level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn print_study(report: &StudyReport, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    for regression in &report.regressions {
        println!("{}", regression.portfolio);
        println!("{}", format.table(&regression.result));
        println!("{}", format.table(summarize_result(&regression.result)?.as_slice()));
    }

    println!(
        "{}",
        format.table(&AnnualizedTable::new(
            albany::study::INNOVATION,
            &report.innovation_stats
        ))
    );

    if let Some(signals) = &report.macro_signals {
        let fmt = |c: Option<f64>| c.map_or_else(|| "n/a".to_string(), albany_output::format_value);
        println!("Innovation returns vs lagged VIX: {}", fmt(signals.return_vs_vix));
        println!(
            "Innovation returns vs term spread: {}",
            fmt(signals.return_vs_term_spread)
        );
        println!(
            "Months with an inverted curve: {}",
            signals.inverted_curve_dates.len()
        );
        for rolling in [&signals.volatility_vs_vix, &signals.volatility_vs_term_spread]
            .into_iter()
            .flatten()
        {
            println!("{}", SeriesSummary::from_series(rolling));
        }
    }
    Ok(())
}

fn list_factors() {
    println!("\nFactor   Description");
    println!("{}", "-".repeat(60));
    let defaults = FactorSelection::default();
    for factor in FamaFrenchFactor::ALL {
        let marker = if defaults.contains(factor) { " (default)" } else { "" };
        println!("{:<8} {}{}", factor.column_name(), factor.description(), marker);
    }
}
