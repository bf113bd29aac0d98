use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use burden_cli::report::{self, OutputFormat, ReportEntry};
use burden_cli::logging::{self, LogSettings};
use burden_cli::{config, csv_loader};
use burden_core::{CalculationInput, CalculationResult, TaxCalculator, parse_form};
use clap::{Parser, Subcommand};
use tracing::info;

/// Compute the tax burden report for a business on the AUSN scheme.
///
/// Inputs come from a TOML file, from `name=value` form fields, or from a
/// CSV file with one report per row.
#[derive(Parser, Debug)]
#[command(name = "burden")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file overriding the default rates
    #[arg(short, long, global = true)]
    rates: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Log filter (e.g. "debug" or "burden_core=debug"); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Suppress log output on stderr (a --log-file still receives it)
    #[arg(short, long, default_value_t = false, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one report from a TOML input file
    Calc {
        /// Path to the TOML file holding the input fields
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Compute one report from raw form fields
    Form {
        /// Field as name=value, e.g. --field "turnover_total=1 000 000"
        #[arg(short = 'F', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Compute one report per row of a CSV file
    Batch {
        /// Path to the CSV file; the header row names the input fields
        #[arg(short = 'i', long)]
        file: PathBuf,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Calc { .. } => "calc",
            Command::Form { .. } => "form",
            Command::Batch { .. } => "batch",
        }
    }
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{s}'"))
}

fn log_settings(cli: &Cli) -> LogSettings {
    LogSettings {
        level: cli.log_level.clone(),
        file: cli.log_file.clone(),
        quiet: cli.quiet,
    }
}

fn load_inputs(command: &Command) -> Result<Vec<CalculationInput>> {
    match command {
        Command::Calc { input } => Ok(vec![config::load_input(input)?]),
        Command::Form { fields } => {
            let fields: BTreeMap<String, String> = fields.iter().cloned().collect();
            let input = parse_form(&fields).context("Invalid form fields")?;
            Ok(vec![input])
        }
        Command::Batch { file } => csv_loader::load_from_file(file)
            .with_context(|| format!("Failed to load inputs from: {}", file.display())),
    }
}

fn print_reports(
    format: OutputFormat,
    batch: bool,
    reports: &[(CalculationInput, CalculationResult)],
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for (idx, (_, result)) in reports.iter().enumerate() {
                if batch {
                    println!("Row {}", idx + 1);
                }
                println!("{}", report::render_table(result));
            }
        }
        OutputFormat::Json => {
            let entries: Vec<ReportEntry<'_>> = reports
                .iter()
                .enumerate()
                .map(|(idx, (input, result))| ReportEntry {
                    row: batch.then_some(idx + 1),
                    input,
                    result,
                })
                .collect();
            println!("{}", report::render_json(&entries)?);
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let rates = config::load_rates(cli.rates.as_deref())?;
    let calculator = TaxCalculator::new(rates).context("Invalid rates")?;

    let inputs = load_inputs(&cli.command)?;
    info!(command = cli.command.name(), count = inputs.len(), "Computing reports");

    let reports: Vec<(CalculationInput, CalculationResult)> = inputs
        .into_iter()
        .map(|input| {
            let result = calculator.compute(&input);
            (input, result)
        })
        .collect();

    print_reports(
        cli.format,
        matches!(cli.command, Command::Batch { .. }),
        &reports,
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&log_settings(&cli))?;

    run(&cli).inspect_err(|error| logging::log_command_error(cli.command.name(), error))
}
