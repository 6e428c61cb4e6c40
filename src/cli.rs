//! The command line interface for the estimator.
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{
    DataWriter, create_output_directory, get_output_dir, get_output_dir_for_name,
};
use crate::projection::ProjectionSeries;
use crate::settings::Settings;
use crate::table::{build_breakdown_table, build_projection_table, format_money};
use crate::tariff::TariffInputs;
use ::log::{debug, info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The name of the results folder when running with the default tariff
const DEFAULTS_RUN_NAME: &str = "uk_defaults";

/// The command line interface for the estimator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Estimate and project costs for a tariff.
    Run {
        /// Path to the tariff file. Typical UK business rates are used if omitted.
        tariff_path: Option<PathBuf>,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example tariffs.
    Example {
        /// The available subcommands for managing example tariffs.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a tariff file.
    Validate {
        /// The path to the tariff file.
        tariff_path: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { tariff_path, opts } => {
                handle_run_command(tariff_path.as_deref(), &opts, None)
            }
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { tariff_path } => handle_validate_command(&tariff_path, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and dispatch to the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    match cli.command {
        Some(command) => command.execute(),
        None => {
            println!("{}", Cli::command().render_long_help());
            Ok(())
        }
    }
}

/// Log a summary of the projection
fn log_projection(series: &ProjectionSeries, inputs: &TariffInputs) {
    let base = series.base();
    info!(
        "Year 1: energy {}, standing charge {}, VAT {}, total {} ({:.2} p/kWh)",
        format_money(base.energy_subtotal),
        format_money(base.standing_charge_total),
        format_money(base.tax_amount),
        format_money(base.grand_total),
        base.effective_unit_rate.pence_per_kwh()
    );

    for (year, breakdown) in series.iter() {
        let label = inputs
            .calendar_year(year)
            .map_or_else(|| format!("year {year}"), |y| y.to_string());
        debug!("Total for {label}: {}", format_money(breakdown.grand_total));
    }

    info!(
        "Total over {} years at {:.1}% annual escalation: {}",
        series.len(),
        series.escalation_rate().value() * 100.0,
        format_money(series.cumulative_total())
    );
}

/// Load settings from the settings file unless the caller has supplied them
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
///
/// If no tariff file is given, [`TariffInputs::uk_defaults`] are used. Results go to
/// `opts.output_dir` if given, otherwise to a folder under `elecost_results` named after the tariff
/// file (or `uk_defaults`).
pub fn handle_run_command(
    tariff_path: Option<&Path>,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;
    let output_path = match (&opts.output_dir, tariff_path) {
        (Some(dir), _) => dir.clone(),
        (None, Some(tariff_path)) => get_output_dir(tariff_path)?,
        (None, None) => get_output_dir_for_name(DEFAULTS_RUN_NAME),
    };

    let replacing = create_output_directory(&output_path, settings.overwrite || opts.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Log files are saved in the output folder, so it must exist first
    log::init(&settings.log_level, Some(output_path.as_path()))
        .context("Failed to initialise logging.")?;
    if replacing {
        warn!("Replacing existing results in {}", output_path.display());
    }

    let inputs = if let Some(tariff_path) = tariff_path {
        let inputs = TariffInputs::from_path(tariff_path).context("Failed to load tariff.")?;
        info!("Loaded tariff from {}", tariff_path.display());
        inputs
    } else {
        info!("No tariff file given, using typical UK business rates");
        TariffInputs::uk_defaults()
    };

    let series = inputs.estimate().context("Failed to estimate costs.")?;
    log_projection(&series, &inputs);

    if settings.print_tables {
        println!("{}", build_breakdown_table(series.base()));
        println!("{}", build_projection_table(&series, inputs.base_year));
    }

    write_metadata(&output_path, tariff_path, &inputs, &series)
        .context("Failed to save metadata.")?;
    let mut writer = DataWriter::create(&output_path)?;
    writer.write_projection(&series, inputs.base_year)?;
    writer.flush()?;
    info!("Results saved to {}", output_path.display());

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(tariff_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // No log files for validation
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let inputs = TariffInputs::from_path(tariff_path).context("Failed to validate tariff.")?;
    info!(
        "{} is valid: {} charge components, {} year projection",
        tariff_path.display(),
        inputs.components.len(),
        inputs.horizon_years
    );

    Ok(())
}
