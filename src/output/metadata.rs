//! The `metadata.toml` file saved alongside each set of results.
//!
//! It records what was run (the tariff and a summary of its results) and what it was run with (the
//! program build and the platform), so results can be traced back later.
use crate::projection::ProjectionSeries;
use crate::tariff::TariffInputs;
use crate::units::{Dimensionless, Energy, Money};
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Build-time information, generated by the `built` crate in `build.rs`
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunInfo<'a>,
    tariff: TariffSummary,
    results: ResultsSummary,
    program: ProgramInfo,
    platform: PlatformSummary,
}

#[derive(Serialize)]
struct RunInfo<'a> {
    /// Absent when the default tariff was used
    #[serde(skip_serializing_if = "Option::is_none")]
    tariff_path: Option<&'a Path>,
    started: String,
}

/// The headline tariff inputs
#[derive(Serialize)]
struct TariffSummary {
    consumption_kwh: Energy,
    charge_components: Vec<String>,
    standing_charge_per_year: Money,
    tax_rate: Dimensionless,
    escalation_rate: Dimensionless,
    horizon_years: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_year: Option<u32>,
}

impl TariffSummary {
    fn new(inputs: &TariffInputs) -> Self {
        Self {
            consumption_kwh: inputs.consumption,
            charge_components: inputs.components.iter().map(|c| c.name.clone()).collect(),
            standing_charge_per_year: inputs.standing_charge.annual_total(),
            tax_rate: inputs.tax_rate.0,
            escalation_rate: inputs.escalation_rate,
            horizon_years: inputs.horizon_years,
            base_year: inputs.base_year,
        }
    }
}

/// The headline results
#[derive(Serialize)]
struct ResultsSummary {
    first_year_total: Money,
    final_year_total: Money,
    cumulative_total: Money,
}

impl ResultsSummary {
    fn new(series: &ProjectionSeries) -> Self {
        let breakdowns = series.breakdowns();
        Self {
            first_year_total: series.base().grand_total,
            final_year_total: breakdowns
                .last()
                .map_or(Money(0.0), |breakdown| breakdown.grand_total),
            cumulative_total: series.cumulative_total(),
        }
    }
}

#[derive(Serialize)]
struct ProgramInfo {
    version: &'static str,
    git_commit: String,
    built: &'static str,
    debug_build: bool,
}

impl ProgramInfo {
    fn new() -> Self {
        let git_commit = match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("{hash}-dirty"),
            (Some(hash), _) => hash.into(),
            (None, _) => "unknown".into(),
        };

        Self {
            version: built_info::PKG_VERSION,
            git_commit,
            built: built_info::BUILT_TIME_UTC,
            debug_build: built_info::DEBUG,
        }
    }
}

#[derive(Serialize)]
struct PlatformSummary {
    os: String,
    release: String,
    machine: String,
}

impl PlatformSummary {
    fn new() -> Result<Self> {
        let info = PlatformInfo::new().map_err(|err| anyhow!("Could not query platform: {err}"))?;

        Ok(Self {
            os: info.osname().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
        })
    }
}

/// Write `metadata.toml` for a completed run to the output folder
pub fn write_metadata(
    output_path: &Path,
    tariff_path: Option<&Path>,
    inputs: &TariffInputs,
    series: &ProjectionSeries,
) -> Result<()> {
    let metadata = Metadata {
        run: RunInfo {
            tariff_path,
            started: Local::now().to_rfc3339(),
        },
        tariff: TariffSummary::new(inputs),
        results: ResultsSummary::new(series),
        program: ProgramInfo::new(),
        platform: PlatformSummary::new()?,
    };

    let file_path = output_path.join(METADATA_FILE_NAME);
    let contents = toml::to_string(&metadata).context("Could not serialise metadata")?;
    fs::write(&file_path, contents)
        .with_context(|| format!("Could not write {}", file_path.display()))?;

    Ok(())
}
