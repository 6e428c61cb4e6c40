//! The module responsible for writing output data to disk.
use crate::charge::ChargeID;
use crate::projection::ProjectionSeries;
use crate::tariff::calendar_year;
use crate::units::Money;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which tariff-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "elecost_results";

/// The output file name for the annual totals
const PROJECTION_FILE_NAME: &str = "projection.csv";

/// The output file name for the cost of each charge component
const COMPONENT_COSTS_FILE_NAME: &str = "component_costs.csv";

/// Get the default output folder for a run with the given name
pub fn get_output_dir_for_name(name: &str) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, name].iter().collect()
}

/// Get the default output folder for the tariff file at the specified path
pub fn get_output_dir(tariff_path: &Path) -> Result<PathBuf> {
    let tariff_name = tariff_path
        .file_stem()
        .context("Tariff path has no file name")?
        .to_str()
        .context("Invalid chars in tariff file name")?;

    Ok(get_output_dir_for_name(tariff_name))
}

/// Create a new output directory, deleting the previous contents if `allow_overwrite` is true.
///
/// # Returns
///
/// Whether an existing, non-empty folder was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Folder exists but is empty, so nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        overwrite = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the projection CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ProjectionRow {
    year: u32,
    calendar_year: Option<u32>,
    energy_cost: Money,
    standing_charge: Money,
    pre_tax_total: Money,
    vat: Money,
    total_cost: Money,
    effective_unit_cost_p_per_kwh: f64,
}

/// Represents a row in the component costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ComponentCostRow {
    year: u32,
    calendar_year: Option<u32>,
    component: ChargeID,
    cost: Money,
}

/// An object for writing projected costs to file
pub struct DataWriter {
    projection_writer: csv::Writer<File>,
    component_costs_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            projection_writer: new_writer(PROJECTION_FILE_NAME)?,
            component_costs_writer: new_writer(COMPONENT_COSTS_FILE_NAME)?,
        })
    }

    /// Write the totals and component costs for every year of the projection
    ///
    /// # Arguments
    ///
    /// * `series` - The projected costs
    /// * `base_year` - The calendar year of the first year, if known
    pub fn write_projection(
        &mut self,
        series: &ProjectionSeries,
        base_year: Option<u32>,
    ) -> Result<()> {
        for (year, breakdown) in series.iter() {
            let calendar_year = calendar_year(base_year, year);
            self.projection_writer.serialize(ProjectionRow {
                year,
                calendar_year,
                energy_cost: breakdown.energy_subtotal,
                standing_charge: breakdown.standing_charge_total,
                pre_tax_total: breakdown.pre_tax_total,
                vat: breakdown.tax_amount,
                total_cost: breakdown.grand_total,
                effective_unit_cost_p_per_kwh: breakdown.effective_unit_rate.pence_per_kwh(),
            })?;

            for (component, cost) in &breakdown.component_costs {
                self.component_costs_writer.serialize(ComponentCostRow {
                    year,
                    calendar_year,
                    component: component.clone(),
                    cost: *cost,
                })?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.projection_writer.flush()?;
        self.component_costs_writer.flush()?;

        Ok(())
    }
}
