//! Estimation and projection of annual UK electricity costs.
//!
//! The core of the crate is [`breakdown::compute_breakdown`], which calculates the cost of a year's
//! consumption broken down by charge, and [`projection::project`], which escalates that breakdown
//! over a number of years.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod breakdown;
pub mod charge;
pub mod cli;
pub mod error;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod projection;
pub mod settings;
pub mod table;
pub mod tariff;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// This is where the settings file is stored.
pub fn get_elecost_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        panic!("Could not get path to config dir");
    };

    config_dir.push("elecost");
    config_dir
}
