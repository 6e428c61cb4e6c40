//! General functions related to finance.
use crate::units::Dimensionless;

/// Calculates the factor by which a cost has grown after compounding at a constant annual rate.
///
/// # Arguments
///
/// * `escalation_rate` - The annual rate of change (e.g. 0.025 for 2.5%); may be negative
/// * `years_elapsed` - The number of years of compounding (zero gives a factor of one)
pub fn escalation_factor(escalation_rate: Dimensionless, years_elapsed: u32) -> Dimensionless {
    (Dimensionless(1.0) + escalation_rate).powu(years_elapsed)
}
