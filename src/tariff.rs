//! The tariff inputs for an estimate, as read from a tariff file.
use crate::breakdown::compute_breakdown;
use crate::charge::{ChargeComponent, StandingCharge, TaxRate};
use crate::error::InvalidInput;
use crate::id::check_id_str;
use crate::input::{input_err_msg, read_toml};
use crate::projection::{DEFAULT_HORIZON_YEARS, ProjectionSeries, project};
use crate::units::{Dimensionless, Energy, MoneyPerDay, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::collections::HashSet;
use std::path::Path;

/// The units in which charge component rates are given in a tariff file
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default)]
pub enum RateUnit {
    /// Pounds per kWh
    #[default]
    #[string = "per_kwh"]
    PerKilowattHour,
    /// Pounds per MWh, as wholesale prices and network charges are usually quoted
    #[string = "per_mwh"]
    PerMegawattHour,
}

impl RateUnit {
    /// Convert a rate in these units to £/kWh
    pub fn to_money_per_energy(self, rate: f64) -> MoneyPerEnergy {
        match self {
            Self::PerKilowattHour => MoneyPerEnergy(rate),
            Self::PerMegawattHour => MoneyPerEnergy(rate / 1000.0),
        }
    }
}

/// A named charge rate, in the units given by the tariff's [`RateUnit`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentRate {
    /// Name of the charge (e.g. "wholesale")
    pub name: String,
    /// Charge per unit of energy
    pub rate: f64,
}

impl ComponentRate {
    fn new(name: &str, rate: f64) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }
}

/// The calendar year for a year index, given the calendar year of year 1 (if known).
///
/// Returns `None` if the base year is unknown or the calendar year can't be represented.
pub fn calendar_year(base_year: Option<u32>, year: u32) -> Option<u32> {
    base_year?.checked_add(year.checked_sub(1)?)
}

fn default_horizon_years() -> u32 {
    DEFAULT_HORIZON_YEARS
}

/// Everything needed to estimate and project annual electricity costs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TariffInputs {
    /// Annual consumption in kWh
    pub consumption: Energy,
    /// The units of the component rates
    #[serde(default)]
    pub rate_unit: RateUnit,
    /// Per-unit charges, in display order
    #[serde(default)]
    pub components: Vec<ComponentRate>,
    /// Fixed charge independent of consumption
    #[serde(default)]
    pub standing_charge: StandingCharge,
    /// Tax (VAT) as a fraction of the pre-tax total
    #[serde(default)]
    pub tax_rate: TaxRate,
    /// Annual escalation rate applied to every charge
    #[serde(default)]
    pub escalation_rate: Dimensionless,
    /// Number of years to project, including the base year
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    /// Calendar year corresponding to the base year, used to label outputs
    #[serde(default)]
    pub base_year: Option<u32>,
}

impl TariffInputs {
    /// A typical UK business tariff, with charges as of July 2025
    pub fn uk_defaults() -> Self {
        Self {
            consumption: Energy(1_000_000.0),
            rate_unit: RateUnit::PerMegawattHour,
            components: vec![
                ComponentRate::new("wholesale", 90.0),
                ComponentRate::new("duos", 20.0),
                ComponentRate::new("tnuos", 10.0),
                ComponentRate::new("bsuos", 5.0),
                ComponentRate::new("cfd_levy", 15.0),
                ComponentRate::new("ro_levy", 5.0),
                ComponentRate::new("ccl", 5.85),
            ],
            standing_charge: StandingCharge::Daily(MoneyPerDay(0.5137)),
            tax_rate: TaxRate::new(0.05),
            escalation_rate: Dimensionless(0.025),
            horizon_years: DEFAULT_HORIZON_YEARS,
            base_year: Some(2025),
        }
    }

    /// Read a tariff file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the tariff TOML file
    ///
    /// # Returns
    ///
    /// The tariff inputs or an error if the file could not be read or its contents are invalid
    pub fn from_path(file_path: &Path) -> Result<Self> {
        let inputs: Self = read_toml(file_path)?;
        inputs.validate().with_context(|| input_err_msg(file_path))?;

        Ok(inputs)
    }

    /// Check that the inputs can be used to produce an estimate
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for component in &self.components {
            check_id_str(&component.name)?;
            ensure!(
                names.insert(component.name.as_str()),
                "Charge '{}' is specified more than once",
                component.name
            );
        }

        if let Some(base_year) = self.base_year {
            ensure!(
                calendar_year(Some(base_year), self.horizon_years.max(1)).is_some(),
                "Base year {base_year} is too large for a {} year projection",
                self.horizon_years
            );
        }

        self.estimate()?;

        Ok(())
    }

    /// The charge components, with rates converted to £/kWh
    pub fn charge_components(&self) -> Vec<ChargeComponent> {
        self.components
            .iter()
            .map(|c| {
                ChargeComponent::new(c.name.as_str(), self.rate_unit.to_money_per_energy(c.rate))
            })
            .collect()
    }

    /// Calculate the base-year breakdown and project it over the horizon
    pub fn estimate(&self) -> Result<ProjectionSeries, InvalidInput> {
        let base = compute_breakdown(
            self.consumption,
            &self.charge_components(),
            self.standing_charge,
            self.tax_rate,
        )?;
        project(&base, self.escalation_rate, self.horizon_years)
    }

    /// The calendar year for the given year index (the base year is year 1), if known
    pub fn calendar_year(&self, year: u32) -> Option<u32> {
        calendar_year(self.base_year, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use crate::units::Money;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    const EXAMPLE_TARIFF: &str = r#"
consumption = 10000.0
tax_rate = 0.05
escalation_rate = 0.03
horizon_years = 3

[standing_charge]
annual = 100.0

[[components]]
name = "wholesale"
rate = 0.15

[[components]]
name = "network"
rate = 0.05
"#;

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tariff.toml");
        fs::write(&file_path, EXAMPLE_TARIFF).unwrap();

        let inputs = TariffInputs::from_path(&file_path).unwrap();
        assert_eq!(inputs.rate_unit, RateUnit::PerKilowattHour);
        assert_eq!(inputs.horizon_years, 3);
        assert_eq!(inputs.base_year, None);
        assert_eq!(inputs.calendar_year(1), None);

        let series = inputs.estimate().unwrap();
        assert_eq!(series.len(), 3);
        assert_approx_eq!(Money, series.base().grand_total, Money(2205.0));
    }

    #[test]
    fn test_from_path_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tariff.toml");
        fs::write(&file_path, "consumption = 5.0").unwrap();

        let inputs = TariffInputs::from_path(&file_path).unwrap();
        assert!(inputs.components.is_empty());
        assert_eq!(inputs.horizon_years, DEFAULT_HORIZON_YEARS);
        assert_eq!(inputs.estimate().unwrap().base().grand_total, Money(0.0));
    }

    #[test]
    fn test_from_path_invalid() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tariff.toml");
        fs::write(&file_path, "consumption = -1.0").unwrap();

        assert_error!(
            TariffInputs::from_path(&file_path),
            input_err_msg(&file_path)
        );
    }

    #[test]
    fn test_validate_invalid_tax_rate() {
        let mut inputs = TariffInputs::uk_defaults();
        inputs.tax_rate = TaxRate::new(1.5);
        assert_eq!(
            inputs.validate().unwrap_err().to_string(),
            "Invalid input: Tax rate must be between 0 and 1 (got 1.5)"
        );
    }

    #[rstest]
    #[case(Some(2025), 1, Some(2025))]
    #[case(Some(2025), 15, Some(2039))]
    #[case(None, 3, None)]
    #[case(Some(u32::MAX), 1, Some(u32::MAX))]
    #[case(Some(u32::MAX), 2, None)]
    #[case(Some(2025), 0, None)]
    fn test_calendar_year(
        #[case] base_year: Option<u32>,
        #[case] year: u32,
        #[case] expected: Option<u32>,
    ) {
        assert_eq!(calendar_year(base_year, year), expected);
    }

    #[test]
    fn test_validate_base_year_too_large() {
        let mut inputs = TariffInputs::uk_defaults();
        inputs.base_year = Some(u32::MAX);
        assert_error!(
            inputs.validate(),
            format!("Base year {} is too large for a 15 year projection", u32::MAX)
        );

        // Fine if the projection ends in the base year
        inputs.horizon_years = 1;
        inputs.validate().unwrap();
        assert_eq!(inputs.calendar_year(1), Some(u32::MAX));
    }

    #[test]
    fn test_validate_duplicate_component() {
        let mut inputs = TariffInputs::uk_defaults();
        inputs.components.push(ComponentRate::new("duos", 1.0));
        assert_error!(inputs.validate(), "Charge 'duos' is specified more than once");
    }

    #[test]
    fn test_validate_bad_component_name() {
        let mut inputs = TariffInputs::uk_defaults();
        inputs.components.push(ComponentRate::new(" ", 1.0));
        assert_error!(inputs.validate(), "IDs cannot be empty");
    }

    #[test]
    fn test_uk_defaults_estimate() {
        let inputs = TariffInputs::uk_defaults();
        let series = inputs.estimate().unwrap();
        assert_eq!(series.len(), 15);

        let base = series.base();
        assert_approx_eq!(
            f64,
            base.effective_unit_rate.pence_per_kwh(),
            15.085,
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Money,
            base.energy_subtotal,
            Money(150_850.0),
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Money,
            base.standing_charge_total,
            Money(187.5005),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Money,
            base.grand_total,
            Money(158_589.375_525),
            epsilon = 1e-6
        );
        assert_eq!(inputs.calendar_year(1), Some(2025));
        assert_eq!(inputs.calendar_year(15), Some(2039));
    }

    #[test]
    fn test_rate_unit_conversion() {
        assert_eq!(
            RateUnit::PerMegawattHour.to_money_per_energy(90.0),
            MoneyPerEnergy(0.09)
        );
        assert_eq!(
            RateUnit::PerKilowattHour.to_money_per_energy(0.09),
            MoneyPerEnergy(0.09)
        );
    }
}
