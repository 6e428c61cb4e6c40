//! Tariff charges: per-unit components, standing charges and tax.
use crate::error::{InvalidInput, ensure_valid};
use crate::id::define_id_type;
use crate::units::{Day, Dimensionless, Money, MoneyPerDay, MoneyPerEnergy};
use serde::{Deserialize, Serialize};

define_id_type! {ChargeID}

/// A named charge levied per unit of energy consumed (e.g. wholesale price, DUoS, CfD levy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeComponent {
    /// Name of the charge
    pub name: ChargeID,
    /// Charge per kWh consumed
    pub unit_rate: MoneyPerEnergy,
}

impl ChargeComponent {
    /// Create a new [`ChargeComponent`]
    pub fn new(name: impl Into<ChargeID>, unit_rate: MoneyPerEnergy) -> Self {
        Self {
            name: name.into(),
            unit_rate,
        }
    }

    /// Check that the unit rate is a finite, non-negative number
    pub fn validate(&self) -> Result<(), InvalidInput> {
        ensure_valid!(
            self.unit_rate.is_finite() && self.unit_rate >= MoneyPerEnergy(0.0),
            "Unit rate for charge '{}' must be a finite number >= 0 (got {})",
            self.name,
            self.unit_rate
        );

        Ok(())
    }
}

/// A fixed charge which does not depend on consumption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingCharge {
    /// An amount charged per day
    Daily(MoneyPerDay),
    /// An amount charged per year
    Annual(Money),
}

impl Default for StandingCharge {
    fn default() -> Self {
        Self::Annual(Money(0.0))
    }
}

impl StandingCharge {
    /// The total standing charge over a year.
    ///
    /// Daily charges are annualised over 365 days.
    pub fn annual_total(self) -> Money {
        match self {
            Self::Daily(per_day) => per_day * Day::per_year(),
            Self::Annual(per_year) => per_year,
        }
    }

    /// Check that the charge is a finite, non-negative amount
    pub fn validate(self) -> Result<(), InvalidInput> {
        let total = self.annual_total();
        ensure_valid!(
            total.is_finite() && total >= Money(0.0),
            "Standing charge must be a finite number >= 0 (got {total} per year)"
        );

        Ok(())
    }
}

/// A proportional tax (e.g. VAT), applied to the pre-tax total, expressed as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxRate(pub Dimensionless);

impl TaxRate {
    /// Create a new [`TaxRate`] from a fraction (e.g. 0.05 for 5%)
    pub fn new(rate: f64) -> Self {
        Self(Dimensionless(rate))
    }

    /// The rate as a fraction
    pub fn value(self) -> Dimensionless {
        self.0
    }

    /// Check that the rate lies between 0 and 1 inclusive
    pub fn validate(self) -> Result<(), InvalidInput> {
        ensure_valid!(
            (0.0..=1.0).contains(&self.0.value()),
            "Tax rate must be between 0 and 1 (got {})",
            self.0
        );

        Ok(())
    }

    /// The tax due on the given pre-tax amount
    pub fn apply(self, pre_tax: Money) -> Money {
        pre_tax * self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(StandingCharge::Daily(MoneyPerDay(0.5137)), 187.5005)]
    #[case(StandingCharge::Annual(Money(100.0)), 100.0)]
    #[case(StandingCharge::default(), 0.0)]
    fn test_standing_charge_annual_total(#[case] charge: StandingCharge, #[case] expected: f64) {
        assert_approx_eq!(
            Money,
            charge.annual_total(),
            Money(expected),
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case(StandingCharge::Daily(MoneyPerDay(-0.1)))]
    #[case(StandingCharge::Annual(Money(-1.0)))]
    #[case(StandingCharge::Annual(Money(f64::NAN)))]
    #[case(StandingCharge::Daily(MoneyPerDay(f64::INFINITY)))]
    fn test_standing_charge_invalid(#[case] charge: StandingCharge) {
        assert!(charge.validate().is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.05)]
    #[case(0.2)]
    #[case(1.0)]
    fn test_tax_rate_valid(#[case] rate: f64) {
        assert!(TaxRate::new(rate).validate().is_ok());
    }

    #[rstest]
    #[case(-0.01)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn test_tax_rate_invalid(#[case] rate: f64) {
        assert!(TaxRate::new(rate).validate().is_err());
    }

    #[test]
    fn test_tax_rate_apply() {
        assert_approx_eq!(Money, TaxRate::new(0.05).apply(Money(2100.0)), Money(105.0));
    }

    #[test]
    fn test_charge_component_invalid() {
        let charge = ChargeComponent::new("wholesale", MoneyPerEnergy(-0.01));
        assert_eq!(
            charge.validate().unwrap_err().message(),
            "Unit rate for charge 'wholesale' must be a finite number >= 0 (got -0.01)"
        );
    }

    #[test]
    fn test_standing_charge_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            standing_charge: StandingCharge,
        }

        let w: Wrapper = toml::from_str("[standing_charge]\ndaily = 0.5").unwrap();
        assert_eq!(w.standing_charge, StandingCharge::Daily(MoneyPerDay(0.5)));
        let w: Wrapper = toml::from_str("standing_charge = { annual = 120.0 }").unwrap();
        assert_eq!(w.standing_charge, StandingCharge::Annual(Money(120.0)));
    }
}
