//! Fixtures for tests
use crate::breakdown::{AnnualBreakdown, compute_breakdown};
use crate::charge::{ChargeComponent, StandingCharge, TaxRate};
use crate::units::{Energy, Money, MoneyPerEnergy};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn components() -> Vec<ChargeComponent> {
    vec![
        ChargeComponent::new("wholesale", MoneyPerEnergy(0.15)),
        ChargeComponent::new("network", MoneyPerEnergy(0.05)),
    ]
}

#[fixture]
pub fn standing_charge() -> StandingCharge {
    StandingCharge::Annual(Money(100.0))
}

#[fixture]
pub fn tax_rate() -> TaxRate {
    TaxRate::new(0.05)
}

/// The breakdown for 10,000 kWh with the other fixtures
#[fixture]
pub fn base_breakdown(
    components: Vec<ChargeComponent>,
    standing_charge: StandingCharge,
    tax_rate: TaxRate,
) -> AnnualBreakdown {
    compute_breakdown(Energy(10_000.0), &components, standing_charge, tax_rate).unwrap()
}
