//! Projection of an annual cost breakdown over a number of years.
use crate::breakdown::AnnualBreakdown;
use crate::error::{InvalidInput, ensure_valid};
use crate::finance::escalation_factor;
use crate::units::{Dimensionless, Money};
use strum::EnumIter;

/// The number of years projected if the user doesn't specify otherwise
pub const DEFAULT_HORIZON_YEARS: u32 = 15;

/// A whole-breakdown quantity which can be plotted over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
pub enum CostField {
    /// Sum of the per-unit charges
    #[strum(to_string = "Energy Cost (£)")]
    EnergyCost,
    /// The annual standing charge
    #[strum(to_string = "Standing Charge (£)")]
    StandingCharge,
    /// Energy cost plus standing charge
    #[strum(to_string = "Pre-tax Total (£)")]
    PreTaxTotal,
    /// Tax on the pre-tax total
    #[strum(to_string = "VAT (£)")]
    Tax,
    /// The amount payable
    #[strum(to_string = "Total Cost (£)")]
    TotalCost,
}

impl CostField {
    /// Get the value of this field from a breakdown
    pub fn value_of(self, breakdown: &AnnualBreakdown) -> Money {
        match self {
            Self::EnergyCost => breakdown.energy_subtotal,
            Self::StandingCharge => breakdown.standing_charge_total,
            Self::PreTaxTotal => breakdown.pre_tax_total,
            Self::Tax => breakdown.tax_amount,
            Self::TotalCost => breakdown.grand_total,
        }
    }
}

/// Annual cost breakdowns for consecutive years, starting with the base year
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSeries {
    escalation_rate: Dimensionless,
    years: Vec<AnnualBreakdown>,
}

impl ProjectionSeries {
    /// The annual escalation rate used for the projection
    pub fn escalation_rate(&self) -> Dimensionless {
        self.escalation_rate
    }

    /// The number of years in the projection
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether the projection contains no years (never true for a series built by [`project`])
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// The unescalated base year
    pub fn base(&self) -> &AnnualBreakdown {
        &self.years[0]
    }

    /// Get the breakdown for the given year index (the base year is year 1)
    pub fn get(&self, year: u32) -> Option<&AnnualBreakdown> {
        let idx = usize::try_from(year.checked_sub(1)?).ok()?;
        self.years.get(idx)
    }

    /// All breakdowns, in year order
    pub fn breakdowns(&self) -> &[AnnualBreakdown] {
        &self.years
    }

    /// Iterate over the breakdowns along with their year index (starting at 1)
    pub fn iter(&self) -> impl Iterator<Item = (u32, &AnnualBreakdown)> {
        (1..).zip(self.years.iter())
    }

    /// The values of one field for each year, in year order
    pub fn field_series(&self, field: CostField) -> Vec<Money> {
        self.years.iter().map(|year| field.value_of(year)).collect()
    }

    /// The cost of the named charge component for each year, or `None` if there is no such
    /// component
    pub fn component_series(&self, name: &str) -> Option<Vec<Money>> {
        self.years
            .iter()
            .map(|year| year.component_cost(name))
            .collect()
    }

    /// The sum of the total cost over every year of the projection
    pub fn cumulative_total(&self) -> Money {
        self.years.iter().map(|year| year.grand_total).sum()
    }
}

/// Scale every constituent of a breakdown by `factor` and re-derive the totals
fn escalate(base: &AnnualBreakdown, factor: Dimensionless) -> AnnualBreakdown {
    let component_costs = base
        .component_costs
        .iter()
        .map(|(name, cost)| (name.clone(), *cost * factor))
        .collect();

    AnnualBreakdown::from_constituents(
        component_costs,
        base.standing_charge_total * factor,
        base.tax_rate,
        base.effective_unit_rate * factor,
    )
}

/// Project a base-year breakdown forward with compound escalation.
///
/// Each component cost and the standing charge are escalated independently by
/// `(1 + escalation_rate)^(k - 1)` for year `k`, with tax and totals then recalculated from the
/// escalated values. The tax rate is held constant.
///
/// # Arguments
///
/// * `base` - The breakdown for the first year
/// * `escalation_rate` - Annual rate of change; must be greater than -1
/// * `horizon_years` - The number of years to project, including the base year; at least 1
pub fn project(
    base: &AnnualBreakdown,
    escalation_rate: Dimensionless,
    horizon_years: u32,
) -> Result<ProjectionSeries, InvalidInput> {
    ensure_valid!(
        escalation_rate.is_finite() && escalation_rate > Dimensionless(-1.0),
        "Escalation rate must be a finite number greater than -1 (got {escalation_rate})"
    );
    ensure_valid!(
        horizon_years >= 1,
        "Projection horizon must be at least one year"
    );

    let years = (0..horizon_years)
        .map(|elapsed| escalate(base, escalation_factor(escalation_rate, elapsed)))
        .collect();

    Ok(ProjectionSeries {
        escalation_rate,
        years,
    })
}
