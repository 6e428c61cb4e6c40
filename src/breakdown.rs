//! Calculation of the annual cost breakdown for a tariff.
use crate::charge::{ChargeComponent, ChargeID, StandingCharge, TaxRate};
use crate::error::{InvalidInput, ensure_valid};
use crate::units::{Energy, Money, MoneyPerEnergy};
use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// The annual cost of each charge component, in the order the components were supplied
pub type ComponentCostMap = IndexMap<ChargeID, Money>;

/// The cost of electricity over one year, broken down by charge
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualBreakdown {
    /// The cost of each per-unit charge component
    pub component_costs: ComponentCostMap,
    /// Sum of the component costs
    pub energy_subtotal: Money,
    /// The standing charge for the whole year
    pub standing_charge_total: Money,
    /// Energy subtotal plus standing charge
    pub pre_tax_total: Money,
    /// The tax rate applied to the pre-tax total
    pub tax_rate: TaxRate,
    /// Tax due on the pre-tax total
    pub tax_amount: Money,
    /// Pre-tax total plus tax
    pub grand_total: Money,
    /// The combined per-unit rate of all components, before tax
    pub effective_unit_rate: MoneyPerEnergy,
}

impl AnnualBreakdown {
    /// Build a breakdown from its constituent costs, deriving the subtotals and totals.
    ///
    /// This is the only place the totals are calculated, so a breakdown is always internally
    /// consistent.
    pub fn from_constituents(
        component_costs: ComponentCostMap,
        standing_charge_total: Money,
        tax_rate: TaxRate,
        effective_unit_rate: MoneyPerEnergy,
    ) -> Self {
        let energy_subtotal = component_costs.values().copied().sum();
        let pre_tax_total = energy_subtotal + standing_charge_total;
        let tax_amount = tax_rate.apply(pre_tax_total);
        let grand_total = pre_tax_total + tax_amount;

        Self {
            component_costs,
            energy_subtotal,
            standing_charge_total,
            pre_tax_total,
            tax_rate,
            tax_amount,
            grand_total,
            effective_unit_rate,
        }
    }

    /// Get the cost for the named component, if present.
    ///
    /// The name can be given as a `&str` or a `&ChargeID`.
    pub fn component_cost<Q>(&self, name: &Q) -> Option<Money>
    where
        Q: ?Sized + Hash + Equivalent<ChargeID>,
    {
        self.component_costs.get(name).copied()
    }

    /// Iterate over the names of the charge components, in input order
    pub fn component_names(&self) -> impl Iterator<Item = &ChargeID> {
        self.component_costs.keys()
    }
}

/// Calculate the annual cost breakdown for the given consumption and tariff.
///
/// # Arguments
///
/// * `consumption` - Annual electricity consumption
/// * `components` - Per-unit charges, which are summed to give the energy cost
/// * `standing_charge` - Fixed charge, independent of consumption
/// * `tax_rate` - Tax applied to the sum of energy cost and standing charge
///
/// # Returns
///
/// The breakdown, or [`InvalidInput`] if consumption, a unit rate or the standing charge is
/// negative (or not finite), the tax rate is outside [0, 1] or a component name is repeated.
pub fn compute_breakdown(
    consumption: Energy,
    components: &[ChargeComponent],
    standing_charge: StandingCharge,
    tax_rate: TaxRate,
) -> Result<AnnualBreakdown, InvalidInput> {
    ensure_valid!(
        consumption.is_finite() && consumption >= Energy(0.0),
        "Consumption must be a finite number >= 0 (got {consumption})"
    );
    standing_charge.validate()?;
    tax_rate.validate()?;

    let mut component_costs = ComponentCostMap::with_capacity(components.len());
    for component in components {
        component.validate()?;
        let cost = component.unit_rate * consumption;
        ensure_valid!(
            component_costs
                .insert(component.name.clone(), cost)
                .is_none(),
            "Charge '{}' is specified more than once",
            component.name
        );
    }

    let effective_unit_rate = components.iter().map(|c| c.unit_rate).sum();

    Ok(AnnualBreakdown::from_constituents(
        component_costs,
        standing_charge.annual_total(),
        tax_rate,
        effective_unit_rate,
    ))
}
