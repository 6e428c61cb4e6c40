//! Rendering of cost breakdowns and projections as console tables.
use crate::breakdown::AnnualBreakdown;
use crate::projection::{CostField, ProjectionSeries};
use crate::tariff::calendar_year;
use crate::units::Money;
use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};
use itertools::Itertools;

/// Format an amount of money in pounds, with thousands separators and two decimal places
pub fn format_money(amount: Money) -> String {
    let value = amount.value();
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let whole = whole
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",");
    let sign = if value < 0.0 { "-" } else { "" };

    format!("{sign}£{whole}.{fraction}")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn money_cell(amount: Money) -> Cell {
    Cell::new(format_money(amount)).set_alignment(CellAlignment::Right)
}

/// Build a table showing the cost of each charge for a single year, followed by the totals
pub fn build_breakdown_table(breakdown: &AnnualBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Charge", "Annual cost", "Share of total"]);

    let share = |amount: Money| {
        let share = if breakdown.grand_total > Money(0.0) {
            (amount / breakdown.grand_total).value() * 100.0
        } else {
            0.0
        };
        Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right)
    };

    for (name, cost) in &breakdown.component_costs {
        table.add_row(vec![Cell::new(name), money_cell(*cost), share(*cost)]);
    }
    for field in [CostField::StandingCharge, CostField::Tax] {
        let amount = field.value_of(breakdown);
        table.add_row(vec![Cell::new(field), money_cell(amount), share(amount)]);
    }
    table.add_row(vec![
        Cell::new(CostField::TotalCost).add_attribute(Attribute::Bold),
        money_cell(breakdown.grand_total).add_attribute(Attribute::Bold),
        share(breakdown.grand_total),
    ]);

    table
}

/// Build a table with one row per projected year
///
/// # Arguments
///
/// * `series` - The projected costs
/// * `base_year` - The calendar year of the first year, if known, used to label rows
pub fn build_projection_table(series: &ProjectionSeries, base_year: Option<u32>) -> Table {
    const FIELDS: [CostField; 4] = [
        CostField::EnergyCost,
        CostField::StandingCharge,
        CostField::Tax,
        CostField::TotalCost,
    ];

    let mut table = new_table();
    let mut header = vec![Cell::new("Year")];
    header.extend(FIELDS.iter().map(Cell::new));
    header.push(Cell::new("Effective Unit Cost (p/kWh)"));
    table.set_header(header);

    for (year, breakdown) in series.iter() {
        let label = calendar_year(base_year, year).unwrap_or(year);
        let mut row = vec![Cell::new(label)];
        row.extend(
            FIELDS
                .iter()
                .map(|field| money_cell(field.value_of(breakdown))),
        );
        row.push(
            Cell::new(format!(
                "{:.2}",
                breakdown.effective_unit_rate.pence_per_kwh()
            ))
            .set_alignment(CellAlignment::Right),
        );
        table.add_row(row);
    }

    table
}
