use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{LandTransferSchedule, RateTable};
use crate::types::Money;
use crate::validation::require_amount;
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where a property sits for land-transfer-tax purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Jurisdiction {
    /// Provincial tax only
    Province,
    /// Inside a municipality that levies its own tax on top
    Municipality(String),
}

impl Jurisdiction {
    /// Resolve a free-text location (e.g. a listing address) against the
    /// table's taxing municipality, matching case-insensitively anywhere in
    /// the text.
    pub fn detect(location: &str, table: &RateTable) -> Jurisdiction {
        let detected = match &table.municipal {
            Some(m) if location
                .to_lowercase()
                .contains(&m.municipality.trim().to_lowercase()) =>
            {
                Jurisdiction::Municipality(m.municipality.clone())
            }
            _ => Jurisdiction::Province,
        };
        tracing::debug!(location, ?detected, "resolved land transfer jurisdiction");
        detected
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandTransferTaxResult {
    pub provincial_tax: Money,
    /// Zero unless the property is inside the taxing municipality
    pub municipal_tax: Money,
    pub municipal_tax_applies: bool,
    /// First-time-buyer rebate across both layers
    pub rebate: Money,
    pub net_payable: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Land transfer tax under the default Ontario / Toronto table.
///
/// The municipal layer applies when `jurisdiction_text` mentions Toronto,
/// in any case.
pub fn compute_land_transfer_tax(
    purchase_price: Money,
    is_first_time_buyer: bool,
    jurisdiction_text: &str,
) -> MortgageResult<LandTransferTaxResult> {
    let table = RateTable::default();
    let jurisdiction = Jurisdiction::detect(jurisdiction_text, &table);
    compute_land_transfer_tax_for(purchase_price, is_first_time_buyer, &jurisdiction, &table)
}

/// Land transfer tax for an explicit jurisdiction and rate table.
///
/// A `Municipality` that the table does not tax (or a table with no municipal
/// layer) yields provincial tax only.
pub fn compute_land_transfer_tax_for(
    purchase_price: Money,
    is_first_time_buyer: bool,
    jurisdiction: &Jurisdiction,
    table: &RateTable,
) -> MortgageResult<LandTransferTaxResult> {
    require_amount("purchase_price", purchase_price)?;

    let provincial_tax = bracket_tax(&table.provincial, purchase_price);

    let municipal_schedule = match (jurisdiction, &table.municipal) {
        (Jurisdiction::Municipality(name), Some(m))
            if name.trim().eq_ignore_ascii_case(m.municipality.trim()) =>
        {
            Some(&m.schedule)
        }
        _ => None,
    };
    let municipal_tax_applies = municipal_schedule.is_some();
    let municipal_tax = municipal_schedule
        .map(|s| bracket_tax(s, purchase_price))
        .unwrap_or(Decimal::ZERO);

    let rebate = if is_first_time_buyer {
        let provincial_rebate = provincial_tax.min(table.provincial.first_time_buyer_rebate_cap);
        let municipal_rebate = municipal_schedule
            .map(|s| municipal_tax.min(s.first_time_buyer_rebate_cap))
            .unwrap_or(Decimal::ZERO);
        provincial_rebate + municipal_rebate
    } else {
        Decimal::ZERO
    };

    Ok(LandTransferTaxResult {
        provincial_tax,
        municipal_tax,
        municipal_tax_applies,
        rebate,
        net_payable: provincial_tax + municipal_tax - rebate,
    })
}

/// Marginal-bracket tax: each bracket's rate applies to the slice of the
/// price between its threshold and the next one.
pub fn bracket_tax(schedule: &LandTransferSchedule, price: Money) -> Money {
    let mut tax = Decimal::ZERO;
    for (i, bracket) in schedule.brackets.iter().enumerate() {
        if price <= bracket.threshold {
            break;
        }
        let upper = schedule
            .brackets
            .get(i + 1)
            .map(|next| price.min(next.threshold))
            .unwrap_or(price);
        tax += (upper - bracket.threshold) * bracket.rate;
    }
    tax
}
