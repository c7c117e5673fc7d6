use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationSchedule, YearlyRow};
use crate::config::RateTable;
use crate::error::MortgageError;
use crate::insurance::compute_insurance_premium_with;
use crate::payment::PaymentFrequency;
use crate::types::{Money, Percent};
use crate::validation::{
    require_amortization_years, require_amount, require_annual_rate, require_non_negative,
    require_positive,
};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One financing scenario.
///
/// The down-payment percentage is the only stored quantity; the amount is
/// always derived from the current home price, so re-pricing the home keeps
/// every scenario's percentage and rescales its amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub down_payment_pct: Percent,
    pub amortization_years: u32,
    pub annual_rate_pct: Percent,
    #[serde(default = "default_frequency")]
    pub payment_frequency: PaymentFrequency,
}

/// Precision of derived down-payment amounts.
const AMOUNT_DECIMAL_PLACES: u32 = 10;

fn default_frequency() -> PaymentFrequency {
    PaymentFrequency::Monthly
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub down_payment_pct: Percent,
    pub down_payment_amount: Money,
    pub insurance_premium: Money,
    /// Home price less down payment plus the (financed) insurance premium
    pub financed_principal: Money,
    pub monthly_payment: Money,
    pub payment_frequency: PaymentFrequency,
    pub periodic_payment: Money,
    pub amortization_schedule: Vec<YearlyRow>,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// A home price and the scenarios being compared against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSet {
    home_price: Money,
    scenarios: Vec<ScenarioInput>,
}

// ---------------------------------------------------------------------------
// ScenarioInput
// ---------------------------------------------------------------------------

impl ScenarioInput {
    pub fn new(
        down_payment_pct: Percent,
        amortization_years: u32,
        annual_rate_pct: Percent,
        payment_frequency: PaymentFrequency,
    ) -> Self {
        ScenarioInput {
            label: None,
            down_payment_pct,
            amortization_years,
            annual_rate_pct,
            payment_frequency,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Down payment in dollars at `home_price`.
    ///
    /// Rounded to ten places, far below a cent, so an amount entered through
    /// [`set_down_payment_amount`](Self::set_down_payment_amount) reads back
    /// exactly despite the percentage being a repeating fraction.
    pub fn down_payment_amount(&self, home_price: Money) -> Money {
        (home_price * self.down_payment_pct / dec!(100)).round_dp(AMOUNT_DECIMAL_PLACES)
    }

    pub fn set_down_payment_pct(&mut self, pct: Percent) -> MortgageResult<()> {
        check_down_payment_pct(pct)?;
        self.down_payment_pct = pct;
        Ok(())
    }

    /// Record an edited down-payment amount by converting it to a
    /// percentage of `home_price`.
    pub fn set_down_payment_amount(&mut self, home_price: Money, amount: Money) -> MortgageResult<()> {
        require_positive("home_price", home_price)?;
        require_amount("down_payment_amount", amount)?;
        let pct = amount * dec!(100) / home_price;
        check_down_payment_pct(pct).map_err(|_| {
            MortgageError::validation("down_payment_amount", "Must be less than the home price")
        })?;
        self.down_payment_pct = pct;
        Ok(())
    }

    pub fn validate(&self) -> MortgageResult<()> {
        check_down_payment_pct(self.down_payment_pct)?;
        require_amortization_years("amortization_years", self.amortization_years)?;
        require_annual_rate("annual_rate_pct", self.annual_rate_pct)
    }
}

fn check_down_payment_pct(pct: Percent) -> MortgageResult<()> {
    require_non_negative("down_payment_pct", pct)?;
    if pct >= dec!(100) {
        return Err(MortgageError::validation(
            "down_payment_pct",
            "Down payment must leave a loan to finance (below 100%)",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Single scenario
// ---------------------------------------------------------------------------

/// Insurance, principal, payment and schedule for one scenario under the
/// default rate table.
pub fn compute_scenario(home_price: Money, input: &ScenarioInput) -> MortgageResult<ScenarioResult> {
    compute_scenario_with(&RateTable::default(), home_price, input)
}

pub fn compute_scenario_with(
    table: &RateTable,
    home_price: Money,
    input: &ScenarioInput,
) -> MortgageResult<ScenarioResult> {
    require_positive("home_price", home_price)?;
    input.validate()?;

    let down_payment_amount = input.down_payment_amount(home_price);
    let loan_amount = home_price - down_payment_amount;
    let insurance_premium =
        compute_insurance_premium_with(table, input.down_payment_pct, loan_amount);
    let financed_principal = loan_amount + insurance_premium;

    let schedule = AmortizationSchedule::new(
        financed_principal,
        input.annual_rate_pct,
        input.amortization_years,
    )?;
    let monthly_payment = schedule.monthly_payment();
    let amortization_schedule: Vec<YearlyRow> = schedule.rows().collect();

    let total_interest: Money = amortization_schedule
        .iter()
        .map(|r| r.yearly_interest_paid)
        .sum();
    let total_paid: Money = amortization_schedule
        .iter()
        .map(|r| r.yearly_total_paid)
        .sum();

    Ok(ScenarioResult {
        label: input.label.clone(),
        down_payment_pct: input.down_payment_pct,
        down_payment_amount,
        insurance_premium,
        financed_principal,
        monthly_payment,
        payment_frequency: input.payment_frequency,
        periodic_payment: input.payment_frequency.from_monthly(monthly_payment),
        amortization_schedule,
        total_interest,
        total_paid,
    })
}

// ---------------------------------------------------------------------------
// Scenario set
// ---------------------------------------------------------------------------

impl ScenarioSet {
    pub fn new(home_price: Money, scenarios: Vec<ScenarioInput>) -> MortgageResult<Self> {
        require_positive("home_price", home_price)?;
        if scenarios.is_empty() {
            return Err(MortgageError::validation(
                "scenarios",
                "At least one scenario is required",
            ));
        }
        for s in &scenarios {
            s.validate()?;
        }
        Ok(ScenarioSet {
            home_price,
            scenarios,
        })
    }

    /// The customary side-by-side: 5, 10, 15 and 20% down at one rate and term.
    pub fn standard(home_price: Money, annual_rate_pct: Percent, years: u32) -> MortgageResult<Self> {
        let scenarios = [dec!(5), dec!(10), dec!(15), dec!(20)]
            .into_iter()
            .map(|pct| {
                ScenarioInput::new(pct, years, annual_rate_pct, PaymentFrequency::Monthly)
                    .with_label(format!("{pct}% down"))
            })
            .collect();
        ScenarioSet::new(home_price, scenarios)
    }

    pub fn home_price(&self) -> Money {
        self.home_price
    }

    pub fn scenarios(&self) -> &[ScenarioInput] {
        &self.scenarios
    }

    /// Re-price the home. Percentages are kept, so every down-payment
    /// amount scales by `new / old`.
    pub fn set_home_price(&mut self, home_price: Money) -> MortgageResult<()> {
        require_positive("home_price", home_price)?;
        self.home_price = home_price;
        Ok(())
    }

    /// Edit one scenario in place, re-validating it afterwards.
    pub fn update<F>(&mut self, index: usize, edit: F) -> MortgageResult<()>
    where
        F: FnOnce(&mut ScenarioInput, Money) -> MortgageResult<()>,
    {
        let home_price = self.home_price;
        let scenario = self.scenarios.get_mut(index).ok_or_else(|| {
            MortgageError::validation("index", format!("No scenario at index {index}"))
        })?;
        let mut edited = scenario.clone();
        edit(&mut edited, home_price)?;
        edited.validate()?;
        *scenario = edited;
        Ok(())
    }

    pub fn down_payment_amounts(&self) -> Vec<Money> {
        self.scenarios
            .iter()
            .map(|s| s.down_payment_amount(self.home_price))
            .collect()
    }

    pub fn compute(&self) -> MortgageResult<Vec<ScenarioResult>> {
        self.compute_with(&RateTable::default())
    }

    /// One result per scenario, in input order. Fails on the first
    /// scenario that cannot be computed.
    pub fn compute_with(&self, table: &RateTable) -> MortgageResult<Vec<ScenarioResult>> {
        tracing::debug!(
            home_price = %self.home_price,
            scenarios = self.scenarios.len(),
            "computing scenario set"
        );
        self.scenarios
            .iter()
            .map(|s| compute_scenario_with(table, self.home_price, s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn twenty_down() -> ScenarioInput {
        ScenarioInput::new(dec!(20), 25, dec!(3.99), PaymentFrequency::Monthly)
    }

    #[test]
    fn test_end_to_end_twenty_percent() {
        let r = compute_scenario(dec!(596000), &twenty_down()).unwrap();
        assert_eq!(r.insurance_premium, Decimal::ZERO);
        assert_eq!(r.down_payment_amount, dec!(119200));
        assert_eq!(r.financed_principal, dec!(476800));
        assert!(r.periodic_payment > dec!(2500) && r.periodic_payment < dec!(2525));
        assert_eq!(r.amortization_schedule.len(), 25);
    }

    #[test]
    fn test_five_percent_premium_is_financed() {
        let input = ScenarioInput::new(dec!(5), 25, dec!(3.99), PaymentFrequency::Monthly);
        let r = compute_scenario(dec!(596000), &input).unwrap();
        assert_eq!(r.insurance_premium, dec!(22648));
        assert_eq!(r.financed_principal, dec!(566200) + dec!(22648));
    }

    #[test]
    fn test_totals_match_schedule() {
        let r = compute_scenario(dec!(500000), &twenty_down()).unwrap();
        let principal: Decimal = r
            .amortization_schedule
            .iter()
            .map(|y| y.yearly_principal_paid)
            .sum();
        assert!((r.total_paid - (r.total_interest + principal)).abs() < dec!(0.000001));
        assert!((principal - r.financed_principal).abs() < dec!(0.01));
    }

    #[test]
    fn test_set_amount_updates_percent() {
        let mut s = twenty_down();
        s.set_down_payment_amount(dec!(500000), dec!(50000)).unwrap();
        assert_eq!(s.down_payment_pct, dec!(10));
        assert_eq!(s.down_payment_amount(dec!(500000)), dec!(50000));
    }

    #[test]
    fn test_set_amount_reads_back_exactly() {
        let mut s = twenty_down();
        s.set_down_payment_amount(dec!(300000), dec!(100000)).unwrap();
        assert_eq!(s.down_payment_amount(dec!(300000)), dec!(100000));

        s.set_down_payment_amount(dec!(699900), dec!(35000)).unwrap();
        assert_eq!(s.down_payment_amount(dec!(699900)), dec!(35000));
        let r = compute_scenario(dec!(699900), &s).unwrap();
        assert_eq!(r.down_payment_amount, dec!(35000));
        assert_eq!(r.financed_principal - r.insurance_premium, dec!(664900));
    }

    #[test]
    fn test_extreme_rate_is_rejected_not_panicking() {
        let input = ScenarioInput::new(dec!(20), 30, dec!(300), PaymentFrequency::Monthly);
        assert_eq!(input.validate().unwrap_err().field(), Some("annual_rate_pct"));
        let err = compute_scenario(dec!(596000), &input).unwrap_err();
        assert_eq!(err.field(), Some("annual_rate_pct"));

        let at_ceiling = ScenarioInput::new(dec!(5), 30, dec!(100), PaymentFrequency::Weekly);
        let r = compute_scenario(dec!(596000), &at_ceiling).unwrap();
        assert_eq!(r.amortization_schedule.len(), 30);
    }

    #[test]
    fn test_price_above_ceiling_rejected() {
        let err = compute_scenario(Decimal::MAX, &twenty_down()).unwrap_err();
        assert_eq!(err.field(), Some("home_price"));
    }

    #[test]
    fn test_amount_at_or_above_price_rejected() {
        let mut s = twenty_down();
        let err = s.set_down_payment_amount(dec!(500000), dec!(500000)).unwrap_err();
        assert_eq!(err.field(), Some("down_payment_amount"));
        assert_eq!(s.down_payment_pct, dec!(20));
    }

    #[test]
    fn test_reprice_rescales_amounts() {
        let mut set = ScenarioSet::standard(dec!(400000), dec!(4), 25).unwrap();
        assert_eq!(set.down_payment_amounts()[0], dec!(20000));
        set.set_home_price(dec!(800000)).unwrap();
        let amounts = set.down_payment_amounts();
        assert_eq!(amounts, vec![dec!(40000), dec!(80000), dec!(120000), dec!(160000)]);
        assert_eq!(set.scenarios()[3].down_payment_pct, dec!(20));
    }

    #[test]
    fn test_update_rejects_invalid_edit_and_keeps_old_value() {
        let mut set = ScenarioSet::standard(dec!(400000), dec!(4), 25).unwrap();
        let err = set
            .update(1, |s, _| {
                s.amortization_years = 40;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.field(), Some("amortization_years"));
        assert_eq!(set.scenarios()[1].amortization_years, 25);

        set.update(1, |s, price| s.set_down_payment_amount(price, dec!(60000)))
            .unwrap();
        assert_eq!(set.scenarios()[1].down_payment_pct, dec!(15));
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = ScenarioSet::new(dec!(500000), vec![]).unwrap_err();
        assert_eq!(err.field(), Some("scenarios"));
    }

    #[test]
    fn test_zero_price_rejected() {
        let err = compute_scenario(dec!(0), &twenty_down()).unwrap_err();
        assert_eq!(err.field(), Some("home_price"));
    }
}
