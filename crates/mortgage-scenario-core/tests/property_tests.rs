use mortgage_scenario_core::amortization::generate_amortization_schedule;
use mortgage_scenario_core::insurance::compute_insurance_premium;
use mortgage_scenario_core::land_transfer::compute_land_transfer_tax;
use mortgage_scenario_core::payment::{compute_periodic_payment, PaymentFrequency};
use mortgage_scenario_core::scenario::{compute_scenario, ScenarioInput};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Whole cents from 0 up to `max_dollars`.
fn money(max_dollars: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_dollars * 100).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentages with two decimal places.
fn percent(max_hundredths: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_hundredths).prop_map(|h| Decimal::new(h, 2))
}

fn frequency() -> impl Strategy<Value = PaymentFrequency> {
    prop::sample::select(PaymentFrequency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn premium_is_zero_at_twenty_percent_or_more(pct in percent(10_000).prop_map(|p| p + dec!(20)), loan in money(5_000_000)) {
        prop_assert_eq!(compute_insurance_premium(pct, loan), Decimal::ZERO);
    }

    #[test]
    fn premium_tier_matches_band(pct in percent(1_999), loan in money(5_000_000)) {
        let expected_rate = if pct >= dec!(15) {
            dec!(0.028)
        } else if pct >= dec!(10) {
            dec!(0.031)
        } else {
            dec!(0.04)
        };
        prop_assert_eq!(compute_insurance_premium(pct, loan), loan * expected_rate);
    }

    #[test]
    fn zero_rate_payment_is_straight_line(principal in money(2_000_000), years in 1u32..=30) {
        let pmt = compute_periodic_payment(principal, Decimal::ZERO, years, PaymentFrequency::Monthly).unwrap();
        prop_assert_eq!(pmt, principal / Decimal::from(years * 12));
    }

    #[test]
    fn schedule_repays_principal(principal in money(2_000_000), rate in percent(10_000), years in 1u32..=30) {
        let rows = generate_amortization_schedule(principal, rate, years).unwrap();
        prop_assert_eq!(rows.len(), years as usize);
        let repaid: Decimal = rows.iter().map(|r| r.yearly_principal_paid).sum();
        prop_assert!((repaid - principal).abs() < dec!(0.01), "repaid {} of {}", repaid, principal);
        let last = rows.last().unwrap();
        prop_assert!(last.ending_balance >= Decimal::ZERO);
        prop_assert!(last.ending_balance < dec!(0.01));
    }

    #[test]
    fn rates_above_ceiling_are_errors(
        hundredths in 10_001i64..=100_000_000,
        years in 1u32..=30,
        freq in frequency(),
    ) {
        let rate = Decimal::new(hundredths, 2);
        let err = compute_periodic_payment(dec!(500000), rate, years, freq).unwrap_err();
        prop_assert_eq!(err.field(), Some("annual_rate_pct"));
        prop_assert!(generate_amortization_schedule(dec!(500000), rate, years).is_err());
        let input = ScenarioInput::new(dec!(20), years, rate, freq);
        prop_assert!(compute_scenario(dec!(596000), &input).is_err());
    }

    #[test]
    fn rebate_never_exceeds_tax(price in money(5_000_000), first_time in any::<bool>(), toronto in any::<bool>()) {
        let location = if toronto { "Toronto, ON" } else { "Calgary, AB" };
        let r = compute_land_transfer_tax(price, first_time, location).unwrap();
        prop_assert!(r.rebate <= r.provincial_tax + r.municipal_tax);
        prop_assert!(r.net_payable >= Decimal::ZERO);
        if !toronto {
            prop_assert_eq!(r.municipal_tax, Decimal::ZERO);
        }
    }

    #[test]
    fn scenario_is_idempotent(
        price in money(3_000_000).prop_map(|p| p + dec!(1000)),
        pct in percent(9_900),
        rate in percent(10_000),
        years in 1u32..=30,
        freq in frequency(),
    ) {
        let input = ScenarioInput::new(pct, years, rate, freq);
        let a = compute_scenario(price, &input).unwrap();
        let b = compute_scenario(price, &input).unwrap();
        prop_assert_eq!(a, b);
    }
}
