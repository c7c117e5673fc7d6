use mortgage_scenario_core::amortization::{generate_amortization_schedule, AmortizationSchedule};
use mortgage_scenario_core::insurance::compute_insurance_premium;
use mortgage_scenario_core::payment::{compute_monthly_payment, compute_periodic_payment, PaymentFrequency};
use mortgage_scenario_core::MortgageError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Insurance premium tiers
// ===========================================================================

#[test]
fn test_premium_tiers_on_same_loan() {
    let loan = dec!(400000);
    assert_eq!(compute_insurance_premium(dec!(25), loan), Decimal::ZERO);
    assert_eq!(compute_insurance_premium(dec!(20), loan), Decimal::ZERO);
    assert_eq!(compute_insurance_premium(dec!(17.5), loan), dec!(11200));
    assert_eq!(compute_insurance_premium(dec!(12), loan), dec!(12400));
    assert_eq!(compute_insurance_premium(dec!(5), loan), dec!(16000));
}

// ===========================================================================
// Periodic payments
// ===========================================================================

#[test]
fn test_monthly_payment_textbook_value() {
    // $200,000 at 6% over 30 years: $1,199.10/month
    let pmt = compute_monthly_payment(dec!(200000), dec!(6), 30).unwrap();
    assert!(
        (pmt - dec!(1199.10)).abs() < dec!(0.01),
        "Expected ~1199.10, got {}",
        pmt
    );
}

#[test]
fn test_zero_rate_monthly_equals_principal_over_months() {
    for years in [1u32, 10, 25, 30] {
        let pmt =
            compute_periodic_payment(dec!(300000), dec!(0), years, PaymentFrequency::Monthly).unwrap();
        assert_eq!(pmt, dec!(300000) / Decimal::from(years * 12));
    }
}

#[test]
fn test_frequencies_relative_to_monthly() {
    let monthly = compute_monthly_payment(dec!(476800), dec!(3.99), 25).unwrap();
    let weekly =
        compute_periodic_payment(dec!(476800), dec!(3.99), 25, PaymentFrequency::Weekly).unwrap();
    let acc_weekly =
        compute_periodic_payment(dec!(476800), dec!(3.99), 25, PaymentFrequency::AcceleratedWeekly)
            .unwrap();
    let annual =
        compute_periodic_payment(dec!(476800), dec!(3.99), 25, PaymentFrequency::Annually).unwrap();

    assert_eq!(weekly, monthly * dec!(12) / dec!(52));
    assert_eq!(acc_weekly, monthly / dec!(4));
    assert_eq!(annual, monthly * dec!(12));
    // Accelerated pays more per year than the exact conversion
    assert!(acc_weekly * dec!(52) > weekly * dec!(52));
}

#[test]
fn test_years_out_of_range() {
    match compute_periodic_payment(dec!(1000), dec!(5), 0, PaymentFrequency::Monthly) {
        Err(MortgageError::Validation { field, .. }) => assert_eq!(field, "years"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(compute_monthly_payment(dec!(1000), dec!(5), 31).is_err());
}

// ===========================================================================
// Amortization schedule
// ===========================================================================

#[test]
fn test_schedule_first_year_interest() {
    // First month interest on 476,800 at 0.3325%/month = 1,585.36
    let rows = generate_amortization_schedule(dec!(476800), dec!(3.99), 25).unwrap();
    let first = &rows[0];
    assert!(first.yearly_interest_paid > dec!(18500) && first.yearly_interest_paid < dec!(19100));
    assert!(first.ending_balance < dec!(476800));
}

#[test]
fn test_schedule_balances_reach_zero() {
    for (principal, rate, years) in [
        (dec!(100000), dec!(2.5), 5u32),
        (dec!(750000), dec!(7.25), 30),
        (dec!(50000), dec!(0), 1),
    ] {
        let rows = generate_amortization_schedule(principal, rate, years).unwrap();
        let repaid: Decimal = rows.iter().map(|r| r.yearly_principal_paid).sum();
        assert!((repaid - principal).abs() < dec!(0.01));
        assert!(rows.last().unwrap().ending_balance < dec!(0.01));
    }
}

#[test]
fn test_schedule_payment_matches_monthly_payment() {
    let schedule = AmortizationSchedule::new(dec!(320000), dec!(4.79), 25).unwrap();
    let direct = compute_monthly_payment(dec!(320000), dec!(4.79), 25).unwrap();
    assert_eq!(schedule.monthly_payment(), direct);
    assert_eq!(schedule.years(), 25);
}
