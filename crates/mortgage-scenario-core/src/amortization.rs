use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payment::{monthly_payment_unchecked, monthly_rate, validate_loan_terms};
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

/// One year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyRow {
    /// 1-based year number
    pub year: u32,
    /// Balance outstanding after the year's last payment, floored at zero
    pub ending_balance: Money,
    pub yearly_interest_paid: Money,
    pub yearly_principal_paid: Money,
    pub yearly_total_paid: Money,
}

/// A validated loan whose schedule can be walked any number of times.
///
/// Pacing is always monthly, whatever frequency the borrower pays at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmortizationSchedule {
    principal: Money,
    monthly_rate: Rate,
    monthly_payment: Money,
    years: u32,
}

impl AmortizationSchedule {
    pub fn new(principal: Money, annual_rate_pct: Percent, years: u32) -> MortgageResult<Self> {
        validate_loan_terms(principal, annual_rate_pct, years)?;
        let rate = monthly_rate(annual_rate_pct);
        let monthly_payment = monthly_payment_unchecked(principal, rate, years * 12)?;
        Ok(AmortizationSchedule {
            principal,
            monthly_rate: rate,
            monthly_payment,
            years,
        })
    }

    pub fn monthly_payment(&self) -> Money {
        self.monthly_payment
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    /// Lazily yields one row per year, starting from the full principal.
    pub fn rows(&self) -> YearlyRows {
        YearlyRows {
            monthly_rate: self.monthly_rate,
            monthly_payment: self.monthly_payment,
            balance: self.principal,
            year: 0,
            years: self.years,
        }
    }
}

/// Iterator over the years of an [`AmortizationSchedule`].
#[derive(Debug, Clone)]
pub struct YearlyRows {
    monthly_rate: Rate,
    monthly_payment: Money,
    balance: Money,
    year: u32,
    years: u32,
}

impl Iterator for YearlyRows {
    type Item = YearlyRow;

    fn next(&mut self) -> Option<YearlyRow> {
        if self.year >= self.years {
            return None;
        }
        self.year += 1;

        let mut interest_paid = Decimal::ZERO;
        let mut principal_paid = Decimal::ZERO;
        for _ in 0..12 {
            let interest = self.balance * self.monthly_rate;
            let principal_part = self.monthly_payment - interest;
            interest_paid += interest;
            principal_paid += principal_part;
            self.balance -= principal_part;
        }

        // Rounding residue in the last year can push the balance just below zero.
        if self.balance < Decimal::ZERO {
            self.balance = Decimal::ZERO;
        }

        Some(YearlyRow {
            year: self.year,
            ending_balance: self.balance,
            yearly_interest_paid: interest_paid,
            yearly_principal_paid: principal_paid,
            yearly_total_paid: interest_paid + principal_paid,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.years - self.year) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for YearlyRows {}

/// Year-by-year amortization of a fixed-rate loan.
pub fn generate_amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> MortgageResult<Vec<YearlyRow>> {
    let schedule = AmortizationSchedule::new(principal, annual_rate_pct, years)?;
    tracing::trace!(%principal, %annual_rate_pct, years, "generating amortization schedule");
    Ok(schedule.rows().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_count_matches_years() {
        let rows = generate_amortization_schedule(dec!(300000), dec!(4.5), 25).unwrap();
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[0].year, 1);
        assert_eq!(rows[24].year, 25);
    }

    #[test]
    fn test_principal_fully_repaid() {
        let rows = generate_amortization_schedule(dec!(476800), dec!(3.99), 25).unwrap();
        let repaid: Decimal = rows.iter().map(|r| r.yearly_principal_paid).sum();
        assert!((repaid - dec!(476800)).abs() < dec!(0.01), "repaid {repaid}");
        let last = rows.last().unwrap();
        assert!(last.ending_balance >= Decimal::ZERO);
        assert!(last.ending_balance < dec!(0.01));
    }

    #[test]
    fn test_interest_declines_each_year() {
        let rows = generate_amortization_schedule(dec!(200000), dec!(6), 10).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].yearly_interest_paid < pair[0].yearly_interest_paid);
            assert!(pair[1].ending_balance < pair[0].ending_balance);
        }
    }

    #[test]
    fn test_total_is_twelve_payments() {
        let schedule = AmortizationSchedule::new(dec!(150000), dec!(5), 15).unwrap();
        let twelve = schedule.monthly_payment() * dec!(12);
        for row in schedule.rows() {
            assert_eq!(row.yearly_total_paid, row.yearly_interest_paid + row.yearly_principal_paid);
            assert!((row.yearly_total_paid - twelve).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let rows = generate_amortization_schedule(dec!(120000), dec!(0), 10).unwrap();
        assert!(rows.iter().all(|r| r.yearly_interest_paid.is_zero()));
        assert_eq!(rows[0].yearly_principal_paid, dec!(12000));
        assert_eq!(rows[9].ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_rows_are_restartable() {
        let schedule = AmortizationSchedule::new(dec!(250000), dec!(4.2), 20).unwrap();
        let first: Vec<_> = schedule.rows().collect();
        let second: Vec<_> = schedule.rows().collect();
        assert_eq!(first, second);
        assert_eq!(schedule.rows().len(), 20);
    }

    #[test]
    fn test_invalid_terms_rejected() {
        assert!(generate_amortization_schedule(dec!(-1), dec!(4), 10).is_err());
        assert!(generate_amortization_schedule(dec!(1000), dec!(4), 0).is_err());
        assert!(generate_amortization_schedule(dec!(1000), dec!(4), 31).is_err());
    }
}
