//! Installment and recurrence schedule generation
//!
//! Pure date arithmetic: no I/O, no shared state. Every date is derived from
//! its base date with a single shift (never by chaining previous results), so
//! a clamped day such as Feb 28 does not drag later dates back.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{FicError, FicResult};
use crate::models::{Installment, Money, RecurrencePeriod};

/// Shift `base` forward by `multiplier` periods.
///
/// When the day does not exist in the target month it is clamped to the
/// month's last day: Jan 31 + 1 month is Feb 29 in a leap year, Feb 28
/// otherwise.
pub fn shift_date(
    base: NaiveDate,
    period: RecurrencePeriod,
    multiplier: u32,
) -> FicResult<NaiveDate> {
    let months = period.months().checked_mul(multiplier).ok_or_else(|| {
        FicError::Config(format!(
            "Cannot shift {} by {} {} periods",
            base, multiplier, period
        ))
    })?;

    base.checked_add_months(Months::new(months)).ok_or_else(|| {
        FicError::Config(format!(
            "Date {} shifted by {} months is out of range",
            base, months
        ))
    })
}

/// Due dates for `count` installments, the first on `first_due`
pub fn generate_installment_schedule(
    first_due: NaiveDate,
    count: u32,
    period: RecurrencePeriod,
) -> FicResult<Vec<NaiveDate>> {
    ensure_positive("Installment count", count)?;
    (0..count)
        .map(|i| shift_date(first_due, period, i))
        .collect()
}

/// Split `gross` into `count` amounts that add up exactly.
///
/// Each share is the truncated quotient in cents; the leftover cents go one
/// each to the earliest installments.
pub fn allocate_amounts(gross: Money, count: u32) -> FicResult<Vec<Money>> {
    ensure_positive("Installment count", count)?;
    if gross.is_negative() {
        return Err(FicError::Validation(format!(
            "Cannot split a negative amount ({})",
            gross
        )));
    }

    let total = gross.cents();
    let n = count as i64;
    let base = total / n;
    let remainder = total % n;

    Ok((0..n)
        .map(|i| Money::from_cents(base + if i < remainder { 1 } else { 0 }))
        .collect())
}

/// Expense dates for a recurring series starting at `base`
pub fn generate_recurrence_dates(
    base: NaiveDate,
    occurrences: u32,
    period: RecurrencePeriod,
) -> FicResult<Vec<NaiveDate>> {
    ensure_positive("Occurrence count", occurrences)?;
    (0..occurrences)
        .map(|k| shift_date(base, period, k))
        .collect()
}

/// Unpaid installments for `gross`, due from `first_due` every `period`
pub fn build_installments(
    gross: Money,
    first_due: NaiveDate,
    count: u32,
    period: RecurrencePeriod,
) -> FicResult<Vec<Installment>> {
    let dates = generate_installment_schedule(first_due, count, period)?;
    let amounts = allocate_amounts(gross, count)?;

    Ok(dates
        .into_iter()
        .zip(amounts)
        .enumerate()
        .map(|(i, (due, amount))| Installment::unpaid(i as u32 + 1, due, amount))
        .collect())
}

/// Last day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> FicResult<NaiveDate> {
    let first = date.with_day(1).ok_or_else(|| out_of_range(date))?;
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// Default first due date: the last day of the month after `expense_date`
pub fn default_first_due(expense_date: NaiveDate) -> FicResult<NaiveDate> {
    let first = expense_date
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .ok_or_else(|| out_of_range(expense_date))?;
    end_of_month(first)
}

fn ensure_positive(what: &str, count: u32) -> FicResult<()> {
    if count == 0 {
        return Err(FicError::Config(format!("{} must be at least 1", what)));
    }
    Ok(())
}

fn out_of_range(date: NaiveDate) -> FicError {
    FicError::Config(format!("Date {} is out of range", date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use RecurrencePeriod::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cents(values: &[i64]) -> Vec<Money> {
        values.iter().map(|c| Money::from_cents(*c)).collect()
    }

    #[test]
    fn test_shift_clamps_to_month_end() {
        assert_eq!(shift_date(date(2024, 1, 31), Monthly, 1).unwrap(), date(2024, 2, 29));
        assert_eq!(shift_date(date(2023, 1, 31), Monthly, 1).unwrap(), date(2023, 2, 28));
        assert_eq!(shift_date(date(2024, 8, 31), Biannual, 1).unwrap(), date(2025, 2, 28));
        assert_eq!(shift_date(date(2024, 2, 29), Yearly, 1).unwrap(), date(2025, 2, 28));
        assert_eq!(shift_date(date(2024, 2, 29), Yearly, 4).unwrap(), date(2028, 2, 29));
    }

    #[test]
    fn test_shift_keeps_day_when_possible() {
        assert_eq!(shift_date(date(2024, 3, 15), Monthly, 0).unwrap(), date(2024, 3, 15));
        assert_eq!(shift_date(date(2024, 11, 15), Monthly, 3).unwrap(), date(2025, 2, 15));
        assert_eq!(shift_date(date(2024, 3, 15), Biannual, 3).unwrap(), date(2025, 9, 15));
    }

    #[test]
    fn test_shift_never_exceeds_target_month() {
        let base = date(2024, 1, 31);
        for k in 0..36 {
            let shifted = shift_date(base, Monthly, k).unwrap();
            assert_eq!(shifted, end_of_month(shifted).unwrap());
        }
        let base = date(2024, 1, 20);
        for k in 0..36 {
            assert_eq!(shift_date(base, Monthly, k).unwrap().day(), 20);
        }
    }

    #[test]
    fn test_shift_out_of_range_is_config_error() {
        let err = shift_date(NaiveDate::MAX, Monthly, 1).unwrap_err();
        assert!(matches!(err, FicError::Config(_)));
        let err = shift_date(date(2024, 1, 1), Yearly, u32::MAX).unwrap_err();
        assert!(matches!(err, FicError::Config(_)));
    }

    #[test]
    fn test_installment_schedule_is_not_chained() {
        assert_eq!(
            generate_installment_schedule(date(2024, 1, 31), 3, Monthly).unwrap(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn test_single_installment_returns_first_due() {
        assert_eq!(
            generate_installment_schedule(date(2024, 5, 17), 1, Yearly).unwrap(),
            vec![date(2024, 5, 17)]
        );
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert!(matches!(
            generate_installment_schedule(date(2024, 1, 1), 0, Monthly),
            Err(FicError::Config(_))
        ));
        assert!(matches!(
            allocate_amounts(Money::from_cents(100), 0),
            Err(FicError::Config(_))
        ));
        assert!(matches!(
            generate_recurrence_dates(date(2024, 1, 1), 0, Yearly),
            Err(FicError::Config(_))
        ));
    }

    #[test]
    fn test_allocate_puts_remainder_first() {
        assert_eq!(
            allocate_amounts(Money::from_cents(10000), 3).unwrap(),
            cents(&[3334, 3333, 3333])
        );
        assert_eq!(
            allocate_amounts(Money::from_cents(10), 4).unwrap(),
            cents(&[3, 3, 2, 2])
        );
        assert_eq!(
            allocate_amounts(Money::from_cents(2), 5).unwrap(),
            cents(&[1, 1, 0, 0, 0])
        );
    }

    #[test]
    fn test_allocate_sums_exactly() {
        for total in [0, 1, 99, 100, 12345, 999_999] {
            for count in 1..=13 {
                let parts = allocate_amounts(Money::from_cents(total), count).unwrap();
                assert_eq!(parts.len(), count as usize);
                let sum: Money = parts.iter().sum();
                assert_eq!(sum.cents(), total);
            }
        }
    }

    #[test]
    fn test_allocate_single_returns_total() {
        assert_eq!(
            allocate_amounts(Money::from_cents(4242), 1).unwrap(),
            cents(&[4242])
        );
    }

    #[test]
    fn test_allocate_rejects_negative() {
        assert!(allocate_amounts(Money::from_cents(-1), 2).is_err());
    }

    #[test]
    fn test_recurrence_dates() {
        assert_eq!(
            generate_recurrence_dates(date(2024, 3, 15), 3, Yearly).unwrap(),
            vec![date(2024, 3, 15), date(2025, 3, 15), date(2026, 3, 15)]
        );
        assert_eq!(
            generate_recurrence_dates(date(2024, 3, 15), 1, Biannual).unwrap(),
            vec![date(2024, 3, 15)]
        );
    }

    #[test]
    fn test_build_installments() {
        let installments =
            build_installments(Money::from_cents(10000), date(2024, 1, 31), 3, Monthly).unwrap();
        assert_eq!(installments.len(), 3);
        assert_eq!(installments[0].sequence, 1);
        assert_eq!(installments[1].due_date, date(2024, 2, 29));
        assert_eq!(installments[2].amount, Money::from_cents(3333));
        assert!(installments.iter().all(|i| !i.paid && i.paid_date.is_none()));
    }

    #[test]
    fn test_month_end_helpers() {
        assert_eq!(end_of_month(date(2024, 2, 10)).unwrap(), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2024, 12, 1)).unwrap(), date(2024, 12, 31));
        assert_eq!(default_first_due(date(2024, 1, 31)).unwrap(), date(2024, 2, 29));
        assert_eq!(default_first_due(date(2024, 12, 31)).unwrap(), date(2025, 1, 31));
    }
}
