//! Create requests as entered by the user
//!
//! `ExpenseInput` holds everything needed to create one expense (or a series
//! of recurring ones) and validates it before any schedule is computed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;
use super::period::RecurrencePeriod;
use crate::error::{FicError, FicResult};
use crate::services::schedule;

pub const MAX_INSTALLMENTS: u32 = 120;
pub const MAX_OCCURRENCES: u32 = 10;

/// Largest accepted net amount, in cents (€1,000,000,000.00)
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// VAT rate stored in basis points (22% = 2200)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VatRate(u32);

impl VatRate {
    pub const STANDARD: VatRate = VatRate(2200);

    /// Common Italian rates offered as presets
    pub const PRESETS: [VatRate; 4] = [VatRate(2200), VatRate(1000), VatRate(400), VatRate(0)];

    pub const fn from_basis_points(bp: u32) -> Self {
        Self(bp)
    }

    pub const fn from_percent(percent: u32) -> Self {
        Self(percent * 100)
    }

    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    /// VAT on a net amount, rounded half-up to the cent
    pub fn vat_on(&self, net: Money) -> Money {
        let raw = net.cents() as i128 * self.0 as i128;
        let rounded = if raw >= 0 {
            (raw + 5000) / 10000
        } else {
            (raw - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

impl FromStr for VatRate {
    type Err = FicError;

    /// Accepts "22", "22%", "5.5" and "5,5"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();
        let invalid = || FicError::Validation(format!("Invalid VAT rate: '{}'", s.trim()));

        let bp = Money::parse(trimmed).map_err(|_| invalid())?.cents();
        if !(0..=10_000).contains(&bp) {
            return Err(FicError::Validation(format!(
                "VAT rate must be between 0 and 100, got {}",
                trimmed
            )));
        }
        Ok(Self(bp as u32))
    }
}

/// Everything needed to create an expense (or a recurring series)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseInput {
    pub supplier: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount_net: Money,
    pub vat_rate: VatRate,
    pub expense_date: NaiveDate,
    pub installments: u32,
    /// Defaults to the last day of the month after `expense_date`
    pub first_due: Option<NaiveDate>,
    pub installment_period: RecurrencePeriod,
    pub recurrence: Option<RecurrencePeriod>,
    pub occurrences: u32,
}

impl ExpenseInput {
    /// Create an input with defaults for every optional field
    pub fn new(supplier: impl Into<String>, amount_net: Money, expense_date: NaiveDate) -> Self {
        Self {
            supplier: supplier.into(),
            description: None,
            category: None,
            amount_net,
            vat_rate: VatRate::default(),
            expense_date,
            installments: 1,
            first_due: None,
            installment_period: RecurrencePeriod::Monthly,
            recurrence: None,
            occurrences: 1,
        }
    }

    pub fn amount_vat(&self) -> Money {
        self.vat_rate.vat_on(self.amount_net)
    }

    pub fn amount_gross(&self) -> FicResult<Money> {
        self.amount_net
            .checked_add(self.amount_vat())
            .ok_or_else(|| {
                FicError::Validation(format!("Amount {} is too large", self.amount_net))
            })
    }

    /// First due date, falling back to the end of the following month
    pub fn effective_first_due(&self) -> FicResult<NaiveDate> {
        match self.first_due {
            Some(date) => Ok(date),
            None => schedule::default_first_due(self.expense_date),
        }
    }

    /// Check every field; nothing is sent to the API when this fails
    pub fn validate(&self) -> FicResult<()> {
        if self.supplier.trim().is_empty() {
            return Err(FicError::Validation("Supplier name is required".into()));
        }
        if !self.amount_net.is_positive() {
            return Err(FicError::Validation(format!(
                "Net amount must be greater than zero, got {}",
                self.amount_net
            )));
        }
        if self.amount_net.cents() > MAX_AMOUNT_CENTS {
            return Err(FicError::Validation(format!(
                "Net amount must not exceed {}, got {}",
                Money::from_cents(MAX_AMOUNT_CENTS),
                self.amount_net
            )));
        }
        if self.vat_rate.basis_points() > 10_000 {
            return Err(FicError::Validation(format!(
                "VAT rate must be between 0 and 100, got {}",
                self.vat_rate
            )));
        }
        if !(1..=MAX_INSTALLMENTS).contains(&self.installments) {
            return Err(FicError::Config(format!(
                "Installments must be between 1 and {}, got {}",
                MAX_INSTALLMENTS, self.installments
            )));
        }
        if !(1..=MAX_OCCURRENCES).contains(&self.occurrences) {
            return Err(FicError::Config(format!(
                "Occurrences must be between 1 and {}, got {}",
                MAX_OCCURRENCES, self.occurrences
            )));
        }
        if self.occurrences > 1 && self.recurrence.is_none() {
            return Err(FicError::Config(
                "A recurrence period is required when occurrences is greater than 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_vat_rounds_half_up() {
        // 0.125 -> 0.13
        let rate = VatRate::from_percent(10);
        assert_eq!(rate.vat_on(Money::from_cents(125)).cents(), 13);
        assert_eq!(VatRate::STANDARD.vat_on(Money::from_cents(10000)).cents(), 2200);
        assert_eq!(VatRate::STANDARD.vat_on(Money::from_cents(1)).cents(), 0);
    }

    #[test]
    fn test_gross() {
        let input = ExpenseInput::new("ACME", Money::from_cents(12345), date(2024, 5, 2));
        assert_eq!(input.amount_vat().cents(), 2716);
        assert_eq!(input.amount_gross().unwrap().cents(), 15061);
    }

    #[test]
    fn test_vat_rate_parse_and_display() {
        assert_eq!("22".parse::<VatRate>().unwrap(), VatRate::STANDARD);
        assert_eq!("5,5%".parse::<VatRate>().unwrap().basis_points(), 550);
        assert_eq!(VatRate::from_basis_points(550).to_string(), "5.5%");
        assert_eq!(VatRate::from_basis_points(1025).to_string(), "10.25%");
        assert!("101".parse::<VatRate>().is_err());
        assert!("abc".parse::<VatRate>().is_err());
    }

    #[test]
    fn test_default_first_due_is_end_of_next_month() {
        let input = ExpenseInput::new("ACME", Money::from_cents(100), date(2024, 1, 15));
        assert_eq!(input.effective_first_due().unwrap(), date(2024, 2, 29));

        let december = ExpenseInput::new("ACME", Money::from_cents(100), date(2024, 12, 3));
        assert_eq!(december.effective_first_due().unwrap(), date(2025, 1, 31));
    }

    #[test]
    fn test_validation() {
        let base = ExpenseInput::new("ACME", Money::from_cents(100), date(2024, 1, 15));
        assert!(base.validate().is_ok());

        let mut input = base.clone();
        input.supplier = "  ".into();
        assert!(input.validate().unwrap_err().is_validation());

        let mut input = base.clone();
        input.amount_net = Money::zero();
        assert!(input.validate().unwrap_err().is_validation());

        let mut input = base.clone();
        input.amount_net = Money::from_cents(MAX_AMOUNT_CENTS);
        assert!(input.validate().is_ok());
        input.amount_net = Money::from_cents(MAX_AMOUNT_CENTS + 1);
        assert!(input.validate().unwrap_err().is_validation());

        let mut input = base.clone();
        input.installments = 0;
        assert!(matches!(input.validate(), Err(FicError::Config(_))));

        let mut input = base.clone();
        input.occurrences = 3;
        assert!(matches!(input.validate(), Err(FicError::Config(_))));
        input.recurrence = Some(RecurrencePeriod::Yearly);
        assert!(input.validate().is_ok());

        let mut input = base;
        input.occurrences = 0;
        assert!(matches!(input.validate(), Err(FicError::Config(_))));
    }

    #[test]
    fn test_huge_amount_is_rejected_not_overflowed() {
        let amount = Money::parse("92233720368547758").unwrap();
        let input = ExpenseInput::new("ACME", amount, date(2024, 1, 15));

        assert!(input.validate().unwrap_err().is_validation());
        assert!(input.amount_gross().unwrap_err().is_validation());
    }
}
