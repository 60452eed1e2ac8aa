//! Line-based prompts and argument parsing shared by the commands

use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

use crate::error::{FicError, FicResult};
use crate::models::input::MAX_AMOUNT_CENTS;
use crate::models::Money;

/// Read one trimmed line after printing `label`.
///
/// An empty answer yields `default` when one is given. End of input is an
/// error so a closed stdin never loops.
pub fn prompt_string(label: &str, default: Option<&str>) -> FicResult<String> {
    match default {
        Some(d) if !d.is_empty() => print!("{} [{}]: ", label, d),
        _ => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        return Err(FicError::Validation("No input available".to_string()));
    }

    let input = input.trim();
    if input.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(input.to_string())
    }
}

/// Prompt until `parse` accepts the answer
pub fn prompt_parsed<T>(
    label: &str,
    default: Option<&str>,
    parse: impl Fn(&str) -> FicResult<T>,
) -> FicResult<T> {
    loop {
        let answer = prompt_string(label, default)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_validation() || matches!(e, FicError::Config(_)) => {
                println!("  {}", e);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Ask a yes/no question
pub fn confirm(question: &str, default: bool) -> FicResult<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let answer = prompt_string(&format!("{} [{}]", question, hint), None)?;
        match answer.to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("  Please answer y or n"),
        }
    }
}

/// Hidden input for secrets
pub fn prompt_secret(label: &str) -> FicResult<String> {
    rpassword::prompt_password(format!("{}: ", label))
        .map(|s| s.trim().to_string())
        .map_err(|e| FicError::Io(format!("Failed to read {}: {}", label, e)))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> FicResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        FicError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
    })
}

/// Parse an optional date argument
pub fn parse_optional_date(s: Option<&str>) -> FicResult<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a positive amount such as "1220", "1.220,50" or "€99.90"
pub fn parse_amount(s: &str) -> FicResult<Money> {
    let amount = Money::parse(s).map_err(|e| {
        FicError::Validation(format!(
            "Invalid amount format: '{}'. Use a format like '100' or '99.90'. Error: {}",
            s, e
        ))
    })?;
    if !amount.is_positive() {
        return Err(FicError::Validation(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(FicError::Validation(format!(
            "Amount must not exceed {}, got {}",
            Money::from_cents(MAX_AMOUNT_CENTS),
            amount
        )));
    }
    Ok(amount)
}

/// Parse a whole number in `min..=max`
pub fn parse_count(s: &str, what: &str, min: u32, max: u32) -> FicResult<u32> {
    let n: u32 = s
        .trim()
        .parse()
        .map_err(|_| FicError::Validation(format!("{} must be a whole number, got '{}'", what, s)))?;
    if n < min || n > max {
        return Err(FicError::Validation(format!(
            "{} must be between {} and {}, got {}",
            what, min, max, n
        )));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").unwrap_err().is_validation());
        assert!(parse_date("29/02/2024").is_err());
        assert_eq!(parse_optional_date(None).unwrap(), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("99.90").unwrap(), Money::from_cents(9990));
        assert!(parse_amount("0").unwrap_err().is_validation());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("abc").unwrap_err().is_validation());
        assert_eq!(parse_amount("1.234,50").unwrap(), Money::from_cents(123450));
        assert!(parse_amount("92233720368547758")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3", "Installments", 1, 120).unwrap(), 3);
        assert!(parse_count("0", "Installments", 1, 120).is_err());
        assert!(parse_count("x", "Installments", 1, 120).is_err());
    }
}
