//! Period kinds used by installment schedules and recurrence
//!
//! The set is closed: monthly, biannual (every six months) and yearly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FicError;

/// A fixed step of calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePeriod {
    #[default]
    Monthly,
    Biannual,
    Yearly,
}

impl RecurrencePeriod {
    /// All supported kinds, in increasing length
    pub const ALL: [RecurrencePeriod; 3] = [Self::Monthly, Self::Biannual, Self::Yearly];

    /// Number of calendar months in one step
    pub const fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Biannual => 6,
            Self::Yearly => 12,
        }
    }

    /// Lowercase identifier as accepted on the command line
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Biannual => "biannual",
            Self::Yearly => "yearly",
        }
    }

    /// Human-friendly unit used in previews ("every 6 months")
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Monthly => "every month",
            Self::Biannual => "every 6 months",
            Self::Yearly => "every year",
        }
    }
}

impl fmt::Display for RecurrencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrencePeriod {
    type Err = FicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "biannual" | "semiannual" | "6m" => Ok(Self::Biannual),
            "yearly" | "annual" | "year" | "y" => Ok(Self::Yearly),
            other => Err(FicError::Config(format!(
                "Unknown period '{}'. Expected one of: monthly, biannual, yearly",
                other
            ))),
        }
    }
}
