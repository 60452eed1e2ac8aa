//! API quota readings taken from rate-limit response headers

use serde::Serialize;

pub const DEFAULT_HOURLY_LIMIT: u32 = 1000;
pub const DEFAULT_MONTHLY_LIMIT: u32 = 40000;

/// Remaining request allowance as last reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaInfo {
    pub hourly_remaining: u32,
    pub hourly_limit: u32,
    pub monthly_remaining: u32,
    pub monthly_limit: u32,
}

impl QuotaInfo {
    /// Build from a header lookup. `lookup` receives lowercase header names
    /// and must match case-insensitively.
    ///
    /// Missing limits fall back to the documented defaults; a missing
    /// remaining count falls back to its limit.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u32>().ok());

        let hourly_limit = read("ratelimit-hourlylimit").unwrap_or(DEFAULT_HOURLY_LIMIT);
        let monthly_limit = read("ratelimit-monthlylimit").unwrap_or(DEFAULT_MONTHLY_LIMIT);

        Self {
            hourly_remaining: read("ratelimit-hourlyremaining").unwrap_or(hourly_limit),
            hourly_limit,
            monthly_remaining: read("ratelimit-monthlyremaining").unwrap_or(monthly_limit),
            monthly_limit,
        }
    }

    /// Build from header name/value pairs in any letter case
    #[cfg(test)]
    pub(crate) fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let lowered: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        Self::from_lookup(|name| {
            lowered
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    pub fn hourly_used(&self) -> u32 {
        self.hourly_limit.saturating_sub(self.hourly_remaining)
    }

    pub fn monthly_used(&self) -> u32 {
        self.monthly_limit.saturating_sub(self.monthly_remaining)
    }

    /// Fraction (0.0–1.0) of the hourly quota already used
    pub fn hourly_fraction(&self) -> f64 {
        fraction(self.hourly_used(), self.hourly_limit)
    }

    /// Fraction (0.0–1.0) of the monthly quota already used
    pub fn monthly_fraction(&self) -> f64 {
        fraction(self.monthly_used(), self.monthly_limit)
    }
}

fn fraction(used: u32, limit: u32) -> f64 {
    if limit == 0 {
        0.0
    } else {
        used as f64 / limit as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let quota = QuotaInfo::from_pairs([
            ("RateLimit-HourlyRemaining", "900"),
            ("RATELIMIT-HOURLYLIMIT", "1000"),
            ("ratelimit-monthlyremaining", "30000"),
            ("RateLimit-MonthlyLimit", "40000"),
        ]);
        assert_eq!(quota.hourly_remaining, 900);
        assert_eq!(quota.hourly_used(), 100);
        assert_eq!(quota.monthly_used(), 10000);
        assert!((quota.monthly_fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_headers_use_defaults() {
        let quota = QuotaInfo::from_pairs([("ratelimit-hourlylimit", "500")]);
        assert_eq!(quota.hourly_limit, 500);
        assert_eq!(quota.hourly_remaining, 500);
        assert_eq!(quota.monthly_limit, DEFAULT_MONTHLY_LIMIT);
        assert_eq!(quota.monthly_remaining, DEFAULT_MONTHLY_LIMIT);
        assert_eq!(quota.hourly_fraction(), 0.0);
    }

    #[test]
    fn test_zero_limit_fraction() {
        let quota = QuotaInfo::from_pairs([
            ("ratelimit-hourlylimit", "0"),
            ("ratelimit-hourlyremaining", "0"),
        ]);
        assert_eq!(quota.hourly_fraction(), 0.0);
    }
}
