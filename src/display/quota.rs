//! Quota formatting

use crate::models::QuotaInfo;

/// One-line summary of the remaining API allowance
pub fn format_quota(quota: Option<&QuotaInfo>) -> String {
    match quota {
        None => "API quota: unknown".to_string(),
        Some(q) => format!(
            "API quota: {}/{} this hour ({:.0}% used) • {}/{} this month",
            q.hourly_remaining,
            q.hourly_limit,
            q.hourly_fraction() * 100.0,
            q.monthly_remaining,
            q.monthly_limit
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quota() {
        let quota = QuotaInfo::from_pairs([
            ("RateLimit-HourlyRemaining", "750"),
            ("RateLimit-HourlyLimit", "1000"),
        ]);
        assert_eq!(
            format_quota(Some(&quota)),
            "API quota: 750/1000 this hour (25% used) • 40000/40000 this month"
        );
        assert_eq!(format_quota(None), "API quota: unknown");
    }
}
