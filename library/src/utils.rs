//! Formatting helpers for stream amounts and grantee profiles.

use std::fmt::{self, Display};

use alloy_primitives::U256;
use regex::Regex;

use crate::constants::{
    SECONDS_IN_DAY, SECONDS_IN_MONTH, SECONDS_IN_WEEK, SECONDS_IN_YEAR, TOKEN_DECIMALS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Day,
    Week,
    Month,
    Year,
}

impl TimeInterval {
    pub fn seconds(&self) -> u64 {
        match self {
            TimeInterval::Day => SECONDS_IN_DAY,
            TimeInterval::Week => SECONDS_IN_WEEK,
            TimeInterval::Month => SECONDS_IN_MONTH,
            TimeInterval::Year => SECONDS_IN_YEAR,
        }
    }
}

impl Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInterval::Day => write!(f, "/day"),
            TimeInterval::Week => write!(f, "/week"),
            TimeInterval::Month => write!(f, "/month"),
            TimeInterval::Year => write!(f, "/year"),
        }
    }
}

/// Formats a wei amount as tokens rounded to `digits` decimals.
/// Trailing zeros are trimmed.
pub fn round_wei_amount(amount: U256, digits: u8) -> String {
    let digits = digits.min(TOKEN_DECIMALS);
    let ten = U256::from(10u64);
    let scale = ten.pow(U256::from(TOKEN_DECIMALS - digits));
    let rounded = amount.saturating_add(scale / U256::from(2u64)) / scale;

    let base = ten.pow(U256::from(digits));
    let whole = rounded / base;
    let frac = rounded % base;
    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>width$}", frac.to_string(), width = digits as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Re-expresses an amount streamed per `from` as amount per `to`.
pub fn convert_stream_value_to_interval(amount: U256, from: TimeInterval, to: TimeInterval) -> String {
    let per_second = amount / U256::from(from.seconds());
    round_wei_amount(per_second.saturating_mul(U256::from(to.seconds())), 4)
}

/// Amount streamed over a month at `flow_rate` wei/sec.
pub fn monthly_flow(flow_rate: U256) -> U256 {
    flow_rate.saturating_mul(U256::from(SECONDS_IN_MONTH))
}

pub fn extract_twitter_handle(url: &str) -> Option<String> {
    let re = Regex::new(r"^https?://(www\.)?twitter\.com/@?(?P<handle>\w+)").ok()?;
    re.captures(url)
        .and_then(|c| c.name("handle"))
        .map(|m| m.as_str().to_string())
}

pub fn extract_github_username(url: &str) -> Option<String> {
    let re = Regex::new(r"^https?://(www\.)?github\.com/(?P<username>[A-Za-z0-9_-]{1,39})").ok()?;
    re.captures(url)
        .and_then(|c| c.name("username"))
        .map(|m| m.as_str().to_string())
}

pub fn is_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| n.is_finite())
        .unwrap_or(false)
}

/// Shortens `s` to `max_len` chars keeping both ends, e.g. `0x12...cdef`.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    const SEPARATOR: &str = "...";

    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        return s.to_string();
    }

    let shown = max_len.saturating_sub(SEPARATOR.len());
    let front = (shown + 1) / 2;
    let back = shown / 2;
    let mut out: String = chars[..front].iter().collect();
    out.push_str(SEPARATOR);
    out.extend(&chars[chars.len() - back..]);
    out
}

pub fn format_number_with_commas(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Compact form with a magnitude suffix, e.g. `1.2k` or `3M`.
/// Values below one keep up to six decimals.
pub fn format_number_with_char_suffix(num: f64, digits: usize) -> String {
    const SUFFIXES: [(f64, &str); 7] = [
        (1e18, "E"),
        (1e15, "P"),
        (1e12, "T"),
        (1e9, "B"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
    ];

    if num < 1.0 {
        return trim_fraction(&format!("{:.6}", num)).to_string();
    }
    match SUFFIXES.iter().find(|(value, _)| num >= *value) {
        Some((value, symbol)) => {
            let scaled = format!("{:.*}", digits, num / value);
            format!("{}{}", trim_fraction(&scaled), symbol)
        }
        None => "0".to_string(),
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn round_wei() {
        assert_eq!(round_wei_amount(U256::ZERO, 4), "0");
        assert_eq!(round_wei_amount(U256::from(ONE_TOKEN), 4), "1");
        assert_eq!(round_wei_amount(U256::from(ONE_TOKEN * 3 / 2), 4), "1.5");
        assert_eq!(round_wei_amount(U256::from(123_456_789_000_000_000u128), 4), "0.1235");
        assert_eq!(round_wei_amount(U256::from(40_000_000_000_000u128), 4), "0");
    }

    #[test]
    fn stream_interval_conversion() {
        // 0.01 token per second
        let per_day = U256::from(ONE_TOKEN * 864);
        assert_eq!(
            convert_stream_value_to_interval(per_day, TimeInterval::Day, TimeInterval::Week),
            "6048"
        );
        assert_eq!(TimeInterval::Month.to_string(), "/month");
    }

    #[test]
    fn profile_links() {
        assert_eq!(
            extract_twitter_handle("https://twitter.com/@flowstate"),
            Some("flowstate".to_string())
        );
        assert_eq!(extract_twitter_handle("https://x.com/flowstate"), None);
        assert_eq!(
            extract_github_username("https://www.github.com/some-dev/repo"),
            Some("some-dev".to_string())
        );
        assert_eq!(extract_github_username(""), None);
    }

    #[test]
    fn text_helpers() {
        assert_eq!(truncate_str("0x1234567890abcdef", 11), "0x12...cdef");
        assert_eq!(truncate_str("short", 11), "short");
        assert_eq!(format_number_with_commas(1_234_567), "1,234,567");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_char_suffix(1_234.0, 1), "1.2k");
        assert_eq!(format_number_with_char_suffix(1_500_000.0, 2), "1.5M");
        assert_eq!(format_number_with_char_suffix(2e9, 2), "2B");
        assert_eq!(format_number_with_char_suffix(999.0, 2), "999");
        assert_eq!(format_number_with_char_suffix(1e18, 1), "1E");
        assert_eq!(format_number_with_char_suffix(0.25, 2), "0.25");
        assert_eq!(format_number_with_char_suffix(0.0000001, 2), "0");
        assert!(is_number("10"));
        assert!(is_number("1.5"));
        assert!(!is_number("ten"));
        assert!(!is_number(""));
    }
}
