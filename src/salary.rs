use regex::Regex;
use std::sync::LazyLock;

use crate::models::DEFAULT_CURRENCY;

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

struct SalaryPattern {
    regex: Regex,
    multiplier: f64,
}

// Tried in order; the first pattern that matches and parses wins. Digits
// are ASCII only.
static SALARY_PATTERNS: LazyLock<Vec<SalaryPattern>> = LazyLock::new(|| {
    [
        // $100,000 - $150,000 (optional cents)
        (
            concat!(
                r"(?i)\$([0-9]{1,3}(?:,?[0-9]{3})*(?:\.[0-9]{2})?)\s*-\s*",
                r"\$([0-9]{1,3}(?:,?[0-9]{3})*(?:\.[0-9]{2})?)",
            ),
            1.0,
        ),
        // $100k - $150k, second dollar sign optional
        (r"(?i)\$([0-9]{1,3})k\s*-\s*\$?([0-9]{1,3})k", 1000.0),
        // 100,000 - 150,000 USD
        (
            concat!(
                r"(?i)([0-9]{1,3}(?:,?[0-9]{3})*(?:\.[0-9]{2})?)\s*-\s*",
                r"([0-9]{1,3}(?:,?[0-9]{3})*(?:\.[0-9]{2})?)\s*(?:USD|\$)",
            ),
            1.0,
        ),
    ]
    .into_iter()
    .map(|(pattern, multiplier)| SalaryPattern {
        regex: Regex::new(pattern).expect("salary pattern compiles"),
        multiplier,
    })
    .collect()
});

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Pull the first salary range out of free text.
///
/// Only the first match is used. Amounts are read from ASCII digits only,
/// so numerals from other scripts never yield a range. The currency is
/// always USD.
pub fn extract_salary(text: &str) -> Option<SalaryRange> {
    SALARY_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.regex.captures(text)?;
        let min = parse_amount(caps.get(1)?.as_str())?;
        let max = parse_amount(caps.get(2)?.as_str())?;
        Some(SalaryRange {
            min: min * pattern.multiplier,
            max: max * pattern.multiplier,
            currency: DEFAULT_CURRENCY.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, max: f64) -> Option<SalaryRange> {
        Some(SalaryRange {
            min,
            max,
            currency: "USD".to_string(),
        })
    }

    #[test]
    fn test_dollar_range_with_commas() {
        assert_eq!(
            extract_salary("Salary: $100,000 - $150,000"),
            range(100_000.0, 150_000.0)
        );
    }

    #[test]
    fn test_dollar_range_with_cents() {
        assert_eq!(
            extract_salary("Base pay $120,000.50-$150,000.00 per year"),
            range(120_000.5, 150_000.0)
        );
    }

    #[test]
    fn test_k_suffix_multiplies() {
        assert_eq!(extract_salary("Pay: $100k-$150k"), range(100_000.0, 150_000.0));
        assert_eq!(extract_salary("Pay: $90K - 120K"), range(90_000.0, 120_000.0));
    }

    #[test]
    fn test_currency_suffix() {
        assert_eq!(
            extract_salary("Compensation: 90,000 - 120,000 USD"),
            range(90_000.0, 120_000.0)
        );
        assert_eq!(extract_salary("Range 85000-95000 usd"), range(85_000.0, 95_000.0));
    }

    #[test]
    fn test_first_match_only() {
        assert_eq!(
            extract_salary("Tier 1: $100,000 - $120,000. Tier 2: $130,000 - $160,000."),
            range(100_000.0, 120_000.0)
        );
    }

    #[test]
    fn test_non_ascii_digits_are_not_amounts() {
        assert_eq!(extract_salary("$١٠٠ - $١٥٠"), None);
        assert_eq!(extract_salary("$１００k - $１５０k"), None);
        assert_eq!(
            extract_salary("$١٠٠ - $١٥٠ or 90 - 120 USD"),
            range(90.0, 120.0)
        );
    }

    #[test]
    fn test_no_salary() {
        assert_eq!(extract_salary("Great team culture"), None);
        assert_eq!(extract_salary("Software Engineer position"), None);
        assert_eq!(extract_salary(""), None);
    }
}
