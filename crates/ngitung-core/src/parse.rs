//! Permissive numeric input parsing.
//!
//! A live calculator must always show something, so blank or malformed input
//! collapses to a default instead of failing. Negative values are invalid for
//! costs, quantities and percentages; only the what-if magnitudes are signed.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Parse a plain, possibly signed decimal number (`"-20"`, `"12.5"`),
/// returning `default` when the input is blank or unparsable.
pub fn parse_number_or_default(input: &str, default: Decimal) -> Decimal {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return default;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(default)
}

/// Parse a plain decimal number (`"1500"`, `"12.5"`), returning `default` when
/// the input is blank, unparsable or negative.
pub fn parse_non_negative_number_or_default(input: &str, default: Decimal) -> Decimal {
    match parse_number_or_default(input, default) {
        v if v >= Decimal::ZERO => v,
        _ => default,
    }
}

/// Parse an Indonesian-formatted amount: `.` groups thousands and `,` marks
/// decimals, so `"10.000,50"` is 10000.5. An optional `Rp` prefix is ignored.
/// Blank, invalid or negative input gives zero.
pub fn parse_currency(input: &str) -> Decimal {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("Rp")
        .or_else(|| trimmed.strip_prefix("rp"))
        .unwrap_or(trimmed)
        .trim();
    let cleaned = trimmed.replace('.', "").replacen(',', ".", 1);
    parse_non_negative_number_or_default(&cleaned, Decimal::ZERO)
}

/// Parse a unit count; fractional input is truncated toward zero.
pub fn parse_units_or_default(input: &str, default: u64) -> u64 {
    let parsed = parse_non_negative_number_or_default(input, Decimal::from(default));
    u64::try_from(parsed.trunc()).unwrap_or(default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(serde_json::Number),
    Text(String),
}

fn decimal_from_number(n: &serde_json::Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Serde adapter for amounts coming from loosely-typed storage: numbers,
/// numeric strings and `null` are all accepted; anything unusable becomes 0.
/// Strings are read as plain decimals first (the form Decimal serializes to)
/// and as Indonesian-formatted amounts otherwise.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(n)) => decimal_from_number(&n)
            .map(|v| v.max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO),
        Some(Raw::Text(s)) => match Decimal::from_str(s.trim()) {
            Ok(v) => v.max(Decimal::ZERO),
            Err(_) => parse_currency(&s),
        },
        None => Decimal::ZERO,
    })
}

/// Serde adapter for optional percentages: `null`, blank and invalid input
/// become `None`.
pub fn lenient_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(n)) => decimal_from_number(&n).filter(|v| *v >= Decimal::ZERO),
        Some(Raw::Text(s)) => {
            let cleaned = s.trim().replace(',', ".");
            match Decimal::from_str(&cleaned) {
                Ok(v) if v >= Decimal::ZERO => Some(v),
                _ => None,
            }
        }
        _ => None,
    })
}

/// Serde adapter for percentages where absence means zero.
pub fn lenient_percent<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// Serde adapter for unit counts stored as numbers, strings or `null`.
pub fn lenient_units<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_decimal(deserializer)?;
    Ok(u64::try_from(value.trunc()).unwrap_or(0))
}
