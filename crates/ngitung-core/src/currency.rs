//! Rupiah presentation formatting.
//!
//! The engine keeps full precision; rounding to whole currency units happens
//! only here, at presentation time.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Units};

/// Rendered in place of values that cannot be computed (e.g. break-even when
/// the selling price does not exceed BPP).
pub const UNAVAILABLE: &str = "—";

/// Insert `.` every three digits from the right: `"1234567"` -> `"1.234.567"`.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Format a value with Indonesian separators: `10.000` or, with decimals,
/// `10.000,00`.
pub fn format_currency(value: Decimal, include_decimal: bool) -> String {
    let dp = if include_decimal { 2 } else { 0 };
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = if include_decimal {
        format!("{:.2}", rounded.abs())
    } else {
        format!("{:.0}", rounded.abs())
    };
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{}{},{}", sign, group_thousands(int_part), f),
        None => format!("{}{}", sign, group_thousands(int_part)),
    }
}

/// `Rp 12.345`, rounded to the nearest whole Rupiah.
pub fn format_rupiah(value: Money) -> String {
    format!("Rp {}", format_currency(value, false))
}

/// Like [`format_rupiah`], but values that are absent or not positive render
/// as [`UNAVAILABLE`].
pub fn format_optional_rupiah(value: Option<Money>) -> String {
    match value {
        Some(v) if v > Decimal::ZERO => format_rupiah(v),
        _ => UNAVAILABLE.to_string(),
    }
}

/// `278 unit`, or [`UNAVAILABLE`] when undefined.
pub fn format_units(value: Option<Units>) -> String {
    match value {
        Some(v) => format!("{} unit", format_currency(v, false)),
        None => UNAVAILABLE.to_string(),
    }
}

/// `12,5%` style percentage with up to two decimals, trailing zeros dropped.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{}%", rounded.to_string().replace('.', ","))
}

/// Reformat free-typed input as the user types: keeps digits and the first
/// decimal comma, groups thousands, and caps decimals at two places.
pub fn format_currency_input(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    let mut parts = cleaned.split(',');
    let integer_part = parts.next().unwrap_or_default();
    let decimal_part = parts.next();
    let formatted = group_thousands(integer_part);
    match decimal_part {
        Some(d) => format!("{},{}", formatted, d.chars().take(2).collect::<String>()),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1.000");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }

    #[test]
    fn test_format_currency_whole() {
        assert_eq!(format_currency(dec!(10000), false), "10.000");
        assert_eq!(format_currency(dec!(12345.5), false), "12.346");
        assert_eq!(format_currency(dec!(0), false), "0");
    }

    #[test]
    fn test_format_currency_with_decimals() {
        assert_eq!(format_currency(dec!(10000), true), "10.000,00");
        assert_eq!(format_currency(dec!(1234.567), true), "1.234,57");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1500), false), "-1.500");
        assert_eq!(format_currency(dec!(-0.4), false), "0");
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(dec!(15600)), "Rp 15.600");
        assert_eq!(format_rupiah(dec!(16146.0)), "Rp 16.146");
    }

    #[test]
    fn test_format_optional_rupiah_unavailable() {
        assert_eq!(format_optional_rupiah(None), UNAVAILABLE);
        assert_eq!(format_optional_rupiah(Some(Decimal::ZERO)), UNAVAILABLE);
        assert_eq!(format_optional_rupiah(Some(dec!(1000))), "Rp 1.000");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(Some(dec!(1667))), "1.667 unit");
        assert_eq!(format_units(None), UNAVAILABLE);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(30)), "30%");
        assert_eq!(format_percent(dec!(12.3456)), "12,35%");
    }

    #[test]
    fn test_format_currency_input() {
        assert_eq!(format_currency_input("1500000"), "1.500.000");
        assert_eq!(format_currency_input("Rp 2500,456"), "2.500,45");
        assert_eq!(format_currency_input("12,"), "12,");
        assert_eq!(format_currency_input(""), "");
    }
}
