//! Common types used across Dalali

use bigdecimal::{BigDecimal, RoundingMode, Signed};

/// Number of decimal places stored for every monetary column.
pub const MONEY_SCALE: i64 = 2;

/// Rounds an amount to cents, half-up.
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

/// Formats an amount as a dollar string with thousands separators, e.g. `$1,234.50`.
pub fn format_price(amount: &BigDecimal) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_negative();
    let text = rounded.abs().to_string();
    let (whole, cents) = match text.split_once('.') {
        Some((whole, cents)) => (whole.to_string(), format!("{:0<2}", cents)),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(&dec("1234.5")), "$1,234.50");
        assert_eq!(format_price(&dec("0")), "$0.00");
        assert_eq!(format_price(&dec("999")), "$999.00");
        assert_eq!(format_price(&dec("1000000")), "$1,000,000.00");
        assert_eq!(format_price(&dec("12.345")), "$12.35");
        assert_eq!(format_price(&dec("-45.1")), "-$45.10");
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(&dec("10.005")), dec("10.01"));
        assert_eq!(round_money(&dec("7")), dec("7.00"));
    }
}
