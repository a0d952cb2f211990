use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount with comma thousands grouping and exactly two decimals,
/// e.g. `30000.5` becomes `30,000.50`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_amount(dec("30000")), "30,000.00");
        assert_eq!(format_amount(dec("1234567.8")), "1,234,567.80");
        assert_eq!(format_amount(dec("999")), "999.00");
        assert_eq!(format_amount(dec("1000")), "1,000.00");
    }

    #[test]
    fn test_format_rounds_to_two_decimals() {
        assert_eq!(format_amount(dec("0.005")), "0.01");
        assert_eq!(format_amount(dec("15000.004")), "15,000.00");
    }

    #[test]
    fn test_format_zero_and_negative() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(dec("-1500.25")), "-1,500.25");
    }
}
