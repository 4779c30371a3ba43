//! # Text Processing Utilities
//!
//! Number formatting for rendered listings.

/// Insert `,` separators into the integer part of a plain decimal string.
///
/// ```rust
/// use apifetch_util::text_processing::group_thousands;
///
/// assert_eq!(group_thousands("1234567.891"), "1,234,567.891");
/// assert_eq!(group_thousands("-1000"), "-1,000");
/// assert_eq!(group_thousands("999"), "999");
/// ```
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = integer.chars().count();
    let mut grouped = String::with_capacity(integer.len() + digits / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (digits - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format an amount as dollars with thousands separators.
///
/// ```rust
/// use apifetch_util::text_processing::format_currency;
///
/// assert_eq!(format_currency(43251.5, 2), "$43,251.50");
/// assert_eq!(format_currency(851234567890.0, 0), "$851,234,567,890");
/// assert_eq!(format_currency(-12.5, 2), "-$12.50");
/// ```
pub fn format_currency(amount: f64, decimals: u8) -> String {
    let rounded = format!("{:.*}", decimals as usize, amount.abs());
    let sign = if amount < 0.0 && rounded.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&rounded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_character_not_byte() {
        assert_eq!(group_thousands("١٢٣٤"), "١,٢٣٤");
        assert_eq!(group_thousands("١٢٣٤٥٦٧"), "١,٢٣٤,٥٦٧");
    }

    #[test]
    fn groups_short_and_long_numbers() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100000"), "100,000");
        assert_eq!(group_thousands("12.5"), "12.5");
    }

    #[test]
    fn currency_rounds_to_requested_precision() {
        assert_eq!(format_currency(0.0, 2), "$0.00");
        assert_eq!(format_currency(0.999, 2), "$1.00");
        assert_eq!(format_currency(1234.4, 0), "$1,234");
        assert_eq!(format_currency(-0.001, 2), "$0.00");
    }
}
