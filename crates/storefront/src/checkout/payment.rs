//! Card input formatting.

/// Maximum digits kept in a card number.
pub const CARD_DIGITS: usize = 16;

/// Maximum digits kept in an expiry date (`MMYY`).
const EXPIRY_DIGITS: usize = 4;

fn digits(value: &str, cap: usize) -> String {
    value.chars().filter(char::is_ascii_digit).take(cap).collect()
}

/// Strip non-digits, keep at most 16, and group by four.
///
/// ```
/// use larkspur_storefront::checkout::format_card_number;
///
/// assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
/// assert_eq!(format_card_number("4111 1111 1111 1111 999"), "4111 1111 1111 1111");
/// ```
#[must_use]
pub fn format_card_number(value: &str) -> String {
    let digits = digits(value, CARD_DIGITS);
    let mut formatted = String::with_capacity(digits.len() + 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(digit);
    }

    formatted
}

/// Strip non-digits, keep at most four, and insert `/` after the month.
///
/// ```
/// use larkspur_storefront::checkout::format_expiry_date;
///
/// assert_eq!(format_expiry_date("0125"), "01/25");
/// assert_eq!(format_expiry_date("1"), "1");
/// ```
#[must_use]
pub fn format_expiry_date(value: &str) -> String {
    let digits = digits(value, EXPIRY_DIGITS);

    match (digits.get(..2), digits.get(2..)) {
        (Some(month), Some(year)) => format!("{month}/{year}"),
        _ => digits,
    }
}

/// Number of digits in a formatted card number.
#[must_use]
pub fn card_digit_count(card_number: &str) -> usize {
    card_number.chars().filter(char::is_ascii_digit).count()
}
