//! Per-form field validation.
//!
//! Each form collects every failing field at once so the page can show all
//! messages inline. Failures never end the checkout; the shopper corrects the
//! fields and submits again.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::data::{Customer, Payment, Shipping};
use super::payment::{CARD_DIGITS, card_digit_count};

#[allow(clippy::unwrap_used)] // Pattern is a compile-time constant
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

#[allow(clippy::unwrap_used)] // Pattern is a compile-time constant
static PHONE_DIGITS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,15}$").unwrap());

#[allow(clippy::unwrap_used)] // Pattern is a compile-time constant
static EXPIRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})$").unwrap());

#[allow(clippy::unwrap_used)] // Pattern is a compile-time constant
static CVV_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").unwrap());

/// Error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failing field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// `Ok(())` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.insert(field, message);
            false
        } else {
            true
        }
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if errors.require("email", email, "Email is required") && !EMAIL_PATTERN.is_match(email) {
        errors.insert("email", "Email is invalid");
    }
}

fn check_names(errors: &mut FieldErrors, customer: &Customer) {
    errors.require("first_name", &customer.first_name, "First name is required");
    errors.require("last_name", &customer.last_name, "Last name is required");
}

/// Sign-in form: email required and well formed, password required.
///
/// # Errors
///
/// Returns the failing fields.
pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    errors.require("password", password, "Password is required");
    errors.into_result()
}

/// Guest contact form.
///
/// The phone number must carry 10 to 15 digits once punctuation is removed.
///
/// # Errors
///
/// Returns the failing fields.
pub fn validate_guest(customer: &Customer) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    check_email(&mut errors, &customer.email);
    check_names(&mut errors, customer);

    if errors.require("phone", &customer.phone, "Phone number is required") {
        let digits: String = customer
            .phone
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if !PHONE_DIGITS_PATTERN.is_match(&digits) {
            errors.insert("phone", "Phone number is invalid");
        }
    }

    errors.into_result()
}

/// Shipping form: contact details plus the shipping address.
///
/// # Errors
///
/// Returns the failing fields.
pub fn validate_shipping(customer: &Customer, shipping: &Shipping) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    check_names(&mut errors, customer);
    check_email(&mut errors, &customer.email);
    errors.require("phone", &customer.phone, "Phone number is required");

    let address = &shipping.address;
    errors.require("address1", &address.address1, "Address is required");
    errors.require("city", &address.city, "City is required");
    errors.require("state", &address.state, "State is required");
    errors.require("zip_code", &address.zip_code, "Zip code is required");
    errors.require("country", &address.country, "Country is required");

    errors.into_result()
}

/// Payment form. `today` decides whether the card has expired.
///
/// A card is expired when the first day of its expiry month is before
/// `today`.
///
/// # Errors
///
/// Returns the failing fields.
pub fn validate_payment(payment: &Payment, today: NaiveDate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if errors.require("card_number", &payment.card_number, "Card number is required")
        && card_digit_count(&payment.card_number) < CARD_DIGITS
    {
        errors.insert("card_number", "Card number must be 16 digits");
    }

    errors.require("name_on_card", &payment.name_on_card, "Name on card is required");

    if errors.require("expiry_date", &payment.expiry_date, "Expiry date is required") {
        match parse_expiry(&payment.expiry_date) {
            Err(message) => errors.insert("expiry_date", message),
            Ok(first_day) if first_day < today => errors.insert("expiry_date", "Card is expired"),
            Ok(_) => {}
        }
    }

    if errors.require("cvv", &payment.cvv, "CVV is required") && !CVV_PATTERN.is_match(&payment.cvv)
    {
        errors.insert("cvv", "CVV must be 3 or 4 digits");
    }

    errors.into_result()
}

/// First day of the month named by an `MM/YY` expiry.
fn parse_expiry(expiry: &str) -> Result<NaiveDate, &'static str> {
    const FORMAT: &str = "Expiry date must be in MM/YY format";

    let captures = EXPIRY_PATTERN.captures(expiry).ok_or(FORMAT)?;
    let month: u32 = captures
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or(FORMAT)?;
    let year: i32 = captures
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or(FORMAT)?;

    NaiveDate::from_ymd_opt(2000 + year, month, 1).ok_or("Expiry month is invalid")
}

/// Whether an `MM/YY` expiry is in the past relative to `today`.
#[must_use]
pub fn is_expired(expiry: &str, today: NaiveDate) -> bool {
    parse_expiry(expiry).is_ok_and(|first_day| first_day < today)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::data::Address;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn customer() -> Customer {
        Customer {
            email: "jane@example.com".to_owned(),
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            phone: "(512) 555-0100".to_owned(),
        }
    }

    fn payment() -> Payment {
        Payment {
            card_number: "4111 1111 1111 1111".to_owned(),
            name_on_card: "Jane Doe".to_owned(),
            expiry_date: "12/30".to_owned(),
            cvv: "123".to_owned(),
            save_card: false,
        }
    }

    #[test]
    fn test_guest_valid() {
        assert!(validate_guest(&customer()).is_ok());
    }

    #[test]
    fn test_guest_reports_every_missing_field() {
        let errors = validate_guest(&Customer::default()).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["email", "first_name", "last_name", "phone"]
        );
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("phone"), Some("Phone number is required"));
    }

    #[test]
    fn test_guest_pattern_failures() {
        let mut c = customer();
        c.email = "jane@example".to_owned();
        c.phone = "555-0100".to_owned();

        let errors = validate_guest(&c).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("phone"), Some("Phone number is invalid"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_guest_phone_too_long() {
        let mut c = customer();
        c.phone = "1".repeat(16);
        assert_eq!(
            validate_guest(&c).unwrap_err().get("phone"),
            Some("Phone number is invalid")
        );
    }

    #[test]
    fn test_shipping_requires_address_fields() {
        let shipping = Shipping {
            address: Address {
                country: String::new(),
                ..Address::default()
            },
            same_as_billing: true,
        };

        let errors = validate_shipping(&customer(), &shipping).unwrap_err();
        for field in ["address1", "city", "state", "zip_code", "country"] {
            assert!(errors.has(field), "{field} should fail");
        }
        assert!(!errors.has("email"));
    }

    #[test]
    fn test_shipping_phone_is_only_required() {
        let mut c = customer();
        c.phone = "12".to_owned();
        let shipping = Shipping {
            address: Address {
                address1: "1 Main St".to_owned(),
                city: "Austin".to_owned(),
                state: "Texas".to_owned(),
                zip_code: "78701".to_owned(),
                ..Address::default()
            },
            same_as_billing: true,
        };

        assert!(validate_shipping(&c, &shipping).is_ok());
    }

    #[test]
    fn test_payment_valid() {
        assert!(validate_payment(&payment(), date(2026, 10, 18)).is_ok());
    }

    #[test]
    fn test_payment_short_card() {
        let mut p = payment();
        p.card_number = "4111 1111".to_owned();
        let errors = validate_payment(&p, date(2026, 10, 18)).unwrap_err();
        assert_eq!(errors.get("card_number"), Some("Card number must be 16 digits"));
    }

    #[test]
    fn test_payment_expiry_rules() {
        let today = date(2026, 10, 18);

        let mut p = payment();
        p.expiry_date = "01/25".to_owned();
        assert_eq!(
            validate_payment(&p, today).unwrap_err().get("expiry_date"),
            Some("Card is expired")
        );

        p.expiry_date = "1/25".to_owned();
        assert_eq!(
            validate_payment(&p, today).unwrap_err().get("expiry_date"),
            Some("Expiry date must be in MM/YY format")
        );

        p.expiry_date = "13/30".to_owned();
        assert_eq!(
            validate_payment(&p, today).unwrap_err().get("expiry_date"),
            Some("Expiry month is invalid")
        );
    }

    #[test]
    fn test_expiry_boundary_is_first_of_month() {
        assert!(!is_expired("01/25", date(2025, 1, 1)));
        assert!(is_expired("01/25", date(2025, 1, 2)));
        assert!(is_expired("01/25", date(2025, 2, 1)));
        assert!(!is_expired("02/25", date(2025, 1, 31)));
    }

    #[test]
    fn test_payment_cvv() {
        let mut p = payment();
        p.cvv = "12".to_owned();
        assert_eq!(
            validate_payment(&p, date(2026, 1, 1)).unwrap_err().get("cvv"),
            Some("CVV must be 3 or 4 digits")
        );
        p.cvv = "1234".to_owned();
        assert!(validate_payment(&p, date(2026, 1, 1)).is_ok());
    }

    #[test]
    fn test_payment_all_missing() {
        let errors = validate_payment(&Payment::default(), date(2026, 1, 1)).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("name_on_card"), Some("Name on card is required"));
    }

    #[test]
    fn test_login_required_fields() {
        let errors = validate_login("", " ").unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(validate_login("jane@example.com", "pw").is_ok());
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let errors = validate_login("jane.example.com", "pw").unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert!(!errors.has("password"));
        assert_eq!(errors.len(), 1);
    }
}
