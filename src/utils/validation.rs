use axum::{http::StatusCode, Json};
use serde_json::json;
use sqlx::types::BigDecimal;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

const MAX_PRICE_EXCLUSIVE: u64 = 100_000_000;

pub fn into_response(errors: ValidationErrors) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })))
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    match value.trim().is_empty() {
        false => Ok(()),
        true => Err(ValidationError::new("BLANK").with_message(Cow::from("Must not be blank"))),
    }
}

pub fn validate_verification_code(code: &str) -> Result<(), ValidationError> {
    match code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        true => Ok(()),
        false => Err(ValidationError::new("INVALID_CODE")
            .with_message(Cow::from("Code must be 6 digits"))),
    }
}

/// Prices fit `NUMERIC(10, 2)`: non-negative, below 10^8, at most two decimals.
pub fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::from(0) {
        return Err(ValidationError::new("INVALID_PRICE")
            .with_message(Cow::from("Price must not be negative")));
    }
    if *price >= BigDecimal::from(MAX_PRICE_EXCLUSIVE) {
        return Err(ValidationError::new("INVALID_PRICE")
            .with_message(Cow::from("Price must be less than 100000000")));
    }
    if price.with_scale(2) != *price {
        return Err(ValidationError::new("INVALID_PRICE")
            .with_message(Cow::from("Price must have at most two decimal places")));
    }

    Ok(())
}

pub fn validate_spice_level(spice_level: i16) -> Result<(), ValidationError> {
    match (0..=5).contains(&spice_level) {
        true => Ok(()),
        false => Err(ValidationError::new("INVALID_SPICE_LEVEL")
            .with_message(Cow::from("Spice level must be between 0 and 5"))),
    }
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    use validator::ValidateUrl;

    match url.validate_url() {
        true => Ok(()),
        false => Err(ValidationError::new("INVALID_URL").with_message(Cow::from("Invalid URL"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn normalizes_emails() {
        assert_eq!(normalize_email("  Owner@Example.COM "), "owner@example.com");
    }

    #[test]
    fn rejects_blank_values() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("Pizza").is_ok());
    }

    #[test]
    fn rejects_negative_prices() {
        assert!(validate_price(&BigDecimal::from_str("-0.01").unwrap()).is_err());
        assert!(validate_price(&BigDecimal::from_str("0").unwrap()).is_ok());
        assert!(validate_price(&BigDecimal::from_str("12.50").unwrap()).is_ok());
    }

    #[test]
    fn rejects_prices_outside_the_column() {
        let price = |raw: &str| validate_price(&BigDecimal::from_str(raw).unwrap());

        assert!(price("99999999.99").is_ok());
        assert!(price("12.500").is_ok());
        assert!(price("100000000").is_err());
        assert!(price("1e9").is_err());
        assert!(price("12.345").is_err());
    }

    #[test]
    fn verification_codes_are_six_digits() {
        assert!(validate_verification_code("012345").is_ok());
        assert!(validate_verification_code("12345").is_err());
        assert!(validate_verification_code("12345a").is_err());
        assert!(validate_verification_code("１２３４５６").is_err());
    }

    #[test]
    fn bounds_spice_level() {
        assert!(validate_spice_level(-1).is_err());
        assert!(validate_spice_level(0).is_ok());
        assert!(validate_spice_level(5).is_ok());
        assert!(validate_spice_level(6).is_err());
    }

    #[test]
    fn checks_urls() {
        assert!(validate_url("https://cdn.example.com/dish.png").is_ok());
        assert!(validate_url("not a url").is_err());
    }
}
