//! Field-level checks applied before any request reaches the ledger or store.

use rust_decimal::Decimal;

use super::CatalogError;

pub fn required(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Non-empty as given. Used for secrets, which are compared verbatim.
pub fn present(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn price(value: Decimal) -> Result<Decimal, CatalogError> {
    if value < Decimal::ZERO {
        return Err(CatalogError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    Ok(value)
}

pub fn quantity(value: i64) -> Result<u32, CatalogError> {
    if value < 0 {
        return Err(CatalogError::Validation(
            "quantity must not be negative".to_string(),
        ));
    }
    u32::try_from(value)
        .map_err(|_| CatalogError::Validation(format!("quantity must be at most {}", u32::MAX)))
}

/// `local@domain.tld` with no whitespace and no empty domain labels.
pub fn email(value: &str) -> Result<(), CatalogError> {
    let invalid = || CatalogError::Validation("a valid email is required".to_string());

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("name", "Mocha").is_ok());
        assert_eq!(
            required("name", "   "),
            Err(CatalogError::Validation("name is required".to_string()))
        );
    }

    #[test]
    fn test_present_accepts_whitespace() {
        assert!(present("password", "  ").is_ok());
        assert_eq!(
            present("password", ""),
            Err(CatalogError::Validation("password is required".to_string()))
        );
    }

    #[test]
    fn test_price_and_quantity_bounds() {
        assert!(price(Decimal::ZERO).is_ok());
        assert!(price(Decimal::new(-1, 2)).is_err());
        assert_eq!(quantity(0), Ok(0));
        assert!(quantity(-1).is_err());
        assert!(quantity(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_email_shapes() {
        for good in ["alice@example.com", "a.b+c@cafe.co.uk"] {
            assert!(email(good).is_ok(), "{good} should be accepted");
        }
        for bad in [
            "",
            "alice",
            "@example.com",
            "alice@",
            "alice@example",
            "alice@@example.com",
            "alice@example..com",
            "alice @example.com",
            "alice@.com",
        ] {
            assert!(email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
