//! Typed request bodies, one per catalog operation.
//!
//! Numbers arrive as JSON numbers or numeric strings; anything else fails at
//! [`parse_request`] with a validation error before reaching the ledger.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::CatalogError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub username: String,
    pub email: String,
    pub new_password: String,
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Decode a JSON request body into one of the request structs above.
pub fn parse_request<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Validation(e.to_string()))
}

macro_rules! redacted_debug {
    ($request:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $request {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($request))
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(SignupRequest { name, email });
redacted_debug!(LoginRequest { email });
redacted_debug!(ChangePasswordRequest { username, email });
redacted_debug!(UpdateUserRequest { name, email });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accepts_numbers_and_numeric_strings() {
        let from_number: AddProductRequest = parse_request(
            r#"{"name":"Latte","description":"Milky","category":"Coffee","price":4.5,"quantity":12}"#,
        )
        .unwrap();
        let from_string: AddProductRequest = parse_request(
            r#"{"name":"Latte","description":"Milky","category":"Coffee","price":"4.50","quantity":12}"#,
        )
        .unwrap();

        assert_eq!(from_number.price, Decimal::new(45, 1));
        assert_eq!(from_string.price, Decimal::new(450, 2));
        assert_eq!(from_number.quantity, 12);
    }

    #[test]
    fn test_non_numeric_price_is_a_validation_error() {
        let result: Result<AddProductRequest, _> = parse_request(
            r#"{"name":"Latte","description":"Milky","category":"Coffee","price":"free","quantity":1}"#,
        );
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_missing_field_is_a_validation_error() {
        let result: Result<AddProductRequest, _> =
            parse_request(r#"{"name":"Latte","price":4,"quantity":1}"#);
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_update_quantity_is_optional() {
        let request: UpdateProductRequest = parse_request(
            r#"{"name":"Latte","description":"Milky","category":"Coffee","price":5}"#,
        )
        .unwrap();
        assert_eq!(request.quantity, None);
    }

    #[test]
    fn test_change_password_uses_camel_case() {
        let request: ChangePasswordRequest = parse_request(
            r#"{"username":"alice","email":"alice@example.com","newPassword":"n3w"}"#,
        )
        .unwrap();
        assert_eq!(request.new_password, "n3w");
    }

    #[test]
    fn test_debug_omits_passwords() {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("alice@example.com"));
        assert!(!rendered.contains("secret123"));
    }
}
