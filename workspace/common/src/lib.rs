//! Common transport-layer types shared between backend and frontend.
//! These structs are the JSON payloads of the REST API, so the frontend can
//! deserialize responses without duplicating shapes.

mod format;

pub use format::format_amount;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Threshold used by `GET /investors/greater` when no amount is supplied.
pub const DEFAULT_THRESHOLD: i64 = 15_000;

/// Human-readable validity window of an issued token.
pub const TOKEN_VALIDITY: &str = "1h";

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// ===================== Identity =====================

/// Username/password pair used by both register and login.
#[derive(Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registered user as returned by `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// Validity window, always `"1h"`
    #[schema(example = "1h")]
    pub expires_in: String,
}

// ===================== Investors =====================

/// Request body for creating an investor, as sent by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CreateInvestorRequest {
    pub name: String,
    pub surname: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 30000.0)]
    pub investment: Decimal,
}

/// Minimal view of the user who registered an investor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RegisteredBy {
    pub id: i32,
    pub username: String,
}

/// Investor as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestorDto {
    pub id: i32,
    pub name: String,
    pub surname: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub investment: Decimal,
    pub registered_by: Option<RegisteredBy>,
}

/// Investor as returned by `POST /investors`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvestorDto {
    pub id: i32,
    pub name: String,
    pub surname: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub investment: Decimal,
    pub registered_by_id: Option<i32>,
    pub registered_by: Option<RegisteredBy>,
}

impl From<CreatedInvestorDto> for InvestorDto {
    fn from(created: CreatedInvestorDto) -> Self {
        Self {
            id: created.id,
            name: created.name,
            surname: created.surname,
            investment: created.investment,
            registered_by: created.registered_by,
        }
    }
}

/// Result of the state routine for one investor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct InvestorStateDto {
    /// `active` or `inactive`
    #[schema(example = "active")]
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_investor_dto_wire_shape() {
        let dto = InvestorDto {
            id: 1,
            name: "Luis".to_string(),
            surname: "Pérez".to_string(),
            investment: Decimal::new(3_000_050, 2),
            registered_by: Some(RegisteredBy {
                id: 7,
                username: "ana".to_string(),
            }),
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Luis",
                "surname": "Pérez",
                "investment": 30000.5,
                "registeredBy": {"id": 7, "username": "ana"}
            })
        );
    }

    #[test]
    fn test_created_investor_carries_owner_id() {
        let value = json!({
            "id": 3,
            "name": "Luis",
            "surname": "Pérez",
            "investment": 30000,
            "registeredById": 7,
            "registeredBy": null
        });
        let created: CreatedInvestorDto = serde_json::from_value(value).unwrap();
        assert_eq!(created.registered_by_id, Some(7));
        assert_eq!(created.investment, Decimal::from(30_000));

        let listed = InvestorDto::from(created);
        assert_eq!(listed.registered_by, None);
    }

    #[test]
    fn test_login_response_uses_camel_case() {
        let response = LoginResponse {
            token: "t".to_string(),
            expires_in: TOKEN_VALIDITY.to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"token": "t", "expiresIn": "1h"}));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            username: "ana".to_string(),
            password: "pw1".to_string(),
        };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("ana"));
        assert!(!printed.contains("pw1"));
    }
}
