use std::fmt;

use axum::{extract::State, http::StatusCode, response::Json};
use common::{LoginResponse, TOKEN_VALIDITY, UserDto};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, trace, warn};
use validator::Validate;

use super::ApiJson;
use crate::error::{ApiError, internal};
use crate::schemas::AppState;

const USERNAME_TAKEN: &str = "username already registered";
const INVALID_LOGIN: &str = "invalid username or password";

/// Credentials as sent by the client. Fields of the wrong JSON type are
/// treated as missing.
#[derive(Deserialize, Default)]
pub struct CredentialsPayload {
    #[serde(default)]
    username: Option<Value>,
    #[serde(default)]
    password: Option<Value>,
}

#[derive(Validate)]
struct CheckedCredentials {
    #[validate(length(min = 1, message = "username is required"))]
    username: String,
    #[validate(length(min = 1, message = "password is required"))]
    password: String,
}

impl fmt::Debug for CheckedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialsPayload {
    fn into_checked(self) -> Result<CheckedCredentials, ApiError> {
        let checked = CheckedCredentials {
            username: text(self.username).trim().to_string(),
            password: text(self.password),
        };
        checked
            .validate()
            .map_err(|e| ApiError::from_validation(&e, &["username", "password"]))?;
        Ok(checked)
    }
}

pub(crate) fn text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = common::Credentials,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Missing username or password", body = common::ErrorResponse),
        (status = 409, description = "Username already registered", body = common::ErrorResponse),
        (status = 500, description = "Internal server error", body = common::ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsPayload>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    trace!("Entering register function");
    let credentials = payload.into_checked()?;
    debug!("Registering username: {}", credentials.username);

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(credentials.username.as_str()))
        .one(&state.db)
        .await
        .map_err(internal("registration failed"))?;
    if existing.is_some() {
        warn!("Username '{}' is already registered", credentials.username);
        return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let new_user = user::ActiveModel {
        username: Set(credentials.username.clone()),
        password: Set(state.hasher.hash(&credentials.password)),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User registered with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            Ok((
                StatusCode::CREATED,
                Json(UserDto {
                    id: user_model.id,
                    username: user_model.username,
                }),
            ))
        }
        Err(db_error) => match db_error.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                warn!(
                    "Username '{}' was registered concurrently",
                    credentials.username
                );
                Err(ApiError::Conflict(USERNAME_TAKEN.to_string()))
            }
            _ => {
                error!(
                    "Failed to register user '{}': {}",
                    credentials.username, db_error
                );
                Err(ApiError::Internal("registration failed".to_string()))
            }
        },
    }
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = common::Credentials,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = common::ErrorResponse),
        (status = 401, description = "Invalid username or password", body = common::ErrorResponse),
        (status = 500, description = "Internal server error", body = common::ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    trace!("Entering login function");
    let credentials = payload.into_checked()?;
    debug!("Login attempt for username: {}", credentials.username);

    let found = user::Entity::find()
        .filter(user::Column::Username.eq(credentials.username.as_str()))
        .one(&state.db)
        .await
        .map_err(internal("login failed"))?;

    let Some(user_model) = found else {
        warn!("Login failed: unknown username '{}'", credentials.username);
        return Err(ApiError::Authentication(INVALID_LOGIN.to_string()));
    };

    let matches = state
        .hasher
        .verify(&credentials.password, &user_model.password)
        .map_err(internal("login failed"))?;
    if !matches {
        warn!("Login failed: wrong password for '{}'", credentials.username);
        return Err(ApiError::Authentication(INVALID_LOGIN.to_string()));
    }

    let token = state
        .tokens
        .issue(user_model.id, &user_model.username)
        .map_err(internal("login failed"))?;

    info!("User {} logged in", user_model.id);
    Ok(Json(LoginResponse {
        token,
        expires_in: TOKEN_VALIDITY.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> CredentialsPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_username_is_trimmed() {
        let checked = payload(json!({"username": "  ana ", "password": " pw1 "}))
            .into_checked()
            .unwrap();
        assert_eq!(checked.username, "ana");
        assert_eq!(checked.password, " pw1 ");
    }

    #[test]
    fn test_missing_or_blank_fields() {
        let err = payload(json!({"username": "   ", "password": "pw1"}))
            .into_checked()
            .unwrap_err();
        assert_eq!(err.to_string(), "username is required");

        let err = payload(json!({"username": "ana"})).into_checked().unwrap_err();
        assert_eq!(err.to_string(), "password is required");

        let err = payload(json!({})).into_checked().unwrap_err();
        assert_eq!(err.to_string(), "username is required");
    }

    #[test]
    fn test_debug_output_hides_password() {
        let checked = payload(json!({"username": "ana", "password": "pw1"}))
            .into_checked()
            .unwrap();
        let rendered = format!("{:?}", checked);
        assert!(rendered.contains("ana"));
        assert!(!rendered.contains("pw1"));
    }

    #[test]
    fn test_non_string_fields_count_as_missing() {
        let err = payload(json!({"username": 42, "password": "pw1"}))
            .into_checked()
            .unwrap_err();
        assert_eq!(err.to_string(), "username is required");
    }
}
