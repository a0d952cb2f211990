use std::collections::{BTreeSet, HashMap};

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use common::{
    CreatedInvestorDto, DEFAULT_THRESHOLD, InvestorDto, InvestorStateDto, RegisteredBy,
};
use model::entities::{investor, user};
use routines::InvestorRow;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::IntoParams;
use validator::Validate;

use super::ApiJson;
use super::auth::text;
use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, internal};
use crate::schemas::AppState;

const INVESTMENT_INVALID: &str = "investment must be a non-negative number";
const AMOUNT_INVALID: &str = "amount must be a non-negative number";
const STATE_FAILED: &str = "Failed to get investor state, try again later";

/// Investor fields as sent by the client, checked by [`CreateInvestorPayload::into_checked`]
#[derive(Deserialize)]
pub struct CreateInvestorPayload {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    surname: Option<Value>,
    #[serde(default)]
    investment: Option<Value>,
}

#[derive(Debug, Validate)]
struct NewInvestor {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(length(min = 1, message = "surname is required"))]
    surname: String,
    #[validate(
        required(message = "investment must be a non-negative number"),
        range(min = 0.0, message = "investment must be a non-negative number")
    )]
    investment: Option<f64>,
}

impl CreateInvestorPayload {
    fn into_checked(self) -> Result<(String, String, Decimal), ApiError> {
        let checked = NewInvestor {
            name: text(self.name).trim().to_string(),
            surname: text(self.surname).trim().to_string(),
            investment: match self.investment {
                Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
                _ => None,
            },
        };
        checked
            .validate()
            .map_err(|e| ApiError::from_validation(&e, &["name", "surname", "investment"]))?;

        let investment = checked
            .investment
            .map(saturating_decimal)
            .map(|d| d.round_dp(2))
            .ok_or_else(|| ApiError::Validation(INVESTMENT_INVALID.to_string()))?;

        Ok((checked.name, checked.surname, investment))
    }
}

/// Query parameters for the threshold listing
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThresholdQuery {
    /// Minimum investment, inclusive (default 15000)
    pub amount: Option<String>,
}

fn parse_threshold(raw: Option<&str>) -> Result<Decimal, ApiError> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Ok(Decimal::from(DEFAULT_THRESHOLD));
    }

    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(saturating_decimal)
        .ok_or_else(|| ApiError::Validation(AMOUNT_INVALID.to_string()))
}

/// Finite, non-negative `value` as a `Decimal`, clamped to `Decimal::MAX`
fn saturating_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::MAX)
}

fn parse_investor_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= f64::from(i32::MAX))
        .map(|v| v as i32)
        .ok_or_else(|| ApiError::Validation("Invalid investor id".to_string()))
}

fn registered_by(owner: Option<user::Model>) -> Option<RegisteredBy> {
    owner.map(|u| RegisteredBy {
        id: u.id,
        username: u.username,
    })
}

/// Register a new investor attributed to the caller
#[utoipa::path(
    post,
    path = "/investors",
    tag = "investors",
    request_body = common::CreateInvestorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Investor created", body = CreatedInvestorDto),
        (status = 400, description = "Invalid investor fields", body = common::ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = common::ErrorResponse),
        (status = 500, description = "Internal server error", body = common::ErrorResponse)
    )
)]
#[instrument(skip(state, requester, payload))]
pub async fn create_investor(
    State(state): State<AppState>,
    requester: Option<Extension<AuthenticatedUser>>,
    ApiJson(payload): ApiJson<CreateInvestorPayload>,
) -> Result<(StatusCode, Json<CreatedInvestorDto>), ApiError> {
    trace!("Entering create_investor function");
    let (name, surname, investment) = payload.into_checked()?;

    let Some(Extension(requester)) = requester else {
        error!("create_investor reached without an authenticated user");
        return Err(ApiError::Internal("failed to create investor".to_string()));
    };
    debug!(
        "Creating investor {} {} with investment {} for user {}",
        name, surname, investment, requester.id
    );

    let new_investor = investor::ActiveModel {
        name: Set(name),
        surname: Set(surname),
        investment: Set(investment),
        registered_by_id: Set(Some(requester.id)),
        ..Default::default()
    };

    let created = new_investor
        .insert(&state.db)
        .await
        .map_err(internal("failed to create investor"))?;

    info!("Investor created with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedInvestorDto {
            id: created.id,
            name: created.name,
            surname: created.surname,
            investment: created.investment,
            registered_by_id: created.registered_by_id,
            registered_by: Some(RegisteredBy {
                id: requester.id,
                username: requester.username,
            }),
        }),
    ))
}

/// List every investor by ascending id
#[utoipa::path(
    get,
    path = "/investors",
    tag = "investors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All investors", body = Vec<InvestorDto>),
        (status = 403, description = "Missing or invalid token", body = common::ErrorResponse),
        (status = 500, description = "Internal server error", body = common::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_investors(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvestorDto>>, ApiError> {
    trace!("Entering list_investors function");

    let rows = investor::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(investor::Column::Id)
        .all(&state.db)
        .await
        .map_err(internal("failed to list investors"))?;

    debug!("Retrieved {} investors from database", rows.len());
    let investors = rows
        .into_iter()
        .map(|(row, owner)| InvestorDto {
            id: row.id,
            name: row.name,
            surname: row.surname,
            investment: row.investment,
            registered_by: registered_by(owner),
        })
        .collect();

    Ok(Json(investors))
}

/// List investors whose investment meets the threshold
#[utoipa::path(
    get,
    path = "/investors/greater",
    tag = "investors",
    params(ThresholdQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Investors at or above the threshold", body = Vec<InvestorDto>),
        (status = 400, description = "Invalid amount", body = common::ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = common::ErrorResponse),
        (status = 500, description = "Internal server error", body = common::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_investors_above_threshold(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
) -> Result<Json<Vec<InvestorDto>>, ApiError> {
    trace!("Entering list_investors_above_threshold function");
    let amount = parse_threshold(query.amount.as_deref())?;
    debug!(
        "Listing investors >= {} via {} routines",
        amount,
        state.routines.name()
    );

    let rows: Vec<InvestorRow> = state
        .routines
        .fetch_above_threshold(&state.db, amount)
        .await
        .map_err(internal("failed to list investors by threshold"))?;

    let owner_ids: BTreeSet<i32> = rows.iter().filter_map(|r| r.registered_by_id).collect();
    let owners: HashMap<i32, user::Model> = if owner_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(owner_ids))
            .all(&state.db)
            .await
            .map_err(internal("failed to list investors by threshold"))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };

    info!("Threshold listing returned {} investors", rows.len());
    let investors = rows
        .into_iter()
        .map(|row| InvestorDto {
            registered_by: registered_by(
                row.registered_by_id.and_then(|id| owners.get(&id).cloned()),
            ),
            id: row.id,
            name: row.name,
            surname: row.surname,
            investment: row.investment,
        })
        .collect();

    Ok(Json(investors))
}

/// Activity state of one investor
#[utoipa::path(
    get,
    path = "/investors/{id}/state",
    tag = "investors",
    params(
        ("id" = i32, Path, description = "Investor ID"),
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Investor state", body = InvestorStateDto),
        (status = 400, description = "Invalid investor id", body = common::ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = common::ErrorResponse),
        (status = 404, description = "Investor not found", body = common::ErrorResponse),
        (status = 500, description = "Internal server error", body = common::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_investor_state(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<InvestorStateDto>, ApiError> {
    trace!("Entering get_investor_state function");
    let investor_id = parse_investor_id(&raw_id)?;

    let existing = investor::Entity::find_by_id(investor_id)
        .one(&state.db)
        .await
        .map_err(internal(STATE_FAILED))?;
    if existing.is_none() {
        warn!("Investor with ID {} not found", investor_id);
        return Err(ApiError::NotFound("Investor not found".to_string()));
    }

    match state.routines.compute_state(&state.db, investor_id).await {
        Ok(Some(investor_state)) => {
            debug!("Investor {} is {}", investor_id, investor_state);
            Ok(Json(InvestorStateDto {
                state: investor_state.to_string(),
            }))
        }
        Ok(None) => {
            warn!("State routine returned no value for investor {}", investor_id);
            Err(ApiError::NotFound(
                "Investor not found or function returned no value".to_string(),
            ))
        }
        Err(e) => Err(internal(STATE_FAILED)(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> CreateInvestorPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_investor_payload_is_trimmed_and_rounded() {
        let (name, surname, investment) =
            payload(json!({"name": " Luis ", "surname": "Pérez ", "investment": 30000.456}))
                .into_checked()
                .unwrap();
        assert_eq!(name, "Luis");
        assert_eq!(surname, "Pérez");
        assert_eq!(investment, Decimal::new(3_000_046, 2));
    }

    #[test]
    fn test_investor_payload_errors_in_field_order() {
        let err = payload(json!({"name": "", "surname": "", "investment": -1}))
            .into_checked()
            .unwrap_err();
        assert_eq!(err.to_string(), "name is required");

        let err = payload(json!({"name": "Luis", "investment": -1}))
            .into_checked()
            .unwrap_err();
        assert_eq!(err.to_string(), "surname is required");

        let err = payload(json!({"name": "Luis", "surname": "Pérez", "investment": -1}))
            .into_checked()
            .unwrap_err();
        assert_eq!(err.to_string(), INVESTMENT_INVALID);
    }

    #[test]
    fn test_investment_must_be_a_json_number() {
        for investment in [json!("30000"), json!(null), json!(true)] {
            let err = payload(json!({"name": "Luis", "surname": "Pérez", "investment": investment}))
                .into_checked()
                .unwrap_err();
            assert_eq!(err.to_string(), INVESTMENT_INVALID);
        }

        let (_, _, zero) = payload(json!({"name": "A", "surname": "B", "investment": 0}))
            .into_checked()
            .unwrap();
        assert_eq!(zero, Decimal::ZERO);

        let (_, _, huge) = payload(json!({"name": "A", "surname": "B", "investment": 1e30}))
            .into_checked()
            .unwrap();
        assert_eq!(huge, Decimal::MAX);
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold(None).unwrap(), Decimal::from(15_000));
        assert_eq!(parse_threshold(Some("")).unwrap(), Decimal::from(15_000));
        assert_eq!(parse_threshold(Some("20000")).unwrap(), Decimal::from(20_000));
        assert_eq!(parse_threshold(Some("0")).unwrap(), Decimal::ZERO);
        assert_eq!(parse_threshold(Some("1e3")).unwrap(), Decimal::from(1_000));

        assert_eq!(parse_threshold(Some("1e30")).unwrap(), Decimal::MAX);
        assert_eq!(parse_threshold(Some("1e308")).unwrap(), Decimal::MAX);

        for bad in ["abc", "-1", "inf", "NaN", "1e400"] {
            let err = parse_threshold(Some(bad)).unwrap_err();
            assert_eq!(err.to_string(), AMOUNT_INVALID);
        }
    }

    #[test]
    fn test_parse_investor_id() {
        assert_eq!(parse_investor_id("1").unwrap(), 1);
        assert_eq!(parse_investor_id("42").unwrap(), 42);

        for bad in ["0", "-3", "1.5", "abc", "", "99999999999"] {
            let err = parse_investor_id(bad).unwrap_err();
            assert_eq!(err.to_string(), "Invalid investor id");
        }
    }
}
