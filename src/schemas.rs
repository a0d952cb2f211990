use std::sync::Arc;

pub use common::ErrorResponse;
use common::{
    CreateInvestorRequest, CreatedInvestorDto, Credentials, InvestorDto, InvestorStateDto,
    LoginResponse, RegisteredBy, UserDto,
};
use routines::InvestorRoutines;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::auth::{CredentialHasher, TokenIssuer};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Password hasher keyed with `HASH_SECRET`
    pub hasher: Arc<CredentialHasher>,
    /// Bearer token issuer keyed with `JWT_SECRET`
    pub tokens: Arc<TokenIssuer>,
    /// Threshold listing and state routines
    pub routines: Arc<dyn InvestorRoutines>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        hasher: CredentialHasher,
        tokens: TokenIssuer,
        routines: Arc<dyn InvestorRoutines>,
    ) -> Self {
        Self {
            db,
            hasher: Arc::new(hasher),
            tokens: Arc::new(tokens),
            routines,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `error`
    pub status: String,
    /// `connected` or `disconnected`
    pub database: String,
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::investors::create_investor,
        crate::handlers::investors::list_investors,
        crate::handlers::investors::list_investors_above_threshold,
        crate::handlers::investors::get_investor_state,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Credentials,
            UserDto,
            LoginResponse,
            CreateInvestorRequest,
            CreatedInvestorDto,
            InvestorDto,
            InvestorStateDto,
            RegisteredBy,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "investors", description = "Investor registry endpoints"),
    ),
    info(
        title = "Investor Registry API",
        description = "Register investors and query them through the database routines",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
