use crate::auth::require_auth;
use crate::handlers::{
    auth::{login, register},
    health::health_check,
    investors::{
        create_investor, get_investor_state, list_investors, list_investors_above_threshold,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Every investor route sits behind the bearer token gate
    let investor_routes = Router::new()
        .route("/investors", post(create_investor))
        .route("/investors", get(list_investors))
        .route("/investors/greater", get(list_investors_above_threshold))
        .route("/investors/:id/state", get(get_investor_state))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Identity routes
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(investor_routes)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
