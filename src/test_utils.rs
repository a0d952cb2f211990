#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use crate::auth::{CredentialHasher, TokenIssuer};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use axum::http::HeaderValue;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use routines::{InvestorRoutines, PortableRoutines};
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{Value, json};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_HASH_SECRET: &str = "dGVzdC1oYXNoLXNlY3JldA==";
    pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing with the given routines implementation
    pub async fn setup_test_app_state_with(routines: Arc<dyn InvestorRoutines>) -> AppState {
        let db = setup_test_db().await;
        let hasher = CredentialHasher::from_base64_secret(TEST_HASH_SECRET)
            .expect("Failed to build test hasher");
        let tokens = TokenIssuer::new(TEST_JWT_SECRET).expect("Failed to build test token issuer");

        AppState::new(db, hasher, tokens, routines)
    }

    /// Create AppState for testing backed by the portable routines
    pub async fn setup_test_app_state() -> AppState {
        setup_test_app_state_with(Arc::new(PortableRoutines::default())).await
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Create a test server over a fresh database
    pub async fn setup_test_server() -> TestServer {
        TestServer::new(setup_test_app().await).expect("Failed to start test server")
    }

    /// Register `username` and log in, returning the bearer token
    pub async fn register_and_login(server: &TestServer, username: &str, password: &str) -> String {
        let credentials = json!({"username": username, "password": password});
        server
            .post("/auth/register")
            .json(&credentials)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let login: Value = server.post("/auth/login").json(&credentials).await.json();
        login["token"]
            .as_str()
            .expect("login response has a token")
            .to_string()
    }

    /// `Authorization` header value for `token`
    pub fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
    }
}
