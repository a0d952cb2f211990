use super::post;
use common::{Credentials, LoginResponse, UserDto};

/// Register a new user
pub async fn register(credentials: &Credentials) -> Result<UserDto, String> {
    log::debug!("Registering user {}", credentials.username);
    post("/auth/register", credentials, None).await
}

/// Exchange credentials for a bearer token
pub async fn login(credentials: &Credentials) -> Result<LoginResponse, String> {
    log::debug!("Logging in user {}", credentials.username);
    post("/auth/login", credentials, None).await
}
