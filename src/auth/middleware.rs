use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::{debug, trace, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

const MISSING_HEADER: &str = "Missing or invalid Authorization header";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Identity attached to a request that passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

/// Rejects requests without a valid bearer token with 403.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    trace!("Checking bearer token for {}", request.uri().path());

    let Some(token) = bearer_token(request.headers()) else {
        warn!("Request to {} without a bearer token", request.uri().path());
        return Err(ApiError::Authorization(MISSING_HEADER.to_string()));
    };

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Authorization(INVALID_TOKEN.to_string())
    })?;

    debug!("Authenticated user {} ({})", claims.sub, claims.username);
    request.extensions_mut().insert(AuthenticatedUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("Bearer ")), Some(""));
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
