//! Credential hashing, bearer tokens and the gate protecting investor routes.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{AuthenticatedUser, require_auth};
pub use password::CredentialHasher;
pub use token::TokenIssuer;

use thiserror::Error;

/// Errors raised while loading secrets, hashing or handling tokens
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} must be set")]
    MissingSecret(&'static str),

    #[error("HASH_SECRET is not valid base64: {0}")]
    InvalidHashSecret(base64::DecodeError),

    #[error("HASH_SECRET cannot be used as an HMAC key")]
    UnusableHashKey,

    #[error("stored password hash is not valid base64: {0}")]
    MalformedHash(base64::DecodeError),

    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("invalid or expired token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
}
