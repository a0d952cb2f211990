use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Keyed one-way transform of passwords.
///
/// Hashes are `base64(HMAC-SHA256(key, password))`. The key is decoded once at
/// startup and the keyed MAC state is cloned for every operation.
#[derive(Clone)]
pub struct CredentialHasher {
    mac: HmacSha256,
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl CredentialHasher {
    /// Builds a hasher from the base64-encoded `HASH_SECRET`.
    pub fn from_base64_secret(secret: &str) -> Result<Self, AuthError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(AuthError::MissingSecret("HASH_SECRET"));
        }

        let key = STANDARD
            .decode(secret)
            .map_err(AuthError::InvalidHashSecret)?;
        let mac = HmacSha256::new_from_slice(&key).map_err(|_| AuthError::UnusableHashKey)?;

        Ok(Self { mac })
    }

    pub fn hash(&self, password: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of `password` against a stored hash.
    ///
    /// A stored value that is not base64 is an error; a decodable value of the
    /// wrong length simply does not match.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let expected = STANDARD
            .decode(stored_hash)
            .map_err(AuthError::MalformedHash)?;

        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        Ok(mac.verify_slice(&expected).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::from_base64_secret("dGVzdC1oYXNoLXNlY3JldA==").unwrap()
    }

    #[test]
    fn test_hash_matches_known_hmac_vector() {
        let hasher = CredentialHasher::from_base64_secret("a2V5").unwrap();
        assert_eq!(
            hasher.hash("The quick brown fox jumps over the lazy dog"),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test]
    fn test_hash_is_deterministic_and_verifies() {
        let hasher = hasher();
        let first = hasher.hash("pw1");
        let second = hasher.hash("pw1");

        assert_eq!(first, second);
        assert_ne!(first, "pw1");
        assert!(hasher.verify("pw1", &first).unwrap());
    }

    #[test]
    fn test_distinct_passwords_do_not_verify() {
        let hasher = hasher();
        let stored = hasher.hash("pw1");
        assert!(!hasher.verify("pw2", &stored).unwrap());
        assert!(!hasher.verify("", &stored).unwrap());
    }

    #[test]
    fn test_different_keys_produce_different_hashes() {
        let other = CredentialHasher::from_base64_secret("b3RoZXItc2VjcmV0").unwrap();
        let stored = hasher().hash("pw1");
        assert_ne!(other.hash("pw1"), stored);
        assert!(!other.verify("pw1", &stored).unwrap());
    }

    #[test]
    fn test_wrong_length_hash_does_not_match() {
        let hasher = hasher();
        assert!(!hasher.verify("pw1", "c2hvcnQ=").unwrap());
    }

    #[test]
    fn test_non_base64_hash_is_an_error() {
        let result = hasher().verify("pw1", "not base64 at all!");
        assert!(matches!(result, Err(AuthError::MalformedHash(_))));
    }

    #[test]
    fn test_secret_must_be_present_and_base64() {
        assert!(matches!(
            CredentialHasher::from_base64_secret("   "),
            Err(AuthError::MissingSecret("HASH_SECRET"))
        ));
        assert!(matches!(
            CredentialHasher::from_base64_secret("***"),
            Err(AuthError::InvalidHashSecret(_))
        ));
    }
}
