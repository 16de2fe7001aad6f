use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Token service and credential checker.
///
/// Issues and verifies stateless HS256 identity tokens and checks passwords against
/// stored Argon2 hashes. The signing secret is fixed at construction and never
/// changes for the lifetime of the value.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// A freshly minted access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
        }
    }

    /// Replace the password hasher (e.g. with cheaper parameters in tests).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<IssuedToken, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject)?)
    }

    /// Issue a token for `subject`, valid from now for the configured TTL.
    pub fn issue_token(&self, subject: impl ToString) -> Result<IssuedToken, JwtError> {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if the current time were `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - TTL is not positive, or signing failed
    pub fn issue_token_at(
        &self,
        subject: impl ToString,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_subject(subject, now, self.token_ttl);
        if claims.exp <= claims.iat {
            return Err(JwtError::EncodingFailed(
                "token lifetime must be at least one second".to_string(),
            ));
        }

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("expiration out of range".to_string()))?;
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    /// Verify a token and return its subject.
    pub fn verify_token(&self, token: &str) -> Result<String, JwtError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now` and return its subject.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this secret and algorithm
    /// * `Expired` - `now` is at or past the token's expiration
    /// * `Malformed` - Token or claims cannot be parsed, or the validity window is invalid
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;
        let now = now.timestamp();

        if claims.is_expired(now) {
            return Err(JwtError::Expired);
        }
        if !claims.is_well_formed(now) {
            return Err(JwtError::Malformed(
                "claims outside of their validity window".to_string(),
            ));
        }

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator() -> Authenticator {
        Authenticator::new(SECRET, Duration::hours(1)).with_password_hasher(
            PasswordHasher::with_params(1024, 1, 1).expect("Failed to build hasher"),
        )
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let issued = authenticator
            .authenticate(password, &hash, "user123")
            .expect("Authentication failed");

        assert!(!issued.access_token.is_empty());

        let subject = authenticator
            .verify_token(&issued.access_token)
            .expect("Token validation failed");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issue_sets_expiration_from_ttl() {
        let authenticator = authenticator();
        let now = Utc::now();

        let issued = authenticator
            .issue_token_at("user123", now)
            .expect("Failed to issue token");

        assert_eq!(
            issued.expires_at.timestamp(),
            now.timestamp() + Duration::hours(1).num_seconds()
        );
    }

    #[test]
    fn test_verify_within_ttl_is_idempotent() {
        let authenticator = authenticator();
        let now = Utc::now();
        let issued = authenticator.issue_token_at("user123", now).unwrap();

        for offset in [0, 1, 1800, 3599] {
            let subject = authenticator
                .verify_token_at(&issued.access_token, now + Duration::seconds(offset))
                .expect("Token should be valid within its TTL");
            assert_eq!(subject, "user123");
        }
    }

    #[test]
    fn test_verify_after_expiration() {
        let authenticator = authenticator();
        let now = Utc::now();
        let issued = authenticator.issue_token_at("user123", now).unwrap();

        let at_expiry = authenticator.verify_token_at(&issued.access_token, issued.expires_at);
        assert_eq!(at_expiry, Err(JwtError::Expired));

        let later = authenticator
            .verify_token_at(&issued.access_token, issued.expires_at + Duration::days(3));
        assert_eq!(later, Err(JwtError::Expired));
    }

    #[test]
    fn test_verify_token_from_the_past_is_expired() {
        let authenticator = authenticator();
        let issued = authenticator
            .issue_token_at("user123", Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(
            authenticator.verify_token(&issued.access_token),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_verify_before_issued_at_is_malformed() {
        let authenticator = authenticator();
        let now = Utc::now();
        let issued = authenticator.issue_token_at("user123", now).unwrap();

        let result =
            authenticator.verify_token_at(&issued.access_token, now - Duration::minutes(5));
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_verify_with_other_secret() {
        let issuer = Authenticator::new(b"another_secret_key_at_least_32_bytes", Duration::hours(1));
        let issued = issuer.issue_token("user123").unwrap();

        assert_eq!(
            authenticator().verify_token(&issued.access_token),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_invalid_token() {
        let result = authenticator().verify_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_issue_with_non_positive_ttl() {
        let authenticator = Authenticator::new(SECRET, Duration::zero());

        let result = authenticator.issue_token("user123");
        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }
}
