//! Session token issuance and validation
//!
//! Tokens are compact JWTs signed with HS256 (HMAC-SHA256). A token is fully
//! self-contained: subject, expiry and signature travel together, so
//! validation needs nothing but the signing secret and the clock.
//!
//! # Security
//!
//! - **Algorithm**: HS256, pinned on validation (no `alg` negotiation)
//! - **Expiration**: fixed TTL from [`TokenConfig`], default 24 hours
//! - **Leeway**: none; a token is rejected the second it expires
//! - **Secret**: injected at construction, never read from globals
//!
//! Issued tokens cannot be revoked; they stay valid until they expire.
//!
//! # Example
//!
//! ```
//! use tasktrack_shared::auth::jwt::{TokenConfig, TokenService};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TokenService::new(&TokenConfig::new("a-secret-of-at-least-32-bytes!!!"))?;
//!
//! let session = service.issue("alice")?;
//! let claims = service.validate(&session.token)?;
//! assert_eq!(claims.sub, "alice");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer embedded in and required of every token
pub const TOKEN_ISSUER: &str = "tasktrack";

/// Default token lifetime (24 hours)
pub const DEFAULT_TTL_SECONDS: i64 = 86_400;

/// Longest accepted token lifetime (one year)
pub const MAX_TTL_SECONDS: i64 = 365 * 86_400;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Service configuration is unusable
    #[error("Invalid token configuration: {0}")]
    InvalidConfig(String),

    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature does not match the payload
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was issued by someone else
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Token is not a well-formed JWT or is missing claims
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),
}

/// Token signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC secret shared by issuer and validator
    pub secret: String,

    /// Lifetime of issued tokens in seconds
    pub ttl_seconds: i64,
}

impl TokenConfig {
    /// Creates a configuration with the default 24 hour TTL
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Overrides the token lifetime
    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// JWT claims
///
/// - `sub`: Subject (username)
/// - `iss`: Issuer (always "tasktrack")
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - Username
    pub sub: String,

    /// Issuer - Always "tasktrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    fn new(subject: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::CreateError("Token expiry out of range".to_string()))?;

        Ok(Self {
            sub: subject.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A freshly issued session token
///
/// `token` is the opaque bearer string handed to the client; the remaining
/// fields describe what it encodes.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    /// Compact signed JWT
    pub token: String,

    /// Username the token was issued for
    pub subject: String,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token stops validating
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates stateless session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service from configuration
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidConfig` if the secret is empty or the TTL
    /// is not positive (every token must satisfy `exp > iat`).
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::InvalidConfig("secret must not be empty".to_string()));
        }
        if config.ttl_seconds <= 0 || config.ttl_seconds > MAX_TTL_SECONDS {
            return Err(TokenError::InvalidConfig(format!(
                "ttl must be between 1 and {} seconds, got {}",
                MAX_TTL_SECONDS, config.ttl_seconds
            )));
        }
        let ttl = Duration::try_seconds(config.ttl_seconds).ok_or_else(|| {
            TokenError::InvalidConfig(format!("ttl out of range: {} seconds", config.ttl_seconds))
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `subject` expiring one TTL from now
    pub fn issue(&self, subject: &str) -> Result<SessionToken, TokenError> {
        let now = Utc::now();
        let claims = Claims::new(subject, now, self.ttl)?;
        let token = self.sign(&claims)?;

        Ok(SessionToken {
            token,
            subject: claims.sub.clone(),
            issued_at: now,
            expires_at: claims.expires_at(),
        })
    }

    /// Validates a token and returns its claims
    ///
    /// Verifies, without any I/O:
    /// - the HS256 signature
    /// - the issuer
    /// - that `exp` has not passed
    /// - that the subject is present and non-empty
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                _ => TokenError::InvalidFormat(e.to_string()),
            },
        )?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(TokenError::InvalidFormat("empty subject".to_string()));
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn service() -> TokenService {
        TokenService::new(&TokenConfig::new(SECRET)).unwrap()
    }

    #[test]
    fn test_default_ttl() {
        assert_eq!(service().ttl(), Duration::hours(24));
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            TokenService::new(&TokenConfig::new("")),
            Err(TokenError::InvalidConfig(_))
        ));
        assert!(matches!(
            TokenService::new(&TokenConfig::new(SECRET).with_ttl_seconds(0)),
            Err(TokenError::InvalidConfig(_))
        ));
        assert!(matches!(
            TokenService::new(&TokenConfig::new(SECRET).with_ttl_seconds(-60)),
            Err(TokenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_ttl() {
        for ttl_seconds in [MAX_TTL_SECONDS + 1, 10_000_000_000_000, i64::MAX] {
            assert!(matches!(
                TokenService::new(&TokenConfig::new(SECRET).with_ttl_seconds(ttl_seconds)),
                Err(TokenError::InvalidConfig(_))
            ));
        }

        let longest = TokenService::new(&TokenConfig::new(SECRET).with_ttl_seconds(MAX_TTL_SECONDS))
            .unwrap();
        let session = longest.issue("alice").unwrap();
        assert_eq!(
            session.expires_at.timestamp() - session.issued_at.timestamp(),
            MAX_TTL_SECONDS
        );
    }

    #[test]
    fn test_claims_with_unrepresentable_expiry() {
        let result = Claims::new("alice", DateTime::<Utc>::MAX_UTC, Duration::seconds(1));
        assert!(matches!(result, Err(TokenError::CreateError(_))));
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let rendered = format!("{:?}", TokenConfig::new(SECRET));
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_issue_and_validate() {
        let service = service();

        let session = service.issue("alice").expect("Should issue token");
        assert_eq!(session.subject, "alice");
        assert!(session.expires_at > session.issued_at);
        assert_eq!((session.expires_at - session.issued_at).num_hours(), 24);

        let claims = service.validate(&session.token).expect("Should validate token");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let session = service().issue("alice").unwrap();

        let other = TokenService::new(&TokenConfig::new("a-completely-different-secret-value")).unwrap();
        assert!(matches!(
            other.validate(&session.token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_validate_expired_token() {
        let service = service();
        let claims = Claims::new("alice", Utc::now() - Duration::hours(2), Duration::hours(1)).unwrap();
        assert!(claims.is_expired());

        let token = service.sign(&claims).unwrap();
        assert!(matches!(service.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let service = TokenService::new(&TokenConfig::new(SECRET).with_ttl_seconds(1)).unwrap();
        let session = service.issue("alice").unwrap();

        assert!(service.validate(&session.token).is_ok());

        std::thread::sleep(std::time::Duration::from_millis(2100));
        assert!(matches!(service.validate(&session.token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let service = service();
        let mut claims = Claims::new("alice", Utc::now(), Duration::hours(1)).unwrap();
        claims.iss = "someone-else".to_string();

        let token = service.sign(&claims).unwrap();
        assert!(matches!(service.validate(&token), Err(TokenError::InvalidIssuer)));
    }

    #[test]
    fn test_validate_empty_subject() {
        let service = service();
        let claims = Claims::new("", Utc::now(), Duration::hours(1)).unwrap();

        let token = service.sign(&claims).unwrap();
        assert!(matches!(service.validate(&token), Err(TokenError::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_malformed_tokens() {
        let service = service();

        for token in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30."] {
            let result = service.validate(token);
            assert!(result.is_err(), "'{}' should be rejected", token);
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = service();
        let alice = service.issue("alice").unwrap().token;
        let bob = service.issue("bob").unwrap().token;

        // Splice bob's payload onto alice's signature
        let alice_parts: Vec<&str> = alice.split('.').collect();
        let bob_parts: Vec<&str> = bob.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], bob_parts[1], alice_parts[2]);

        assert!(matches!(service.validate(&forged), Err(TokenError::InvalidSignature)));
    }
}
