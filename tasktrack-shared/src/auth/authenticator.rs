//! Registration, login and token-to-identity resolution
//!
//! The [`Authenticator`] is stateless between calls: everything it needs is
//! either in the credential store or in the presented token.
//!
//! # Failure semantics
//!
//! - `register` with an existing username fails with
//!   [`AuthError::UsernameTaken`], whether the duplicate was caught by the
//!   pre-check or by the store's uniqueness constraint during a race.
//! - `login` fails with [`AuthError::InvalidCredentials`] for an unknown
//!   username and for a wrong password alike. For an unknown username a
//!   verification against a throwaway hash is still performed, so both paths
//!   cost one Argon2 evaluation.
//! - `require_identity` fails with [`AuthError::Unauthenticated`] for a
//!   missing, malformed, forged or expired token.
//!
//! Password hashing runs on tokio's blocking pool and holds no lock.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{
    jwt::{SessionToken, TokenError, TokenService},
    middleware::{parse_bearer, AuthContext},
    password::{PasswordError, PasswordHasher},
};
use crate::models::user::CreateUser;
use crate::store::{CredentialStore, StoreError};

/// Plaintext behind the throwaway hash used for unknown usernames
const DUMMY_PASSWORD: &str = "tasktrack-timing-equalizer";

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration with an existing username
    #[error("Username is already taken")]
    UsernameTaken,

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Missing, malformed or expired session token
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Credential store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing failure
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token signing failure
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Blocking hash task panicked or was cancelled
    #[error("Password hashing task failed: {0}")]
    Blocking(String),
}

/// Orchestrates credential checks and token issuance
pub struct Authenticator {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
    dummy_hash: String,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Creates an authenticator
    ///
    /// Computes one password hash up front (the throwaway hash for unknown
    /// usernames), so construction costs one Argon2 evaluation.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: TokenService,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            credentials,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Token service used for issuing and validating tokens
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Credential store backing this authenticator
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Registers a new identity and issues a token for it
    ///
    /// # Errors
    ///
    /// - `AuthError::UsernameTaken` if the username exists
    /// - `AuthError::Store` / `AuthError::Password` / `AuthError::Token` for
    ///   internal failures
    pub async fn register(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        info!(username, "Attempting to register user");

        if self.credentials.exists_by_username(username).await? {
            warn!(username, "Registration failed - username already exists");
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash_password(password).await?;

        let user = self
            .credentials
            .save(CreateUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::ConstraintViolation(constraint) => {
                    warn!(username, %constraint, "Registration lost race for username");
                    AuthError::UsernameTaken
                }
                other => AuthError::Store(other),
            })?;

        let session = self.tokens.issue(&user.username)?;

        info!(username = %user.username, user_id = user.id, "User successfully registered");
        Ok(session)
    }

    /// Verifies credentials and issues a token
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` for an unknown username or a wrong
    ///   password (indistinguishable)
    /// - `AuthError::Store` / `AuthError::Token` for internal failures
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        debug!(username, "Attempting to authenticate user");

        let user = self.credentials.find_by_username(username).await?;

        let authenticated = match user {
            Some(user) => {
                let matched = self.check_password(password, &user.password_hash).await?;
                matched.then_some(user.username)
            }
            None => {
                self.check_password(password, &self.dummy_hash).await?;
                None
            }
        };

        let Some(subject) = authenticated else {
            warn!(username, "Authentication failed");
            return Err(AuthError::InvalidCredentials);
        };

        let session = self.tokens.issue(&subject)?;

        info!(username = %subject, "User successfully authenticated");
        Ok(session)
    }

    /// Resolves the caller's identity from a raw `Authorization` header value
    ///
    /// Pure computation: validates the bearer token's signature and expiry
    /// without touching the credential store.
    pub fn require_identity(&self, authorization: Option<&str>) -> Result<AuthContext, AuthError> {
        let header = authorization
            .ok_or_else(|| AuthError::Unauthenticated("missing authorization header".to_string()))?;

        let token = parse_bearer(header)
            .ok_or_else(|| AuthError::Unauthenticated("expected bearer token".to_string()))?;

        let claims = self.tokens.validate(token).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            AuthError::Unauthenticated(e.to_string())
        })?;

        Ok(AuthContext::from_claims(claims))
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Blocking(e.to_string()))??;

        Ok(hash)
    }

    /// Verifies on the blocking pool; an unparseable stored hash counts as a
    /// mismatch so it cannot be told apart from a wrong password.
    async fn check_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        let result = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Blocking(e.to_string()))?;

        match result {
            Ok(matched) => Ok(matched),
            Err(e) => {
                error!(error = %e, "Stored password hash could not be verified");
                Ok(false)
            }
        }
    }
}
