//! Authentication and authorization
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`jwt`]: Stateless HS256 session tokens
//! - [`authenticator`]: Registration, login and token-to-identity resolution
//! - [`middleware`]: The per-request [`middleware::AuthContext`]
//! - [`authorization`]: Ownership checks for owned resources
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tasktrack_shared::auth::authenticator::Authenticator;
//! use tasktrack_shared::auth::jwt::{TokenConfig, TokenService};
//! use tasktrack_shared::auth::password::{HashingParams, PasswordHasher};
//! use tasktrack_shared::store::memory::MemoryCredentialStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = Authenticator::new(
//!     Arc::new(MemoryCredentialStore::new()),
//!     PasswordHasher::new(HashingParams::default())?,
//!     TokenService::new(&TokenConfig::new("a-secret-of-at-least-32-bytes!!!"))?,
//! )?;
//!
//! let session = auth.register("alice", "pw1").await?;
//! let identity = auth.require_identity(Some(&format!("Bearer {}", session.token)))?;
//! assert_eq!(identity.username, "alice");
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
