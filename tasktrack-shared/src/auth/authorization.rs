//! Resource ownership checks
//!
//! TaskTrack has a single authorization rule: a resource may only be read,
//! updated or deleted by the identity that owns it.
//!
//! A resource owned by someone else is reported exactly like a resource that
//! does not exist. Callers cannot use the error to discover which IDs belong to
//! other users.
//!
//! # Example
//!
//! ```
//! use tasktrack_shared::auth::authorization::{authorize, AuthzError};
//! use tasktrack_shared::auth::middleware::AuthContext;
//!
//! let alice = AuthContext::new("alice");
//!
//! assert!(authorize(&alice, "alice").is_ok());
//! assert!(matches!(authorize(&alice, "bob"), Err(AuthzError::NotFound)));
//! ```

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Resource is absent or belongs to another identity
    #[error("Resource not found")]
    NotFound,
}

/// A persisted record with a single authorizing owner
pub trait OwnedResource {
    /// Username of the owning identity
    fn owner_username(&self) -> &str;
}

/// Allows access only when `resource_owner` is the authenticated identity
pub fn authorize(auth: &AuthContext, resource_owner: &str) -> Result<(), AuthzError> {
    if auth.username != resource_owner {
        return Err(AuthzError::NotFound);
    }

    Ok(())
}

/// Applies the ownership check to the result of a store lookup
///
/// `None` and a foreign owner both become `AuthzError::NotFound`.
pub fn guard<R: OwnedResource>(auth: &AuthContext, resource: Option<R>) -> Result<R, AuthzError> {
    let resource = resource.ok_or(AuthzError::NotFound)?;
    authorize(auth, resource.owner_username())?;

    Ok(resource)
}
