//! Database models
//!
//! - `user`: Registered identities
//! - `task`: Owned task records

pub mod task;
pub mod user;
