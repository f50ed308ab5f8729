//! # TaskTrack API Server Library
//!
//! HTTP surface of TaskTrack: registration, login and owner-scoped task
//! management on top of `tasktrack-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and the session token layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
