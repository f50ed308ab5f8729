//! Database layer
//!
//! - `pool`: PostgreSQL connection pool with health check
//! - `migrations`: Embedded migration runner

pub mod migrations;
pub mod pool;
