/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::{app::{build_router, AppState}, config::Config};
/// use tasktrack_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// let state = AppState::with_postgres(pool, config)?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasktrack_shared::{
    auth::{
        authenticator::Authenticator,
        jwt::TokenService,
        middleware::authorization_header,
        password::PasswordHasher,
    },
    store::{
        postgres::{PgCredentialStore, PgTaskStore},
        CredentialStore, TaskStore,
    },
    tasks::TaskService,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and token validation
    pub authenticator: Arc<Authenticator>,

    /// Owner-scoped task operations
    pub tasks: TaskService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state over the given stores
    ///
    /// # Errors
    ///
    /// Fails if the hashing parameters or token settings in `config` are
    /// rejected.
    pub fn new(
        config: Config,
        credentials: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new(config.password)?;
        let tokens = TokenService::new(&config.jwt)?;
        let authenticator = Authenticator::new(credentials, hasher, tokens)?;

        Ok(Self {
            authenticator: Arc::new(authenticator),
            tasks: TaskService::new(tasks),
            config: Arc::new(config),
        })
    }

    /// Creates application state backed by PostgreSQL
    pub fn with_postgres(pool: PgPool, config: Config) -> anyhow::Result<Self> {
        Self::new(
            config,
            Arc::new(PgCredentialStore::new(pool.clone())),
            Arc::new(PgTaskStore::new(pool)),
        )
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health              # Health check (public)
/// ├── /auth/                    # Authentication endpoints (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /api/tasks/               # Task endpoints (bearer token)
///     ├── GET    /              # List own tasks
///     ├── POST   /              # Create task
///     ├── GET    /:id           # Get task
///     ├── PUT    /:id           # Update task
///     └── DELETE /:id           # Delete task
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (task routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Task routes (require a session token)
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/api/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Session token authentication layer
///
/// Resolves the caller from the `Authorization` header and injects the
/// resulting `AuthContext` into request extensions. Requests without a valid
/// bearer token never reach the handler.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = state
        .authenticator
        .require_identity(authorization_header(req.headers()))?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_shared::auth::{jwt::TokenConfig, password::HashingParams};
    use tasktrack_shared::db::pool::DatabaseConfig;
    use tasktrack_shared::store::memory::{MemoryCredentialStore, MemoryTaskStore};

    fn config(ttl_seconds: i64) -> Config {
        Config {
            api: crate::config::ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig::new("postgresql://localhost/unused"),
            jwt: TokenConfig::new("unit-test-secret-key-at-least-32-bytes").with_ttl_seconds(ttl_seconds),
            password: HashingParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        }
    }

    #[test]
    fn test_app_state_rejects_invalid_token_settings() {
        let result = AppState::new(
            config(0),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryTaskStore::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(
            config(3600),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryTaskStore::new()),
        )
        .unwrap();

        assert_eq!(state.authenticator.tokens().ttl().num_seconds(), 3600);
    }

    #[test]
    fn test_cors_layer_with_explicit_origins() {
        // Unparseable origins are skipped rather than failing startup
        let _ = cors_layer(&["https://app.example".to_string(), "bad\norigin".to_string()]);
        let _ = cors_layer(&["*".to_string()]);
    }
}
