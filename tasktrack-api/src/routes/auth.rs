/// Authentication endpoints
///
/// - `POST /auth/register` - Register a new user and get a token
/// - `POST /auth/login` - Log in and get a token
///
/// Both return the same body shape:
///
/// ```json
/// {
///   "token": "eyJ...",
///   "username": "alice",
///   "message": "Login successful"
/// }
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    routes::validate_request,
};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::auth::jwt::SessionToken;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be at most 50 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Password must be at most 100 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Session token to send as `Authorization: Bearer <token>`
    pub token: String,

    /// Authenticated username
    pub username: String,

    pub message: String,
}

impl AuthResponse {
    fn new(session: SessionToken, message: &str) -> Self {
        Self {
            token: session.token,
            username: session.subject,
            message: message.to_string(),
        }
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "s3cret!"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `409 Conflict`: Username already exists
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = payload?;
    validate_request(
        &req,
        &[("username", req.username.as_str()), ("password", req.password.as_str())],
    )?;

    let session = state.authenticator.register(&req.username, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(session, "User registered successfully")),
    ))
}

/// Log in with username and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "s3cret!"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;
    validate_request(
        &req,
        &[("username", req.username.as_str()), ("password", req.password.as_str())],
    )?;

    let session = state.authenticator.login(&req.username, &req.password).await?;

    Ok(Json(AuthResponse::new(session, "Login successful")))
}
