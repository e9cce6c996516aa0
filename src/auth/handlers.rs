use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{NewUser, Role};
use crate::validate::ValidateRequest;

use super::dto::{
    LoginRequest, LoginResponse, LogoutResponse, ProfileResponse, PublicUser, RegisterRequest,
    RegisterResponse,
};
use super::extractors::AuthUser;
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};

/// Routes that issue credentials; the app layers the tighter auth rate limit
/// on top of these.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    payload.validate()?;

    let hash = hash_password(&payload.password)?;

    // No pre-check here: the store's uniqueness constraint is the arbiter, so
    // two concurrent registrations with the same email get exactly one winner.
    let user = state
        .stores
        .users
        .create(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash: hash,
            role: Role::Farmer,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate()?;

    // Unknown email and wrong password take the same exit so callers cannot
    // enumerate accounts.
    let user = match state.stores.users.find_by_email(&payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.issue(&user)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        token,
        user: PublicUser::from(&user),
        expires_in: keys.expires_in_secs(),
    }))
}

/// Advisory only: tokens are stateless and stay valid until expiry. The client
/// discards its copy.
#[instrument(skip_all)]
pub async fn logout(AuthUser(claims): AuthUser) -> Json<LogoutResponse> {
    info!(user_id = %claims.sub, "user logged out");
    Json(LogoutResponse { success: true })
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .stores
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(ProfileResponse {
        user: PublicUser::from(&user),
    }))
}
