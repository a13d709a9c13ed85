use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{Role, User},
    },
    error::ApiError,
    state::AppState,
};

const DEFAULT_ROLE: &str = "member";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::EmailNotRegistered(payload.email.clone())
        })?;

    if !verify_password(&payload.password, &user.encrypted_password)? {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err(ApiError::WrongPassword);
    }

    let role = Role::find_by_id(&state.db, user.role_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("role {} missing for user {}", user.role_id, user.id))?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.create_token_from_user(&user, &role)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((StatusCode::CREATED, Json(TokenResponse { access_token })))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already taken");
        return Err(ApiError::EmailAlreadyTaken(payload.email));
    }

    let role = Role::find_by_name(&state.db, DEFAULT_ROLE)
        .await?
        .ok_or_else(|| anyhow::anyhow!("default role {DEFAULT_ROLE} missing"))?;

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash, role.id).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.create_token_from_user(&user, &role)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(TokenResponse { access_token }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::RecordNotFound("User"))?;
    Ok(Json(user))
}
