use axum::{
    extract::{FromRef, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    UpdateProfileRequest, UserView, VerifyResponse,
};
use crate::auth::extractors::AuthUser;
use crate::auth::service::AuthService;
use crate::auth::validate;
use crate::error::Result;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/verify", get(verify))
        .route("/auth/profile", patch(update_profile))
        .route("/auth/password", patch(change_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_string();
    validate::check_name(&payload.name)?;
    validate::check_email(&payload.email)?;
    validate::check_password(&payload.password)?;

    let svc = AuthService::from_ref(&state);
    let res = svc
        .register(payload.name.trim(), &payload.email, &payload.password)
        .await?;
    Ok(Json(res))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_string();
    validate::check_email(&payload.email)?;

    let svc = AuthService::from_ref(&state);
    let res = svc.login(&payload.email, &payload.password).await?;
    Ok(Json(res))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<MessageResponse>> {
    let svc = AuthService::from_ref(&state);
    Ok(Json(svc.logout(user_id).await?))
}

/// Unlike the gate itself, this endpoint re-checks the account against the
/// store, so a deactivated user fails here even with a live token.
#[instrument(skip(state))]
pub async fn verify(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<VerifyResponse>> {
    let svc = AuthService::from_ref(&state);
    let user = svc.validate_identity(user_id).await?;
    Ok(Json(VerifyResponse {
        user: UserView::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserView>> {
    if let Some(name) = payload.name.as_deref() {
        validate::check_name(name)?;
    }
    if let Some(avatar) = payload.avatar.as_deref() {
        validate::check_avatar(avatar)?;
    }

    let svc = AuthService::from_ref(&state);
    let view = svc
        .update_profile(user_id, payload.name.as_deref(), payload.avatar.as_deref())
        .await?;
    Ok(Json(view))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    validate::check_password(&payload.new_password)?;

    let svc = AuthService::from_ref(&state);
    svc.change_password(user_id, &payload.current_password, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".into(),
    }))
}
