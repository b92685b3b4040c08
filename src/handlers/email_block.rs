// src/handlers/email_block.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::user::{EmailBlockStatus, EmailQuery, User},
    services::email_block_service,
};

// GET /api/v1/backend/user/email/is-user-blocked?email=
#[utoipa::path(
    get,
    path = "/api/v1/backend/user/email/is-user-blocked",
    tag = "Email Block",
    params(EmailQuery),
    responses(
        (status = 200, description = "E-mail desconhecido ou ausente conta como bloqueado", body = EmailBlockStatus),
        (status = 403, description = "Somente serviços")
    ),
    security(("api_jwt" = []))
)]
pub async fn is_user_blocked(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = email_block_service::is_user_blocked(app_state.store.as_ref(), &principal, query.email.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(status)))
}

// GET /api/v1/backend/user/email/blocked/list
#[utoipa::path(
    get,
    path = "/api/v1/backend/user/email/blocked/list",
    tag = "Email Block",
    responses(
        (status = 200, description = "Usuários bloqueados", body = Vec<User>),
        (status = 403, description = "Somente administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_blocked(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = email_block_service::list_blocked(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// POST /api/v1/backend/user/email/block?email=
#[utoipa::path(
    post,
    path = "/api/v1/backend/user/email/block",
    tag = "Email Block",
    params(EmailQuery),
    responses(
        (status = 200, description = "Usuário bloqueado", body = User),
        (status = 400, description = "E-mail ausente"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn block(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = email_block_service::block(app_state.store.as_ref(), &principal, query.email.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// POST /api/v1/backend/user/email/release?email=
#[utoipa::path(
    post,
    path = "/api/v1/backend/user/email/release",
    tag = "Email Block",
    params(EmailQuery),
    responses(
        (status = 200, description = "Usuário liberado", body = User),
        (status = 400, description = "E-mail ausente"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn release(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = email_block_service::release(app_state.store.as_ref(), &principal, query.email.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}
