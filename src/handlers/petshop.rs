// src/handlers/petshop.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::validated,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        petshop::{CreatePetshopPayload, CreatedPetshop, UpdatePetshopPayload, UpdatedPetshop},
        user::{PetshopSummary, UserGraph},
    },
};

// POST /api/v1/backend/petshop
#[utoipa::path(
    post,
    path = "/api/v1/backend/petshop",
    tag = "Petshop",
    request_body = CreatePetshopPayload,
    responses(
        (status = 201, description = "Petshop cadastrado com o cliente de demonstração", body = CreatedPetshop),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn create_petshop(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<CreatePetshopPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .petshop_service
        .create_petshop(app_state.store.as_ref(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PATCH /api/v1/backend/petshop
#[utoipa::path(
    patch,
    path = "/api/v1/backend/petshop",
    tag = "Petshop",
    request_body = UpdatePetshopPayload,
    responses(
        (status = 200, description = "Petshop atualizado (e-mail e CNPJ são ignorados)", body = UpdatedPetshop),
        (status = 403, description = "Usuário não é petshop"),
        (status = 404, description = "Usuário ou endereço não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_petshop(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<UpdatePetshopPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .petshop_service
        .update_petshop(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// GET /api/v1/backend/petshop
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop",
    tag = "Petshop",
    responses(
        (status = 200, description = "Petshop com responsável, endereço, colaboradores e configurações", body = UserGraph),
        (status = 403, description = "Usuário não é petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_petshop(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let petshop = app_state
        .petshop_service
        .get_petshop(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(petshop)))
}

// GET /api/v1/backend/petshop/list
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/list",
    tag = "Petshop",
    responses(
        (status = 200, description = "Lista pública de petshops", body = Vec<PetshopSummary>)
    )
)]
pub async fn list_petshops(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let petshops = app_state
        .petshop_service
        .list_petshops(app_state.store.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(petshops)))
}

// GET /api/v1/backend/petshop/{petshopId}
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/{petshopId}",
    tag = "Petshop",
    params(("petshopId" = Uuid, Path, description = "ID do petshop")),
    responses(
        (status = 200, description = "Petshop (chamada entre serviços)", body = UserGraph),
        (status = 403, description = "Somente serviços"),
        (status = 404, description = "Petshop não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn micro_get_petshop(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(petshop_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let petshop = app_state
        .petshop_service
        .micro_get_petshop(app_state.store.as_ref(), &principal, petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(petshop)))
}
