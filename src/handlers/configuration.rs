// src/handlers/configuration.rs

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
    models::petshop::{
        ClientConfigurationView, CreateConfigurationPayload, PetshopConfiguration, UpdateConfigurationPayload,
    },
    services::configuration_service,
};

// POST /api/v1/backend/petshop/configuration
#[utoipa::path(
    post,
    path = "/api/v1/backend/petshop/configuration",
    tag = "Configuration",
    request_body = CreateConfigurationPayload,
    responses(
        (status = 201, description = "Configuração criada com os valores padrão", body = PetshopConfiguration),
        (status = 400, description = "Petshop já possui configurações"),
        (status = 403, description = "Somente serviços")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<CreateConfigurationPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let config = configuration_service::create_configuration(app_state.store.as_ref(), &principal, payload.petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(config)))
}

// PATCH /api/v1/backend/petshop/configuration
#[utoipa::path(
    patch,
    path = "/api/v1/backend/petshop/configuration",
    tag = "Configuration",
    request_body = UpdateConfigurationPayload,
    responses(
        (status = 200, description = "Configuração atualizada", body = PetshopConfiguration),
        (status = 404, description = "Configuração não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<UpdateConfigurationPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let config = configuration_service::update_configuration(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(config)))
}

// GET /api/v1/backend/petshop/configuration
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/configuration",
    tag = "Configuration",
    responses(
        (status = 200, description = "Configuração do próprio petshop", body = PetshopConfiguration),
        (status = 404, description = "Configuração não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let config = configuration_service::get_configuration(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(config)))
}

// GET /api/v1/backend/petshop/{petshopId}/configuration
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/{petshopId}/configuration",
    tag = "Configuration",
    params(("petshopId" = Uuid, Path, description = "ID do petshop")),
    responses(
        (status = 200, description = "Configuração de qualquer petshop (serviços)", body = PetshopConfiguration),
        (status = 404, description = "Configuração não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn micro_get_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(petshop_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let config = configuration_service::micro_get_configuration(app_state.store.as_ref(), &principal, petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(config)))
}

// GET /api/v1/backend/petshop/{petshopId}/configuration/client
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/{petshopId}/configuration/client",
    tag = "Configuration",
    params(("petshopId" = Uuid, Path, description = "ID do petshop")),
    responses(
        (status = 200, description = "Regras de pagamento vistas pelo cliente", body = ClientConfigurationView),
        (status = 404, description = "Configuração não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn client_get_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(petshop_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let config = configuration_service::client_get_configuration(app_state.store.as_ref(), &principal, petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(config)))
}
