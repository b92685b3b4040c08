// src/handlers/client.rs

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
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
        client::{
            ClientCpfPayload, ClientPayload, ClientSelfUpdatePayload, ClientSelfView, CreatedClient,
            PetshopQuery, ScheduledClientCheckPayload, ScheduledClientData, UpdatedClient,
        },
        user::{User, UserGraph},
    },
};

// POST /api/v1/backend/client
#[utoipa::path(
    post,
    path = "/api/v1/backend/client",
    tag = "Client",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente adicionado ao petshop", body = CreatedClient),
        (status = 400, description = "Dados inválidos, e-mail de outro tipo de usuário ou cliente já adicionado"),
        (status = 403, description = "Usuário não é petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .client_service
        .create_client(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PATCH /api/v1/backend/client/{clientId}
#[utoipa::path(
    patch,
    path = "/api/v1/backend/client/{clientId}",
    tag = "Client",
    request_body = ClientPayload,
    params(("clientId" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = UpdatedClient),
        (status = 403, description = "Endereço de outro cliente ou usuário sem permissão"),
        (status = 404, description = "Cliente ou pet não encontrado neste petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(client_id): Path<Uuid>,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .client_service
        .update_client(app_state.store.as_ref(), &principal, client_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// PATCH /api/v1/backend/client/{clientId}/cpf
#[utoipa::path(
    patch,
    path = "/api/v1/backend/client/{clientId}/cpf",
    tag = "Client",
    request_body = ClientCpfPayload,
    params(("clientId" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "CPF atualizado", body = User),
        (status = 404, description = "Cliente não encontrado neste petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client_cpf(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(client_id): Path<Uuid>,
    payload: Result<Json<ClientCpfPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .client_service
        .update_client_cpf(app_state.store.as_ref(), &principal, client_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// PATCH /api/v1/backend/client
#[utoipa::path(
    patch,
    path = "/api/v1/backend/client",
    tag = "Client",
    request_body = ClientSelfUpdatePayload,
    responses(
        (status = 200, description = "Dados do próprio cliente atualizados", body = User),
        (status = 403, description = "Usuário não é cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client_self(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<ClientSelfUpdatePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .client_service
        .update_client_self(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// GET /api/v1/backend/client
#[utoipa::path(
    get,
    path = "/api/v1/backend/client",
    tag = "Client",
    responses(
        (status = 200, description = "Dados do cliente agrupados por petshop", body = ClientSelfView),
        (status = 403, description = "Usuário não é cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .client_service
        .get_client_self(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// GET /api/v1/backend/client/list?petshopId=
#[utoipa::path(
    get,
    path = "/api/v1/backend/client/list",
    tag = "Client",
    params(PetshopQuery),
    responses(
        (status = 200, description = "Clientes ativos do petshop", body = Vec<UserGraph>),
        (status = 403, description = "Sem acesso ao petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<PetshopQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .client_service
        .list_clients(app_state.store.as_ref(), &principal, query.petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clients)))
}

// POST /api/v1/backend/client/schedule-data/check
#[utoipa::path(
    post,
    path = "/api/v1/backend/client/schedule-data/check",
    tag = "Client",
    request_body = ScheduledClientCheckPayload,
    responses(
        (status = 200, description = "Dados do cliente e regras de cancelamento", body = ScheduledClientData),
        (status = 404, description = "Cliente, pet, endereço ou modo de pagamento inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn check_scheduled_client_data(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<ScheduledClientCheckPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let data = app_state
        .client_service
        .check_scheduled_client_data(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(data)))
}

// GET /api/v1/backend/client/{clientId}/petshop/list/check
#[utoipa::path(
    get,
    path = "/api/v1/backend/client/{clientId}/petshop/list/check",
    tag = "Client",
    params(("clientId" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente com seus vínculos ativos", body = UserGraph),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn micro_check_client_petshops(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .micro_check_client_petshops(app_state.store.as_ref(), &principal, client_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(client)))
}

// GET /api/v1/backend/client/{clientId}/petshop/{petshopId}/micro
#[utoipa::path(
    get,
    path = "/api/v1/backend/client/{clientId}/petshop/{petshopId}/micro",
    tag = "Client",
    params(
        ("clientId" = Uuid, Path, description = "ID do cliente"),
        ("petshopId" = Uuid, Path, description = "ID do petshop")
    ),
    responses(
        (status = 200, description = "Cliente como o petshop o enxerga", body = UserGraph),
        (status = 404, description = "Cliente não encontrado no petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn micro_get_client_petshop(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((client_id, petshop_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .micro_get_client_petshop(app_state.store.as_ref(), &principal, client_id, petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(client)))
}
