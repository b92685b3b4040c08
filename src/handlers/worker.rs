// src/handlers/worker.rs

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
        client::PetshopQuery,
        user::{ConciseUser, UserGraph},
        worker::{CreateWorkerPayload, UpdateWorkerPayload, WorkerResponse},
    },
};

// POST /api/v1/backend/worker
#[utoipa::path(
    post,
    path = "/api/v1/backend/worker",
    tag = "Worker",
    request_body = CreateWorkerPayload,
    responses(
        (status = 201, description = "Colaborador criado", body = WorkerResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Usuário não é petshop"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_worker(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<CreateWorkerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .worker_service
        .create_worker(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PATCH /api/v1/backend/worker/{workerId}
#[utoipa::path(
    patch,
    path = "/api/v1/backend/worker/{workerId}",
    tag = "Worker",
    request_body = UpdateWorkerPayload,
    params(("workerId" = Uuid, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Colaborador atualizado", body = WorkerResponse),
        (status = 403, description = "Colaborador não pertence ao petshop"),
        (status = 404, description = "Colaborador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_worker(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(worker_id): Path<Uuid>,
    payload: Result<Json<UpdateWorkerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .worker_service
        .update_worker(app_state.store.as_ref(), &principal, worker_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// GET /api/v1/backend/worker
#[utoipa::path(
    get,
    path = "/api/v1/backend/worker",
    tag = "Worker",
    responses(
        (status = 200, description = "Dados do colaborador com seus petshops", body = UserGraph),
        (status = 403, description = "Usuário não é colaborador")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_worker(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let worker = app_state
        .worker_service
        .get_worker_self(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(worker)))
}

// GET /api/v1/backend/worker/list
#[utoipa::path(
    get,
    path = "/api/v1/backend/worker/list",
    tag = "Worker",
    responses(
        (status = 200, description = "Colaboradores ativos do petshop", body = Vec<UserGraph>),
        (status = 403, description = "Usuário não é petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_workers(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let workers = app_state
        .worker_service
        .list_workers(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(workers)))
}

// GET /api/v1/backend/worker/concise-list?petshopId=
#[utoipa::path(
    get,
    path = "/api/v1/backend/worker/concise-list",
    tag = "Worker",
    params(PetshopQuery),
    responses(
        (status = 200, description = "Id e nome dos colaboradores do petshop", body = Vec<ConciseUser>),
        (status = 403, description = "Colaborador não trabalha no petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_worker_names(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<PetshopQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let names = app_state
        .worker_service
        .list_worker_names(app_state.store.as_ref(), &principal, query.petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(names)))
}

// GET /api/v1/backend/worker/{workerId}/petshop/{petshopId}/check
#[utoipa::path(
    get,
    path = "/api/v1/backend/worker/{workerId}/petshop/{petshopId}/check",
    tag = "Worker",
    params(
        ("workerId" = Uuid, Path, description = "ID do colaborador"),
        ("petshopId" = Uuid, Path, description = "ID do petshop")
    ),
    responses(
        (status = 200, description = "Colaborador trabalha no petshop", body = UserGraph),
        (status = 404, description = "Colaborador não trabalha no petshop")
    ),
    security(("api_jwt" = []))
)]
pub async fn micro_check_worker_petshop(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((worker_id, petshop_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let worker = app_state
        .worker_service
        .micro_check_worker_petshop(app_state.store.as_ref(), &principal, worker_id, petshop_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(worker)))
}
