// src/handlers/responsible_person.rs

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::validated,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        client::PetshopQuery,
        petshop::{ResponsiblePerson, ResponsiblePersonPayload, ResponsiblePersonWithPetshop},
        user::ConciseUser,
    },
    services::responsible_person_service,
};

// POST /api/v1/backend/petshop/responsible-person
#[utoipa::path(
    post,
    path = "/api/v1/backend/petshop/responsible-person",
    tag = "Responsible Person",
    request_body = ResponsiblePersonPayload,
    responses(
        (status = 201, description = "Responsável cadastrado", body = ResponsiblePerson),
        (status = 400, description = "Dados inválidos ou responsável já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_responsible_person(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<ResponsiblePersonPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let person = responsible_person_service::create_responsible_person(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(person)))
}

// PATCH /api/v1/backend/petshop/responsible-person
#[utoipa::path(
    patch,
    path = "/api/v1/backend/petshop/responsible-person",
    tag = "Responsible Person",
    request_body = ResponsiblePersonPayload,
    responses(
        (status = 200, description = "Responsável atualizado", body = ResponsiblePerson),
        (status = 404, description = "Responsável não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_responsible_person(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    payload: Result<Json<ResponsiblePersonPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let person = responsible_person_service::update_responsible_person(app_state.store.as_ref(), &principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(person)))
}

// GET /api/v1/backend/petshop/responsible-person
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/responsible-person",
    tag = "Responsible Person",
    responses(
        (status = 200, description = "Responsável com o resumo do petshop", body = ResponsiblePersonWithPetshop),
        (status = 404, description = "Responsável não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_responsible_person(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let person = responsible_person_service::get_responsible_person(app_state.store.as_ref(), &principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(person)))
}

// GET /api/v1/backend/petshop/concise-responsible-person?petshopId=
#[utoipa::path(
    get,
    path = "/api/v1/backend/petshop/concise-responsible-person",
    tag = "Responsible Person",
    params(PetshopQuery),
    responses(
        (status = 200, description = "Id e nome do responsável", body = ConciseUser),
        (status = 403, description = "Colaborador não trabalha no petshop"),
        (status = 404, description = "Responsável não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn worker_get_concise_responsible_person(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<PetshopQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let person = responsible_person_service::worker_get_concise_responsible_person(
        app_state.store.as_ref(),
        &principal,
        query.petshop_id,
    )
    .await
    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(person)))
}
