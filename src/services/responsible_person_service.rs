// src/services/responsible_person_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::Store,
    models::{
        auth::Principal,
        petshop::{ResponsiblePerson, ResponsiblePersonPayload, ResponsiblePersonWithPetshop},
        user::{ConciseUser, PetshopSummary},
    },
    services::{
        policy::{Capability, require},
        tenancy_service::{ExplicitTenant, resolve_tenant},
    },
};

/// Um responsável por petshop: a segunda tentativa é rejeitada.
pub async fn create_responsible_person(
    store: &dyn Store,
    principal: &Principal,
    payload: ResponsiblePersonPayload,
) -> Result<ResponsiblePerson, AppError> {
    require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;

    let mut uow = store.begin().await?;
    if uow.find_responsible_person(principal.id).await?.is_some() {
        return Err(AppError::conflict(
            MessageKey::ResponsiblePersonAlreadyExists,
            format!("Petshop {} já tem uma pessoa responsável", principal.id),
        ));
    }

    let person = uow.insert_responsible_person(payload.into_new(principal.id)).await?;
    uow.commit().await?;
    Ok(person)
}

pub async fn update_responsible_person(
    store: &dyn Store,
    principal: &Principal,
    payload: ResponsiblePersonPayload,
) -> Result<ResponsiblePerson, AppError> {
    require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;

    let mut uow = store.begin().await?;
    let person = uow
        .patch_responsible_person(principal.id, payload.into_patch())
        .await?
        .ok_or_else(|| not_found(principal.id))?;
    uow.commit().await?;
    Ok(person)
}

pub async fn get_responsible_person(
    store: &dyn Store,
    principal: &Principal,
) -> Result<ResponsiblePersonWithPetshop, AppError> {
    require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;

    let mut uow = store.begin().await?;
    let responsible_person = uow
        .find_responsible_person(principal.id)
        .await?
        .ok_or_else(|| not_found(principal.id))?;

    let petshop = uow
        .find_user(principal.id)
        .await?
        .map(|p| PetshopSummary::from_user(&p, None))
        .ok_or_else(|| AppError::not_found(MessageKey::UserNotFound, format!("Petshop {} não encontrado", principal.id)))?;

    Ok(ResponsiblePersonWithPetshop { responsible_person, petshop })
}

// Colaborador vê só id e nome do responsável pelo petshop onde trabalha
pub async fn worker_get_concise_responsible_person(
    store: &dyn Store,
    principal: &Principal,
    petshop_id: Option<Uuid>,
) -> Result<ConciseUser, AppError> {
    require(principal, Capability::Worker, MessageKey::NotAWorker)?;

    let mut uow = store.begin().await?;
    let tenant = resolve_tenant(&mut uow, principal, petshop_id, ExplicitTenant::MustMatch).await?;

    uow.find_responsible_person(tenant)
        .await?
        .map(|p| ConciseUser { id: p.id, name: p.name })
        .ok_or_else(|| not_found(tenant))
}

fn not_found(petshop_id: Uuid) -> AppError {
    AppError::not_found(
        MessageKey::ResponsiblePersonNotFound,
        format!("Petshop {} sem pessoa responsável", petshop_id),
    )
}
