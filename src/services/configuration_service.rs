// src/services/configuration_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::{Store, UnitOfWork},
    models::{
        auth::Principal,
        petshop::{
            ClientConfigurationView, ConfigurationPatch, NewConfiguration, PetshopConfiguration,
            UpdateConfigurationPayload,
        },
    },
    services::policy::{Capability, require},
};

// Uso interno: a configuração normalmente nasce junto com o petshop
pub async fn create_configuration(
    store: &dyn Store,
    principal: &Principal,
    petshop_id: Uuid,
) -> Result<PetshopConfiguration, AppError> {
    require(principal, Capability::Service, MessageKey::NotAuthorized)?;

    let mut uow = store.begin().await?;
    if uow.find_configuration(petshop_id).await?.is_some() {
        return Err(AppError::conflict(
            MessageKey::ConfigurationAlreadyExists,
            format!("Petshop {} já tem configurações", petshop_id),
        ));
    }

    let config = uow.insert_configuration(NewConfiguration::defaults(petshop_id)).await?;
    uow.commit().await?;
    Ok(config)
}

pub async fn update_configuration(
    store: &dyn Store,
    principal: &Principal,
    payload: UpdateConfigurationPayload,
) -> Result<PetshopConfiguration, AppError> {
    require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;

    let mut uow = store.begin().await?;
    let config = uow
        .patch_configuration(principal.id, ConfigurationPatch::from(payload))
        .await?
        .ok_or_else(|| not_found(principal.id))?;
    uow.commit().await?;

    tracing::info!("Configurações do petshop {} atualizadas", principal.id);
    Ok(config)
}

pub async fn get_configuration(store: &dyn Store, principal: &Principal) -> Result<PetshopConfiguration, AppError> {
    require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;
    let mut uow = store.begin().await?;
    find(&mut uow, principal.id).await
}

pub async fn micro_get_configuration(
    store: &dyn Store,
    principal: &Principal,
    petshop_id: Uuid,
) -> Result<PetshopConfiguration, AppError> {
    require(principal, Capability::Service, MessageKey::NotAuthorized)?;
    let mut uow = store.begin().await?;
    find(&mut uow, petshop_id).await
}

/// O cliente só enxerga as regras de pagamento e a taxa de cancelamento.
pub async fn client_get_configuration(
    store: &dyn Store,
    principal: &Principal,
    petshop_id: Uuid,
) -> Result<ClientConfigurationView, AppError> {
    require(principal, Capability::ClientFamily, MessageKey::NotAuthorized)?;
    let mut uow = store.begin().await?;
    find(&mut uow, petshop_id).await.map(ClientConfigurationView::from)
}

async fn find(uow: &mut UnitOfWork, petshop_id: Uuid) -> Result<PetshopConfiguration, AppError> {
    uow.find_configuration(petshop_id)
        .await?
        .ok_or_else(|| not_found(petshop_id))
}

fn not_found(petshop_id: Uuid) -> AppError {
    AppError::not_found(
        MessageKey::ConfigurationNotFound,
        format!("Configurações do petshop {} não encontradas", petshop_id),
    )
}
