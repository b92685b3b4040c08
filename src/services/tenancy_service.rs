// src/services/tenancy_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::UnitOfWork,
    models::{
        auth::{Principal, Role},
        relation::RelationFilter,
    },
};

/// O que fazer com o `petshopId` explícito quando quem chama é o próprio petshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplicitTenant {
    /// Se vier, precisa ser o id do petshop
    MustMatch,
    /// Descarta o valor enviado
    Ignore,
}

// ---
// Descobre em qual petshop (tenant) o principal está atuando.
//   - serviço: o id explícito é obrigatório e confiável
//   - petshop: o próprio id
//   - colaborador: precisa de vínculo ativo com o petshop
//   - qualquer outro: Forbidden
// ---
pub async fn resolve_tenant(
    uow: &mut UnitOfWork,
    principal: &Principal,
    explicit_petshop_id: Option<Uuid>,
    mode: ExplicitTenant,
) -> Result<Uuid, AppError> {
    if principal.is_service {
        return explicit_petshop_id.ok_or_else(|| {
            AppError::bad_request(MessageKey::PetshopIdRequired, "petshopId é obrigatório para chamadas de serviço")
        });
    }

    let Some(role) = principal.role else {
        return Err(AppError::forbidden(
            MessageKey::NotAuthorized,
            format!("Usuário {} não tem papel definido", principal.id),
        ));
    };

    if role == Role::Petshop {
        return match (explicit_petshop_id, mode) {
            (Some(explicit), ExplicitTenant::MustMatch) if explicit != principal.id => Err(AppError::forbidden(
                MessageKey::NotAuthorized,
                format!("Petshop {} tentou atuar no petshop {}", principal.id, explicit),
            )),
            _ => Ok(principal.id),
        };
    }

    if role.is_worker_family() {
        let relations = uow
            .list_worker_relations(RelationFilter::active().member(principal.id))
            .await?;

        let tenant = match explicit_petshop_id {
            Some(explicit) => relations.iter().find(|r| r.petshop_id == explicit),
            None => relations.first(),
        };

        return tenant.map(|r| r.petshop_id).ok_or_else(|| {
            AppError::forbidden(
                MessageKey::WorkerNotAtPetshop,
                format!(
                    "Colaborador {} não trabalha no petshop {:?}",
                    principal.id, explicit_petshop_id
                ),
            )
        });
    }

    Err(AppError::forbidden(
        MessageKey::NotAuthorized,
        format!("Usuário {} não pode atuar em nenhum petshop", principal.id),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Store};

    #[tokio::test]
    async fn petshop_resolves_to_itself() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let petshop = Principal::user(Uuid::new_v4(), Role::Petshop);

        let tenant = resolve_tenant(&mut uow, &petshop, None, ExplicitTenant::MustMatch).await.unwrap();
        assert_eq!(tenant, petshop.id);

        let other = Uuid::new_v4();
        let ignored = resolve_tenant(&mut uow, &petshop, Some(other), ExplicitTenant::Ignore).await.unwrap();
        assert_eq!(ignored, petshop.id);

        let err = resolve_tenant(&mut uow, &petshop, Some(other), ExplicitTenant::MustMatch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn service_requires_an_explicit_tenant() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let service = Principal::service(Uuid::new_v4());

        let err = resolve_tenant(&mut uow, &service, None, ExplicitTenant::MustMatch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { key: MessageKey::PetshopIdRequired, .. }));

        let petshop_id = Uuid::new_v4();
        let tenant = resolve_tenant(&mut uow, &service, Some(petshop_id), ExplicitTenant::MustMatch)
            .await
            .unwrap();
        assert_eq!(tenant, petshop_id);
    }

    #[tokio::test]
    async fn worker_needs_an_active_relation() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let worker = Principal::user(Uuid::new_v4(), Role::Worker);
        let petshop_id = Uuid::new_v4();

        let err = resolve_tenant(&mut uow, &worker, Some(petshop_id), ExplicitTenant::MustMatch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { key: MessageKey::WorkerNotAtPetshop, .. }));

        uow.insert_worker_relation(worker.id, petshop_id).await.unwrap();

        let tenant = resolve_tenant(&mut uow, &worker, Some(petshop_id), ExplicitTenant::MustMatch)
            .await
            .unwrap();
        assert_eq!(tenant, petshop_id);

        let implicit = resolve_tenant(&mut uow, &worker, None, ExplicitTenant::MustMatch).await.unwrap();
        assert_eq!(implicit, petshop_id);

        let err = resolve_tenant(&mut uow, &worker, Some(Uuid::new_v4()), ExplicitTenant::MustMatch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn clients_cannot_act_in_a_tenant() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let client = Principal::user(Uuid::new_v4(), Role::Client);

        let err = resolve_tenant(&mut uow, &client, Some(Uuid::new_v4()), ExplicitTenant::MustMatch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }
}
