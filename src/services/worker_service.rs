// src/services/worker_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::{GraphScope, Include, Relation, Store},
    models::{
        auth::{Principal, Role},
        relation::RelationFilter,
        user::{ConciseUser, NewUser, UserFilter, UserGraph, UserPatch},
        worker::{CreateWorkerPayload, UpdateWorkerPayload, WorkerResponse},
    },
    services::{
        notification::{CreatedUserEmail, EmailFlavor, Notifier, spawn_best_effort},
        password::{PasswordHasher, random_password},
        policy::{Capability, require},
        tenancy_service::{ExplicitTenant, resolve_tenant},
    },
};

#[derive(Clone)]
pub struct WorkerService {
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn Notifier>,
}

impl WorkerService {
    pub fn new(hasher: Arc<dyn PasswordHasher>, notifier: Arc<dyn Notifier>) -> Self {
        Self { hasher, notifier }
    }

    pub async fn create_worker(
        &self,
        store: &dyn Store,
        principal: &Principal,
        payload: CreateWorkerPayload,
    ) -> Result<WorkerResponse, AppError> {
        require(principal, Capability::Petshop, MessageKey::OnlyPetshopCanAddWorkers)?;
        let tenant = principal.id;

        let password = self.hasher.hash(&random_password()).await?;

        let mut uow = store.begin().await?;
        let worker = uow
            .insert_user(NewUser {
                email: payload.email,
                password,
                name: payload.name,
                phone_number: Some(payload.phone_number),
                additional_phone_number: None,
                auth: Role::UnconfirmedWorker,
                cnpj: None,
                cpf: None,
                // Aceite dos termos fica para o primeiro acesso
                terms_version: "v0".to_string(),
                privacy_version: "v0".to_string(),
            })
            .await?;
        uow.insert_worker_relation(worker.id, tenant).await?;
        let petshop_name = uow.find_user(tenant).await?.map(|p| p.name);
        uow.commit().await?;

        tracing::info!("Colaborador {} criado no petshop {}", worker.id, tenant);

        let notifier = self.notifier.clone();
        let email = CreatedUserEmail {
            email: worker.email.clone(),
            name: worker.name.clone(),
            flavor: EmailFlavor::Worker,
            petshop_name,
        };
        spawn_best_effort("e-mail de novo colaborador", async move {
            notifier.send_created_user_email(email).await
        });

        Ok(WorkerResponse { user: worker })
    }

    // Só o petshop que emprega o colaborador pode alterá-lo
    pub async fn update_worker(
        &self,
        store: &dyn Store,
        principal: &Principal,
        worker_id: Uuid,
        payload: UpdateWorkerPayload,
    ) -> Result<WorkerResponse, AppError> {
        require(principal, Capability::Petshop, MessageKey::OnlyPetshopCanUpdateWorkers)?;

        let mut uow = store.begin().await?;
        let worker = uow.find_user(worker_id).await?.ok_or_else(|| {
            AppError::not_found(MessageKey::WorkerNotFound, format!("Colaborador {} não encontrado", worker_id))
        })?;

        if !worker.is_worker_family() {
            return Err(AppError::forbidden(
                MessageKey::WorkerCannotBeUpdated,
                format!("Usuário {} não é colaborador e não pode ser atualizado", worker_id),
            ));
        }

        let employer = uow
            .list_worker_relations(RelationFilter::active().member(worker_id))
            .await?
            .into_iter()
            .next()
            .map(|r| r.petshop_id);

        if employer != Some(principal.id) {
            return Err(AppError::forbidden(
                MessageKey::WorkerNotInPetshop,
                format!("Colaborador {} não pertence ao petshop {}", worker_id, principal.id),
            ));
        }

        let user = uow
            .patch_user(worker_id, UserPatch::from(payload))
            .await?
            .ok_or_else(|| {
                AppError::not_found(MessageKey::WorkerNotFound, format!("Colaborador {} não encontrado", worker_id))
            })?;
        uow.commit().await?;

        Ok(WorkerResponse { user })
    }

    /// Dados do próprio colaborador com os petshops onde trabalha.
    pub async fn get_worker_self(&self, store: &dyn Store, principal: &Principal) -> Result<UserGraph, AppError> {
        require(principal, Capability::WorkerFamily, MessageKey::NotAWorker)?;

        let mut uow = store.begin().await?;
        uow.load_user(principal.id, &Include::new().with(Relation::Petshops), GraphScope::Unscoped)
            .await?
            .ok_or_else(|| {
                AppError::not_found(MessageKey::UserNotFound, format!("Usuário {} não encontrado", principal.id))
            })
    }

    pub async fn list_workers(&self, store: &dyn Store, principal: &Principal) -> Result<Vec<UserGraph>, AppError> {
        require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;
        let tenant = principal.id;

        let mut uow = store.begin().await?;
        let relations = uow
            .list_worker_relations(RelationFilter::active().petshop(tenant))
            .await?;

        let mut workers = Vec::with_capacity(relations.len());
        for relation in relations {
            let worker = uow
                .load_user(relation.worker_id, &Include::new().with(Relation::Petshops), GraphScope::Tenant(tenant))
                .await?;
            workers.extend(worker);
        }
        Ok(workers)
    }

    // Lista concisa (id + nome) dos colegas no petshop em que o colaborador atua
    pub async fn list_worker_names(
        &self,
        store: &dyn Store,
        principal: &Principal,
        petshop_id: Option<Uuid>,
    ) -> Result<Vec<ConciseUser>, AppError> {
        require(principal, Capability::Worker, MessageKey::NotAWorker)?;

        let mut uow = store.begin().await?;
        let tenant = resolve_tenant(&mut uow, principal, petshop_id, ExplicitTenant::MustMatch).await?;

        let relations = uow
            .list_worker_relations(RelationFilter::active().petshop(tenant))
            .await?;
        let filter = UserFilter {
            ids: Some(relations.iter().map(|r| r.worker_id).collect()),
            ..Default::default()
        };

        Ok(uow
            .list_users(&filter)
            .await?
            .into_iter()
            .map(|u| ConciseUser { id: u.id, name: u.name })
            .collect())
    }

    pub async fn micro_check_worker_petshop(
        &self,
        store: &dyn Store,
        principal: &Principal,
        worker_id: Uuid,
        petshop_id: Uuid,
    ) -> Result<UserGraph, AppError> {
        require(principal, Capability::Service, MessageKey::NotAuthorized)?;

        let mut uow = store.begin().await?;
        let graph = uow
            .load_user(worker_id, &Include::new().with(Relation::Petshops), GraphScope::Tenant(petshop_id))
            .await?;

        graph
            .filter(|g| g.petshops.as_ref().is_some_and(|p| !p.is_empty()))
            .ok_or_else(|| {
                AppError::not_found(
                    MessageKey::WorkerNotFound,
                    format!("Colaborador {} não trabalha no petshop {}", worker_id, petshop_id),
                )
            })
    }
}
