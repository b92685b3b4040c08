// src/db/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{RowStore, Store, UnitOfWork},
    models::{
        address::{Address, AddressPatch, AddressScope, NewAddress},
        pet::{NewPet, Pet, PetPatch},
        petshop::{
            ConfigurationPatch, NewConfiguration, NewResponsiblePerson, PetshopConfiguration,
            ResponsiblePerson, ResponsiblePersonPatch,
        },
        relation::{
            ClientInfoPatch, ClientPetshopInfo, ClientPetshopRelation, NewClientInfo,
            RelationFilter, WorkerPetshopRelation,
        },
        user::{NewUser, User, UserFilter, UserPatch},
    },
};

pub mod address_repo;
pub mod pet_repo;
pub mod petshop_repo;
pub mod relation_repo;
pub mod user_repo;

pub use address_repo::AddressRepository;
pub use pet_repo::PetRepository;
pub use petshop_repo::{ConfigurationRepository, ResponsiblePersonRepository};
pub use relation_repo::{ClientInfoRepository, ClientRelationRepository, WorkerRelationRepository};
pub use user_repo::UserRepository;

// updated_at precisa avançar mesmo com duas escritas na mesma transação
// (now() é fixo dentro dela)
pub(crate) const TOUCH_UPDATED_AT: &str =
    "updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')";

// Converte violação de UNIQUE num erro com o nome da constraint
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return AppError::UniqueViolation(constraint);
        }
    }
    AppError::DatabaseError(e)
}

/// Store de produção: cada unidade de trabalho é uma transação do Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<UnitOfWork, AppError> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork::new(Box::new(PgRowStore { tx })))
    }
}

// Sem commit, o Drop da transação faz o rollback
struct PgRowStore {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RowStore for PgRowStore {
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        UserRepository::find_by_id(&mut *self.tx, id).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        UserRepository::find_by_email(&mut *self.tx, email).await
    }

    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        UserRepository::list(&mut *self.tx, filter).await
    }

    async fn insert_user(&mut self, new: &NewUser) -> Result<User, AppError> {
        UserRepository::insert(&mut *self.tx, new).await
    }

    async fn patch_user(&mut self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError> {
        UserRepository::patch(&mut *self.tx, id, patch).await
    }

    async fn list_addresses(&mut self, user_id: Uuid, scope: AddressScope) -> Result<Vec<Address>, AppError> {
        AddressRepository::list(&mut *self.tx, user_id, scope).await
    }

    async fn insert_address(&mut self, new: &NewAddress) -> Result<Address, AppError> {
        AddressRepository::insert(&mut *self.tx, new).await
    }

    async fn patch_address(&mut self, id: Uuid, patch: &AddressPatch) -> Result<Option<Address>, AppError> {
        AddressRepository::patch(&mut *self.tx, id, patch).await
    }

    async fn list_pets(&mut self, client_id: Uuid, petshop_id: Option<Uuid>) -> Result<Vec<Pet>, AppError> {
        PetRepository::list(&mut *self.tx, client_id, petshop_id).await
    }

    async fn insert_pet(&mut self, new: &NewPet) -> Result<Pet, AppError> {
        PetRepository::insert(&mut *self.tx, new).await
    }

    async fn patch_pet(&mut self, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError> {
        PetRepository::patch(&mut *self.tx, id, patch).await
    }

    async fn find_configuration(&mut self, petshop_id: Uuid) -> Result<Option<PetshopConfiguration>, AppError> {
        ConfigurationRepository::find_by_petshop(&mut *self.tx, petshop_id).await
    }

    async fn insert_configuration(&mut self, new: &NewConfiguration) -> Result<PetshopConfiguration, AppError> {
        ConfigurationRepository::insert(&mut *self.tx, new).await
    }

    async fn patch_configuration(
        &mut self,
        petshop_id: Uuid,
        patch: &ConfigurationPatch,
    ) -> Result<Option<PetshopConfiguration>, AppError> {
        ConfigurationRepository::patch(&mut *self.tx, petshop_id, patch).await
    }

    async fn find_responsible_person(&mut self, petshop_id: Uuid) -> Result<Option<ResponsiblePerson>, AppError> {
        ResponsiblePersonRepository::find_by_petshop(&mut *self.tx, petshop_id).await
    }

    async fn insert_responsible_person(&mut self, new: &NewResponsiblePerson) -> Result<ResponsiblePerson, AppError> {
        ResponsiblePersonRepository::insert(&mut *self.tx, new).await
    }

    async fn patch_responsible_person(
        &mut self,
        petshop_id: Uuid,
        patch: &ResponsiblePersonPatch,
    ) -> Result<Option<ResponsiblePerson>, AppError> {
        ResponsiblePersonRepository::patch(&mut *self.tx, petshop_id, patch).await
    }

    async fn list_client_relations(&mut self, filter: &RelationFilter) -> Result<Vec<ClientPetshopRelation>, AppError> {
        ClientRelationRepository::list(&mut *self.tx, filter).await
    }

    async fn insert_client_relation(&mut self, client_id: Uuid, petshop_id: Uuid) -> Result<ClientPetshopRelation, AppError> {
        ClientRelationRepository::insert(&mut *self.tx, client_id, petshop_id).await
    }

    async fn set_client_relation_removed(
        &mut self,
        id: Uuid,
        is_removed: bool,
    ) -> Result<Option<ClientPetshopRelation>, AppError> {
        ClientRelationRepository::set_removed(&mut *self.tx, id, is_removed).await
    }

    async fn list_client_infos(
        &mut self,
        client_id: Uuid,
        petshop_id: Option<Uuid>,
    ) -> Result<Vec<ClientPetshopInfo>, AppError> {
        ClientInfoRepository::list(&mut *self.tx, client_id, petshop_id).await
    }

    async fn insert_client_info(&mut self, new: &NewClientInfo) -> Result<ClientPetshopInfo, AppError> {
        ClientInfoRepository::insert(&mut *self.tx, new).await
    }

    async fn patch_client_info(&mut self, id: Uuid, patch: &ClientInfoPatch) -> Result<Option<ClientPetshopInfo>, AppError> {
        ClientInfoRepository::patch(&mut *self.tx, id, patch).await
    }

    async fn list_worker_relations(&mut self, filter: &RelationFilter) -> Result<Vec<WorkerPetshopRelation>, AppError> {
        WorkerRelationRepository::list(&mut *self.tx, filter).await
    }

    async fn insert_worker_relation(&mut self, worker_id: Uuid, petshop_id: Uuid) -> Result<WorkerPetshopRelation, AppError> {
        WorkerRelationRepository::insert(&mut *self.tx, worker_id, petshop_id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
