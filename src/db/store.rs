// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::include::{GraphScope, Include, Relation},
    models::{
        address::{Address, AddressPatch, AddressScope, NewAddress},
        auth::Role,
        pet::{NewPet, Pet, PetPatch},
        petshop::{
            ConfigurationPatch, NewConfiguration, NewResponsiblePerson, PetshopConfiguration,
            ResponsiblePerson, ResponsiblePersonPatch,
        },
        relation::{
            ClientInfoPatch, ClientPetshopInfo, ClientPetshopRelation, NewClientInfo,
            RelationFilter, WorkerPetshopRelation,
        },
        user::{NewUser, PetshopSummary, User, UserFilter, UserGraph, UserPatch},
    },
};

// ---
// Operações cruas de linha, implementadas por cada backend (Postgres / memória).
// Não validam nada: quem valida é o `UnitOfWork`.
// Todas rodam dentro da transação aberta pelo `Store::begin`.
// ---
#[async_trait]
pub trait RowStore: Send {
    // users
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError>;
    async fn insert_user(&mut self, new: &NewUser) -> Result<User, AppError>;
    async fn patch_user(&mut self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError>;

    // addresses
    async fn list_addresses(&mut self, user_id: Uuid, scope: AddressScope) -> Result<Vec<Address>, AppError>;
    async fn insert_address(&mut self, new: &NewAddress) -> Result<Address, AppError>;
    async fn patch_address(&mut self, id: Uuid, patch: &AddressPatch) -> Result<Option<Address>, AppError>;

    // pets
    async fn list_pets(&mut self, client_id: Uuid, petshop_id: Option<Uuid>) -> Result<Vec<Pet>, AppError>;
    async fn insert_pet(&mut self, new: &NewPet) -> Result<Pet, AppError>;
    async fn patch_pet(&mut self, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError>;

    // petshop_configurations
    async fn find_configuration(&mut self, petshop_id: Uuid) -> Result<Option<PetshopConfiguration>, AppError>;
    async fn insert_configuration(&mut self, new: &NewConfiguration) -> Result<PetshopConfiguration, AppError>;
    async fn patch_configuration(
        &mut self,
        petshop_id: Uuid,
        patch: &ConfigurationPatch,
    ) -> Result<Option<PetshopConfiguration>, AppError>;

    // petshop_responsible_persons
    async fn find_responsible_person(&mut self, petshop_id: Uuid) -> Result<Option<ResponsiblePerson>, AppError>;
    async fn insert_responsible_person(&mut self, new: &NewResponsiblePerson) -> Result<ResponsiblePerson, AppError>;
    async fn patch_responsible_person(
        &mut self,
        petshop_id: Uuid,
        patch: &ResponsiblePersonPatch,
    ) -> Result<Option<ResponsiblePerson>, AppError>;

    // client_petshop_relations / client_petshop_infos
    async fn list_client_relations(&mut self, filter: &RelationFilter) -> Result<Vec<ClientPetshopRelation>, AppError>;
    async fn insert_client_relation(&mut self, client_id: Uuid, petshop_id: Uuid) -> Result<ClientPetshopRelation, AppError>;
    async fn set_client_relation_removed(
        &mut self,
        id: Uuid,
        is_removed: bool,
    ) -> Result<Option<ClientPetshopRelation>, AppError>;
    async fn list_client_infos(
        &mut self,
        client_id: Uuid,
        petshop_id: Option<Uuid>,
    ) -> Result<Vec<ClientPetshopInfo>, AppError>;
    async fn insert_client_info(&mut self, new: &NewClientInfo) -> Result<ClientPetshopInfo, AppError>;
    async fn patch_client_info(&mut self, id: Uuid, patch: &ClientInfoPatch) -> Result<Option<ClientPetshopInfo>, AppError>;

    // worker_petshop_relations
    async fn list_worker_relations(&mut self, filter: &RelationFilter) -> Result<Vec<WorkerPetshopRelation>, AppError>;
    async fn insert_worker_relation(&mut self, worker_id: Uuid, petshop_id: Uuid) -> Result<WorkerPetshopRelation, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

/// Ponto de entrada da persistência. Cada `begin` abre uma transação.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<UnitOfWork, AppError>;
}

// ---
// Unidade de trabalho: uma transação + validação de tudo que é escrito.
// Sair de escopo sem `commit` desfaz tudo (rollback).
// Operações aninhadas recebem `&mut UnitOfWork`, nunca abrem outra.
// ---
pub struct UnitOfWork {
    rows: Box<dyn RowStore>,
}

impl UnitOfWork {
    pub fn new(rows: Box<dyn RowStore>) -> Self {
        Self { rows }
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.rows.commit().await
    }

    // --- users ---

    pub async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        self.rows.find_user(id).await
    }

    pub async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        self.rows.find_user_by_email(email).await
    }

    pub async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        self.rows.list_users(filter).await
    }

    pub async fn insert_user(&mut self, new: NewUser) -> Result<User, AppError> {
        new.validate()?;
        self.rows.insert_user(&new).await
    }

    pub async fn patch_user(&mut self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError> {
        patch.validate()?;
        self.rows.patch_user(id, &patch).await
    }

    // --- addresses ---

    pub async fn list_addresses(&mut self, user_id: Uuid, scope: AddressScope) -> Result<Vec<Address>, AppError> {
        self.rows.list_addresses(user_id, scope).await
    }

    pub async fn insert_address(&mut self, new: NewAddress) -> Result<Address, AppError> {
        new.validate()?;
        self.rows.insert_address(&new).await
    }

    pub async fn patch_address(&mut self, id: Uuid, patch: AddressPatch) -> Result<Option<Address>, AppError> {
        patch.validate()?;
        self.rows.patch_address(id, &patch).await
    }

    // --- pets ---

    pub async fn list_pets(&mut self, client_id: Uuid, petshop_id: Option<Uuid>) -> Result<Vec<Pet>, AppError> {
        self.rows.list_pets(client_id, petshop_id).await
    }

    pub async fn insert_pet(&mut self, new: NewPet) -> Result<Pet, AppError> {
        new.validate()?;
        self.rows.insert_pet(&new).await
    }

    pub async fn patch_pet(&mut self, id: Uuid, patch: PetPatch) -> Result<Option<Pet>, AppError> {
        patch.validate()?;
        self.rows.patch_pet(id, &patch).await
    }

    // --- configuration ---

    pub async fn find_configuration(&mut self, petshop_id: Uuid) -> Result<Option<PetshopConfiguration>, AppError> {
        self.rows.find_configuration(petshop_id).await
    }

    pub async fn insert_configuration(&mut self, new: NewConfiguration) -> Result<PetshopConfiguration, AppError> {
        new.validate()?;
        self.rows.insert_configuration(&new).await
    }

    pub async fn patch_configuration(
        &mut self,
        petshop_id: Uuid,
        patch: ConfigurationPatch,
    ) -> Result<Option<PetshopConfiguration>, AppError> {
        patch.validate()?;
        self.rows.patch_configuration(petshop_id, &patch).await
    }

    // --- responsible person ---

    pub async fn find_responsible_person(&mut self, petshop_id: Uuid) -> Result<Option<ResponsiblePerson>, AppError> {
        self.rows.find_responsible_person(petshop_id).await
    }

    pub async fn insert_responsible_person(
        &mut self,
        new: NewResponsiblePerson,
    ) -> Result<ResponsiblePerson, AppError> {
        new.validate()?;
        self.rows.insert_responsible_person(&new).await
    }

    pub async fn patch_responsible_person(
        &mut self,
        petshop_id: Uuid,
        patch: ResponsiblePersonPatch,
    ) -> Result<Option<ResponsiblePerson>, AppError> {
        patch.validate()?;
        self.rows.patch_responsible_person(petshop_id, &patch).await
    }

    // --- client relations / info ---

    pub async fn list_client_relations(&mut self, filter: RelationFilter) -> Result<Vec<ClientPetshopRelation>, AppError> {
        self.rows.list_client_relations(&filter).await
    }

    pub async fn insert_client_relation(
        &mut self,
        client_id: Uuid,
        petshop_id: Uuid,
    ) -> Result<ClientPetshopRelation, AppError> {
        self.rows.insert_client_relation(client_id, petshop_id).await
    }

    pub async fn set_client_relation_removed(
        &mut self,
        id: Uuid,
        is_removed: bool,
    ) -> Result<Option<ClientPetshopRelation>, AppError> {
        self.rows.set_client_relation_removed(id, is_removed).await
    }

    pub async fn find_client_info(
        &mut self,
        client_id: Uuid,
        petshop_id: Uuid,
    ) -> Result<Option<ClientPetshopInfo>, AppError> {
        let infos = self.rows.list_client_infos(client_id, Some(petshop_id)).await?;
        Ok(infos.into_iter().next())
    }

    pub async fn insert_client_info(&mut self, new: NewClientInfo) -> Result<ClientPetshopInfo, AppError> {
        new.validate()?;
        self.rows.insert_client_info(&new).await
    }

    pub async fn patch_client_info(
        &mut self,
        id: Uuid,
        patch: ClientInfoPatch,
    ) -> Result<Option<ClientPetshopInfo>, AppError> {
        patch.validate()?;
        self.rows.patch_client_info(id, &patch).await
    }

    // --- worker relations ---

    pub async fn list_worker_relations(&mut self, filter: RelationFilter) -> Result<Vec<WorkerPetshopRelation>, AppError> {
        self.rows.list_worker_relations(&filter).await
    }

    pub async fn insert_worker_relation(
        &mut self,
        worker_id: Uuid,
        petshop_id: Uuid,
    ) -> Result<WorkerPetshopRelation, AppError> {
        self.rows.insert_worker_relation(worker_id, petshop_id).await
    }

    // ---
    // Carregamento do grafo: uma consulta por relação pedida,
    // todas dentro desta mesma transação.
    // ---
    pub async fn load_user(
        &mut self,
        id: Uuid,
        include: &Include,
        scope: GraphScope,
    ) -> Result<Option<UserGraph>, AppError> {
        let Some(user) = self.rows.find_user(id).await? else {
            return Ok(None);
        };

        let tenant = scope.tenant();
        let mut graph = UserGraph::bare(user);

        for relation in include.relations() {
            match relation {
                Relation::Address => {
                    let address_scope = tenant.map_or(AddressScope::Any, AddressScope::Tenant);
                    graph.address = Some(self.rows.list_addresses(id, address_scope).await?);
                }
                Relation::Pets => {
                    graph.pets = Some(self.rows.list_pets(id, tenant).await?);
                }
                Relation::ClientRelations => {
                    let mut filter = RelationFilter::active().member(id);
                    filter.petshop_id = tenant;
                    graph.client_petshop_relation = Some(self.rows.list_client_relations(&filter).await?);
                }
                Relation::ClientInfo => {
                    graph.client_petshop_info = Some(self.rows.list_client_infos(id, tenant).await?);
                }
                Relation::ClientPetshops => {
                    let mut filter = RelationFilter::active().member(id);
                    filter.petshop_id = tenant;
                    let relations = self.rows.list_client_relations(&filter).await?;
                    let ids = relations.iter().map(|r| r.petshop_id).collect();
                    graph.client_petshops = Some(self.petshop_summaries(ids, true).await?);
                }
                Relation::Configuration => {
                    graph.petshop_configuration = Some(self.rows.find_configuration(id).await?);
                }
                Relation::ResponsiblePerson => {
                    graph.responsible_person = Some(self.rows.find_responsible_person(id).await?);
                }
                Relation::Workers => {
                    let relations = self
                        .rows
                        .list_worker_relations(&RelationFilter::active().petshop(id))
                        .await?;
                    let filter = UserFilter {
                        ids: Some(relations.iter().map(|r| r.worker_id).collect()),
                        ..Default::default()
                    };
                    graph.workers = Some(self.rows.list_users(&filter).await?);
                }
                Relation::Petshops => {
                    let mut filter = RelationFilter::active().member(id);
                    filter.petshop_id = tenant;
                    let relations = self.rows.list_worker_relations(&filter).await?;
                    let ids = relations.iter().map(|r| r.petshop_id).collect();
                    graph.petshops = Some(self.petshop_summaries(ids, false).await?);
                }
            }
        }

        Ok(Some(graph))
    }

    /// Resumo (id, nome, telefone) dos petshops, com o endereço próprio se pedido.
    pub async fn petshop_summaries(
        &mut self,
        ids: Vec<Uuid>,
        with_address: bool,
    ) -> Result<Vec<PetshopSummary>, AppError> {
        let filter = UserFilter {
            ids: Some(ids),
            roles: Some(vec![Role::Petshop]),
            ..Default::default()
        };
        let petshops = self.rows.list_users(&filter).await?;

        let mut summaries = Vec::with_capacity(petshops.len());
        for petshop in &petshops {
            let address = if with_address {
                self.rows
                    .list_addresses(petshop.id, AddressScope::Own)
                    .await?
                    .into_iter()
                    .next()
            } else {
                None
            };
            summaries.push(PetshopSummary::from_user(petshop, address.as_ref()));
        }
        Ok(summaries)
    }
}
