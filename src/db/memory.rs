// src/db/memory.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
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

/// Conteúdo de todas as tabelas.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub addresses: Vec<Address>,
    pub pets: Vec<Pet>,
    pub configurations: Vec<PetshopConfiguration>,
    pub responsible_persons: Vec<ResponsiblePerson>,
    pub client_relations: Vec<ClientPetshopRelation>,
    pub client_infos: Vec<ClientPetshopInfo>,
    pub worker_relations: Vec<WorkerPetshopRelation>,
}

// ---
// Store em memória, usado nos testes.
// A unidade de trabalho segura o lock das tabelas e trabalha numa cópia:
// `commit` grava a cópia, drop simplesmente a descarta.
// ---
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cópia do estado já commitado.
    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<UnitOfWork, AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(UnitOfWork::new(Box::new(MemoryUnit { guard, work })))
    }
}

struct MemoryUnit {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

// updated_at sempre avança, mesmo com duas escritas no mesmo instante
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous { now } else { previous + Duration::microseconds(1) }
}

fn apply<T>(target: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *target = v.clone();
    }
}

#[async_trait]
impl RowStore for MemoryUnit {
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.work.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.work.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        Ok(self
            .work
            .users
            .iter()
            .filter(|u| filter.ids.as_ref().is_none_or(|ids| ids.contains(&u.id)))
            .filter(|u| {
                filter
                    .roles
                    .as_ref()
                    .is_none_or(|roles| roles.iter().any(|r| r.code() == u.auth))
            })
            .filter(|u| {
                filter
                    .blocked_from_email
                    .is_none_or(|blocked| u.is_blocked_from_receiving_email == blocked)
            })
            .cloned()
            .collect())
    }

    async fn insert_user(&mut self, new: &NewUser) -> Result<User, AppError> {
        if self.work.users.iter().any(|u| u.email == new.email) {
            return Err(AppError::UniqueViolation("users_email_key".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            password: new.password.clone(),
            name: new.name.clone(),
            phone_number: new.phone_number.clone(),
            additional_phone_number: new.additional_phone_number.clone(),
            auth: new.auth.code(),
            cnpj: new.cnpj.clone(),
            cpf: new.cpf.clone(),
            terms_version: new.terms_version.clone(),
            privacy_version: new.privacy_version.clone(),
            is_blocked_from_receiving_email: false,
            created_at: now,
            updated_at: now,
        };
        self.work.users.push(user.clone());
        Ok(user)
    }

    async fn patch_user(&mut self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError> {
        if let Some(email) = &patch.email {
            if self.work.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::UniqueViolation("users_email_key".to_string()));
            }
        }
        let Some(user) = self.work.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        apply(&mut user.email, &patch.email);
        apply(&mut user.password, &patch.password);
        apply(&mut user.name, &patch.name);
        apply(&mut user.phone_number, &patch.phone_number);
        apply(&mut user.additional_phone_number, &patch.additional_phone_number);
        apply(&mut user.cnpj, &patch.cnpj);
        apply(&mut user.cpf, &patch.cpf);
        apply(&mut user.terms_version, &patch.terms_version);
        apply(&mut user.privacy_version, &patch.privacy_version);
        apply(&mut user.is_blocked_from_receiving_email, &patch.is_blocked_from_receiving_email);
        user.updated_at = next_timestamp(user.updated_at);
        Ok(Some(user.clone()))
    }

    async fn list_addresses(&mut self, user_id: Uuid, scope: AddressScope) -> Result<Vec<Address>, AppError> {
        Ok(self
            .work
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id && scope.matches(a))
            .cloned()
            .collect())
    }

    async fn insert_address(&mut self, new: &NewAddress) -> Result<Address, AppError> {
        let now = Utc::now();
        let address = Address {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            petshop_id: new.petshop_id,
            cep: new.cep.clone(),
            city: new.city.clone(),
            uf: new.uf.clone(),
            district: new.district.clone(),
            street: new.street.clone(),
            street_number: new.street_number,
            complement: new.complement.clone(),
            delivery_value: new.delivery_value,
            delivery_time: new.delivery_time,
            created_at: now,
            updated_at: now,
        };
        self.work.addresses.push(address.clone());
        Ok(address)
    }

    async fn patch_address(&mut self, id: Uuid, patch: &AddressPatch) -> Result<Option<Address>, AppError> {
        let Some(address) = self.work.addresses.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        apply(&mut address.cep, &patch.cep);
        apply(&mut address.city, &patch.city);
        apply(&mut address.uf, &patch.uf);
        apply(&mut address.district, &patch.district);
        apply(&mut address.street, &patch.street);
        apply(&mut address.street_number, &patch.street_number);
        apply(&mut address.complement, &patch.complement);
        apply(&mut address.delivery_value, &patch.delivery_value);
        apply(&mut address.delivery_time, &patch.delivery_time);
        address.updated_at = next_timestamp(address.updated_at);
        Ok(Some(address.clone()))
    }

    async fn list_pets(&mut self, client_id: Uuid, petshop_id: Option<Uuid>) -> Result<Vec<Pet>, AppError> {
        Ok(self
            .work
            .pets
            .iter()
            .filter(|p| p.client_id == client_id && petshop_id.is_none_or(|id| p.petshop_id == id))
            .cloned()
            .collect())
    }

    async fn insert_pet(&mut self, new: &NewPet) -> Result<Pet, AppError> {
        let now = Utc::now();
        let pet = Pet {
            id: Uuid::new_v4(),
            client_id: new.client_id,
            petshop_id: new.petshop_id,
            name: new.name.clone(),
            breed: new.breed.clone(),
            body_size: new.body_size,
            fur_size: new.fur_size,
            notes: new.notes.clone(),
            extra_time: new.extra_time,
            created_at: now,
            updated_at: now,
        };
        self.work.pets.push(pet.clone());
        Ok(pet)
    }

    async fn patch_pet(&mut self, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError> {
        let Some(pet) = self.work.pets.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        apply(&mut pet.name, &patch.name);
        apply(&mut pet.breed, &patch.breed);
        apply(&mut pet.body_size, &patch.body_size);
        apply(&mut pet.fur_size, &patch.fur_size);
        apply(&mut pet.notes, &patch.notes);
        apply(&mut pet.extra_time, &patch.extra_time);
        pet.updated_at = next_timestamp(pet.updated_at);
        Ok(Some(pet.clone()))
    }

    async fn find_configuration(&mut self, petshop_id: Uuid) -> Result<Option<PetshopConfiguration>, AppError> {
        Ok(self
            .work
            .configurations
            .iter()
            .find(|c| c.petshop_id == petshop_id)
            .cloned())
    }

    async fn insert_configuration(&mut self, new: &NewConfiguration) -> Result<PetshopConfiguration, AppError> {
        if self.work.configurations.iter().any(|c| c.petshop_id == new.petshop_id) {
            return Err(AppError::UniqueViolation(
                "petshop_configurations_petshop_id_key".to_string(),
            ));
        }
        let now = Utc::now();
        let config = PetshopConfiguration {
            id: Uuid::new_v4(),
            petshop_id: new.petshop_id,
            payment_through_app: new.payment_through_app,
            payment_outside_app: new.payment_outside_app,
            cancellation_fee: new.cancellation_fee,
            schedule_through_app_cancel_if_not_payed: new.schedule_through_app_cancel_if_not_payed,
            created_at: now,
            updated_at: now,
        };
        self.work.configurations.push(config.clone());
        Ok(config)
    }

    async fn patch_configuration(
        &mut self,
        petshop_id: Uuid,
        patch: &ConfigurationPatch,
    ) -> Result<Option<PetshopConfiguration>, AppError> {
        let Some(config) = self
            .work
            .configurations
            .iter_mut()
            .find(|c| c.petshop_id == petshop_id)
        else {
            return Ok(None);
        };
        apply(&mut config.payment_through_app, &patch.payment_through_app);
        apply(&mut config.payment_outside_app, &patch.payment_outside_app);
        apply(&mut config.cancellation_fee, &patch.cancellation_fee);
        apply(
            &mut config.schedule_through_app_cancel_if_not_payed,
            &patch.schedule_through_app_cancel_if_not_payed,
        );
        config.updated_at = next_timestamp(config.updated_at);
        Ok(Some(config.clone()))
    }

    async fn find_responsible_person(&mut self, petshop_id: Uuid) -> Result<Option<ResponsiblePerson>, AppError> {
        Ok(self
            .work
            .responsible_persons
            .iter()
            .find(|r| r.petshop_id == petshop_id)
            .cloned())
    }

    async fn insert_responsible_person(&mut self, new: &NewResponsiblePerson) -> Result<ResponsiblePerson, AppError> {
        if self.work.responsible_persons.iter().any(|r| r.petshop_id == new.petshop_id) {
            return Err(AppError::UniqueViolation(
                "petshop_responsible_persons_petshop_id_key".to_string(),
            ));
        }
        let now = Utc::now();
        let person = ResponsiblePerson {
            id: Uuid::new_v4(),
            petshop_id: new.petshop_id,
            name: new.name.clone(),
            phone_number: new.phone_number.clone(),
            cpf: new.cpf.clone(),
            created_at: now,
            updated_at: now,
        };
        self.work.responsible_persons.push(person.clone());
        Ok(person)
    }

    async fn patch_responsible_person(
        &mut self,
        petshop_id: Uuid,
        patch: &ResponsiblePersonPatch,
    ) -> Result<Option<ResponsiblePerson>, AppError> {
        let Some(person) = self
            .work
            .responsible_persons
            .iter_mut()
            .find(|r| r.petshop_id == petshop_id)
        else {
            return Ok(None);
        };
        apply(&mut person.name, &patch.name);
        apply(&mut person.phone_number, &patch.phone_number);
        apply(&mut person.cpf, &patch.cpf);
        person.updated_at = next_timestamp(person.updated_at);
        Ok(Some(person.clone()))
    }

    async fn list_client_relations(&mut self, filter: &RelationFilter) -> Result<Vec<ClientPetshopRelation>, AppError> {
        Ok(self
            .work
            .client_relations
            .iter()
            .filter(|r| filter.matches(r.client_id, r.petshop_id, r.is_removed))
            .cloned()
            .collect())
    }

    async fn insert_client_relation(&mut self, client_id: Uuid, petshop_id: Uuid) -> Result<ClientPetshopRelation, AppError> {
        if self.work.client_relations.iter().any(|r| r.client_id == client_id && r.petshop_id == petshop_id) {
            return Err(AppError::UniqueViolation("client_petshop_relations_client_petshop_key".to_string()));
        }
        let now = Utc::now();
        let relation = ClientPetshopRelation {
            id: Uuid::new_v4(),
            client_id,
            petshop_id,
            is_removed: false,
            created_at: now,
            updated_at: now,
        };
        self.work.client_relations.push(relation.clone());
        Ok(relation)
    }

    async fn set_client_relation_removed(
        &mut self,
        id: Uuid,
        is_removed: bool,
    ) -> Result<Option<ClientPetshopRelation>, AppError> {
        let Some(relation) = self.work.client_relations.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        relation.is_removed = is_removed;
        relation.updated_at = next_timestamp(relation.updated_at);
        Ok(Some(relation.clone()))
    }

    async fn list_client_infos(
        &mut self,
        client_id: Uuid,
        petshop_id: Option<Uuid>,
    ) -> Result<Vec<ClientPetshopInfo>, AppError> {
        Ok(self
            .work
            .client_infos
            .iter()
            .filter(|i| i.client_id == client_id && petshop_id.is_none_or(|id| i.petshop_id == id))
            .cloned()
            .collect())
    }

    async fn insert_client_info(&mut self, new: &NewClientInfo) -> Result<ClientPetshopInfo, AppError> {
        let same_pair = |i: &ClientPetshopInfo| i.client_id == new.client_id && i.petshop_id == new.petshop_id;
        if self.work.client_infos.iter().any(same_pair) {
            return Err(AppError::UniqueViolation("client_petshop_infos_client_petshop_key".to_string()));
        }
        let now = Utc::now();
        let info = ClientPetshopInfo {
            id: Uuid::new_v4(),
            client_id: new.client_id,
            petshop_id: new.petshop_id,
            notes: new.notes.clone(),
            can_schedule_through_app: new.can_schedule_through_app,
            created_at: now,
            updated_at: now,
        };
        self.work.client_infos.push(info.clone());
        Ok(info)
    }

    async fn patch_client_info(&mut self, id: Uuid, patch: &ClientInfoPatch) -> Result<Option<ClientPetshopInfo>, AppError> {
        let Some(info) = self.work.client_infos.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        apply(&mut info.notes, &patch.notes);
        apply(&mut info.can_schedule_through_app, &patch.can_schedule_through_app);
        info.updated_at = next_timestamp(info.updated_at);
        Ok(Some(info.clone()))
    }

    async fn list_worker_relations(&mut self, filter: &RelationFilter) -> Result<Vec<WorkerPetshopRelation>, AppError> {
        Ok(self
            .work
            .worker_relations
            .iter()
            .filter(|r| filter.matches(r.worker_id, r.petshop_id, r.is_removed))
            .cloned()
            .collect())
    }

    async fn insert_worker_relation(&mut self, worker_id: Uuid, petshop_id: Uuid) -> Result<WorkerPetshopRelation, AppError> {
        let now = Utc::now();
        let relation = WorkerPetshopRelation {
            id: Uuid::new_v4(),
            worker_id,
            petshop_id,
            is_removed: false,
            created_at: now,
            updated_at: now,
        };
        self.work.worker_relations.push(relation.clone());
        Ok(relation)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryUnit { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "hash".to_string(),
            name: "Maria".to_string(),
            phone_number: Some("11999999999".to_string()),
            additional_phone_number: None,
            auth: Role::Client,
            cnpj: None,
            cpf: None,
            terms_version: "v0".to_string(),
            privacy_version: "v0".to_string(),
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_discards_writes() {
        let store = MemoryStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            uow.insert_user(new_user("maria@example.com")).await.unwrap();
        }
        assert!(store.snapshot().await.users.is_empty());

        let mut uow = store.begin().await.unwrap();
        uow.insert_user(new_user("maria@example.com")).await.unwrap();
        uow.commit().await.unwrap();
        assert_eq!(store.snapshot().await.users.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert_user(new_user("maria@example.com")).await.unwrap();
        let err = uow.insert_user(new_user("maria@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueViolation(ref c) if c == "users_email_key"));
    }

    #[tokio::test]
    async fn invalid_rows_are_rejected_before_writing() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let mut user = new_user("maria@example.com");
        user.name = "x".repeat(256);
        let err = uow.insert_user(user).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(uow.list_users(&UserFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn patches_keep_absent_fields_and_advance_updated_at() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow.insert_user(new_user("maria@example.com")).await.unwrap();

        let patched = uow
            .patch_user(user.id, UserPatch { cpf: Some(Some("123".into())), ..Default::default() })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.cpf.as_deref(), Some("123"));
        assert_eq!(patched.name, user.name);
        assert_eq!(patched.phone_number, user.phone_number);
        assert_eq!(patched.created_at, user.created_at);
        assert!(patched.updated_at > user.updated_at);
    }

    #[tokio::test]
    async fn one_relation_and_one_info_per_client_and_petshop() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let client = uow.insert_user(new_user("maria@example.com")).await.unwrap();
        let petshop = Uuid::new_v4();

        uow.insert_client_relation(client.id, petshop).await.unwrap();
        let err = uow.insert_client_relation(client.id, petshop).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueViolation(ref c) if c == "client_petshop_relations_client_petshop_key"));

        let info = || NewClientInfo { client_id: client.id, petshop_id: petshop, notes: None, can_schedule_through_app: true };
        uow.insert_client_info(info()).await.unwrap();
        let err = uow.insert_client_info(info()).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueViolation(ref c) if c == "client_petshop_infos_client_petshop_key"));

        // outro petshop pode ter o mesmo cliente
        uow.insert_client_relation(client.id, Uuid::new_v4()).await.unwrap();
    }
}
