// src/services/petshop_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::{GraphScope, Include, Store},
    models::{
        address::{AddressPatch, AddressPayload, AddressScope},
        auth::{Principal, Role},
        client::{ClientPayload, ClientUserPayload},
        pet::{BodySize, FurSize, PetPayload},
        petshop::{CreatePetshopPayload, CreatedPetshop, NewConfiguration, UpdatePetshopPayload, UpdatedPetshop},
        relation::ClientInfoPayload,
        user::{NewUser, PetshopSummary, UserFilter, UserGraph, UserPatch},
    },
    services::{
        client_service::seed_client_in,
        notification::{CreatedUserEmail, EmailFlavor, Notifier, report, spawn_best_effort},
        password::{PasswordHasher, random_password},
        policy::{Capability, require},
    },
};

const DEMO_CLIENT_DOMAIN: &str = "clienteteste.com.br";
const DEMO_CLIENT_NAME: &str = "Cliente Teste";

/// Versões dos termos e da política de privacidade vigentes.
#[derive(Debug, Clone)]
pub struct PolicyVersions {
    pub terms: String,
    pub privacy: String,
}

#[derive(Clone)]
pub struct PetshopService {
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn Notifier>,
    policy_versions: PolicyVersions,
}

impl PetshopService {
    pub fn new(hasher: Arc<dyn PasswordHasher>, notifier: Arc<dyn Notifier>, policy_versions: PolicyVersions) -> Self {
        Self { hasher, notifier, policy_versions }
    }

    // ---
    // Cadastro aberto de um petshop. Usuário, endereço, configuração padrão
    // e o cliente de demonstração entram (ou não) juntos.
    // ---
    pub async fn create_petshop(&self, store: &dyn Store, payload: CreatePetshopPayload) -> Result<CreatedPetshop, AppError> {
        let CreatePetshopPayload { user, address } = payload;

        let password = self.hasher.hash(&user.password).await?;
        let demo_password = self.hasher.hash(&random_password()).await?;
        let demo_client = demo_client_payload(&user.email, &user.phone_number, &address);

        let mut uow = store.begin().await?;

        let petshop = uow
            .insert_user(NewUser {
                email: user.email,
                password,
                name: user.name,
                phone_number: Some(user.phone_number),
                additional_phone_number: None,
                auth: Role::Petshop,
                cnpj: Some(user.cnpj),
                cpf: None,
                terms_version: self.policy_versions.terms.clone(),
                privacy_version: self.policy_versions.privacy.clone(),
            })
            .await?;

        // Endereço do próprio petshop: sem preço de entrega
        let mut own_address = address.into_new(petshop.id, None);
        own_address.delivery_value = None;
        own_address.delivery_time = None;
        let address = uow.insert_address(own_address).await?;

        let petshop_configuration = uow.insert_configuration(NewConfiguration::defaults(petshop.id)).await?;
        let demo = seed_client_in(&mut uow, petshop.id, demo_client, demo_password).await?;

        uow.commit().await?;

        tracing::info!("Petshop {} cadastrado", petshop.id);

        // Teste grátis primeiro, depois o e-mail de boas-vindas
        let notifier = self.notifier.clone();
        let petshop_id = petshop.id;
        let email = CreatedUserEmail {
            email: petshop.email.clone(),
            name: petshop.name.clone(),
            flavor: EmailFlavor::Petshop,
            petshop_name: None,
        };
        spawn_best_effort("boas-vindas do petshop", async move {
            report("teste grátis do petshop", notifier.create_free_trial(petshop_id).await);
            notifier.send_created_user_email(email).await
        });

        Ok(CreatedPetshop {
            user: petshop,
            address,
            petshop_configuration,
            client_list: vec![demo],
        })
    }

    /// E-mail e CNPJ não mudam por aqui.
    pub async fn update_petshop(
        &self,
        store: &dyn Store,
        principal: &Principal,
        payload: UpdatePetshopPayload,
    ) -> Result<UpdatedPetshop, AppError> {
        require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;

        let UpdatePetshopPayload { user, address } = payload;
        let user_patch = UserPatch {
            name: user.name,
            phone_number: user.phone_number.map(Some),
            ..Default::default()
        };

        let mut uow = store.begin().await?;
        let not_found = || {
            AppError::not_found(
                MessageKey::UserOrAddressNotFound,
                format!("Petshop {} e/ou endereço não encontrados", principal.id),
            )
        };

        let current_address = uow
            .list_addresses(principal.id, AddressScope::Own)
            .await?
            .into_iter()
            .next()
            .ok_or_else(not_found)?;

        let user = uow.patch_user(principal.id, user_patch).await?.ok_or_else(not_found)?;
        let address = uow
            .patch_address(current_address.id, AddressPatch::from(address))
            .await?
            .ok_or_else(not_found)?;

        uow.commit().await?;
        Ok(UpdatedPetshop { user, address })
    }

    pub async fn get_petshop(&self, store: &dyn Store, principal: &Principal) -> Result<UserGraph, AppError> {
        require(principal, Capability::Petshop, MessageKey::NotAuthorized)?;
        self.load_petshop(store, principal.id).await
    }

    pub async fn micro_get_petshop(
        &self,
        store: &dyn Store,
        principal: &Principal,
        petshop_id: Uuid,
    ) -> Result<UserGraph, AppError> {
        require(principal, Capability::Service, MessageKey::NotAuthorized)?;
        self.load_petshop(store, petshop_id).await
    }

    /// Lista pública: id, nome, telefone e endereço de cada petshop.
    pub async fn list_petshops(&self, store: &dyn Store) -> Result<Vec<PetshopSummary>, AppError> {
        let mut uow = store.begin().await?;
        let filter = UserFilter { roles: Some(vec![Role::Petshop]), ..Default::default() };
        let ids = uow.list_users(&filter).await?.into_iter().map(|u| u.id).collect();
        uow.petshop_summaries(ids, true).await
    }

    async fn load_petshop(&self, store: &dyn Store, petshop_id: Uuid) -> Result<UserGraph, AppError> {
        let mut uow = store.begin().await?;
        uow.load_user(petshop_id, &Include::petshop(), GraphScope::Unscoped)
            .await?
            .ok_or_else(|| AppError::not_found(MessageKey::UserNotFound, format!("Petshop {} não encontrado", petshop_id)))
    }
}

/// E-mail do cliente de demonstração: "loja@petmail.com" -> "loja+petmail.com@clienteteste.com.br".
///
/// Domínio não tem '+', então cada e-mail de petshop gera um endereço diferente.
pub fn demo_client_email(petshop_email: &str) -> String {
    let (local, domain) = petshop_email.rsplit_once('@').unwrap_or((petshop_email, ""));
    format!("{}+{}@{}", local, domain, DEMO_CLIENT_DOMAIN)
}

fn demo_client_payload(petshop_email: &str, phone_number: &str, address: &AddressPayload) -> ClientPayload {
    ClientPayload {
        user: ClientUserPayload {
            email: demo_client_email(petshop_email),
            name: DEMO_CLIENT_NAME.to_string(),
            phone_number: phone_number.to_string(),
            additional_phone_number: None,
        },
        address: Some(AddressPayload {
            id: None,
            delivery_value: Some(2000),
            delivery_time: Some(10),
            ..address.clone()
        }),
        pets: vec![PetPayload {
            id: None,
            name: "Rex".to_string(),
            breed: Some("SRD".to_string()),
            body_size: BodySize::Medium,
            fur_size: FurSize::Short,
            notes: Some("Dócil.".to_string()),
            extra_time: Some(0),
        }],
        client_info: ClientInfoPayload {
            notes: Some(Some("Qualquer observação sobre o cliente.".to_string())),
            can_schedule_through_app: Some(true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_email_differs_for_every_petshop_email() {
        assert_eq!(demo_client_email("loja@petmail.com"), "loja+petmail.com@clienteteste.com.br");
        assert_ne!(demo_client_email("loja@petmail.com"), demo_client_email("loja@pets.com"));
    }

    #[test]
    fn demo_client_copies_the_petshop_address_with_delivery_pricing() {
        let address = AddressPayload {
            id: None,
            cep: "01001000".into(),
            city: "São Paulo".into(),
            uf: "SP".into(),
            district: "Sé".into(),
            street: "Praça da Sé".into(),
            street_number: 100,
            complement: Some("Loja 2".into()),
            delivery_value: None,
            delivery_time: None,
        };
        let payload = demo_client_payload("loja@petmail.com", "11999990000", &address);

        let demo_address = payload.address.unwrap();
        assert_eq!(demo_address.street_number, 100);
        assert_eq!(demo_address.complement.as_deref(), Some("Loja 2"));
        assert_eq!(demo_address.delivery_value, Some(2000));
        assert_eq!(demo_address.delivery_time, Some(10));
        assert_eq!(payload.user.name, "Cliente Teste");
        assert_eq!(payload.pets.len(), 1);
        assert_eq!(payload.pets[0].name, "Rex");
    }
}
