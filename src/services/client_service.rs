// src/services/client_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::{GraphScope, Include, Relation, Store, UnitOfWork},
    models::{
        address::{Address, AddressPayload, AddressScope, empty_as_none},
        auth::{Principal, Role},
        client::{
            ClientCpfPayload, ClientPayload, ClientPetshopView, ClientSelfUpdatePayload, ClientSelfView,
            ClientUserPayload, CreatedClient, ScheduledClientCheckPayload, ScheduledClientData, UpdatedClient,
        },
        pet::{PetPayload, PetSummary},
        relation::{ClientInfoPayload, ClientInfoSummary, ClientPetshopRelation, RelationFilter},
        user::{NewUser, User, UserGraph, UserPatch},
    },
    services::{
        notification::{CreatedUserEmail, EmailFlavor, Notifier, spawn_best_effort},
        password::{PasswordHasher, random_password},
        policy::{Capability, require, require_any},
        tenancy_service::{ExplicitTenant, resolve_tenant},
    },
};

// Versão dos termos para contas criadas por terceiros:
// o próprio cliente aceita no primeiro acesso
const UNACCEPTED_POLICY_VERSION: &str = "v0";

#[derive(Clone)]
pub struct ClientService {
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn Notifier>,
}

impl ClientService {
    pub fn new(hasher: Arc<dyn PasswordHasher>, notifier: Arc<dyn Notifier>) -> Self {
        Self { hasher, notifier }
    }

    /// Cadastra um cliente no petshop de quem chama, numa única transação.
    pub async fn create_client(
        &self,
        store: &dyn Store,
        principal: &Principal,
        payload: ClientPayload,
    ) -> Result<CreatedClient, AppError> {
        require(principal, Capability::Petshop, MessageKey::OnlyPetshopCanAddClients)?;
        let tenant = principal.id;

        // bcrypt fora da transação
        let placeholder_password = self.hasher.hash(&random_password()).await?;

        let mut uow = store.begin().await?;
        let created = create_client_in(&mut uow, tenant, payload, placeholder_password).await?;
        let petshop_name = uow.find_user(tenant).await?.map(|p| p.name);
        uow.commit().await?;

        tracing::info!(
            "Cliente {} adicionado ao petshop {} (já existia: {})",
            created.user.id,
            tenant,
            created.already_exists
        );

        let notifier = self.notifier.clone();
        let email = CreatedUserEmail {
            email: created.user.email.clone(),
            name: created.user.name.clone(),
            flavor: EmailFlavor::Client,
            petshop_name,
        };
        spawn_best_effort("e-mail de novo cliente", async move {
            notifier.send_created_user_email(email).await
        });

        Ok(created)
    }

    pub async fn update_client(
        &self,
        store: &dyn Store,
        principal: &Principal,
        client_id: Uuid,
        payload: ClientPayload,
    ) -> Result<UpdatedClient, AppError> {
        require(principal, Capability::Petshop, MessageKey::OnlyPetshopCanUpdateClients)?;
        let tenant = principal.id;

        let mut uow = store.begin().await?;

        // Carrega já filtrado pelo tenant: de outro petshop = não encontrado
        let graph = load_client_in_tenant(&mut uow, client_id, tenant)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    MessageKey::ClientNotFound,
                    format!("Cliente {} não encontrado ou não pertence ao petshop {}", client_id, tenant),
                )
            })?;

        if !graph.user.is_client_family() {
            return Err(AppError::forbidden(
                MessageKey::ClientCannotBeUpdated,
                format!("Usuário {} não é cliente e não pode ser atualizado", client_id),
            ));
        }

        let relation_matches = graph
            .client_petshop_relation
            .as_deref()
            .and_then(|relations| relations.first())
            .is_some_and(|r| r.petshop_id == tenant);
        if !relation_matches {
            return Err(AppError::forbidden(
                MessageKey::ClientNotInPetshop,
                format!("Cliente {} não pertence ao petshop {}", client_id, tenant),
            ));
        }

        require_delivery_pricing(payload.address.as_ref())?;
        let ClientPayload { user, address, pets, client_info } = payload;

        let current_address = graph.address.as_deref().and_then(|a| a.first()).cloned();
        let client_address = match (current_address, address) {
            (Some(current), Some(input)) => {
                if input.id != Some(current.id) {
                    return Err(AppError::forbidden(
                        MessageKey::AddressNotOwned,
                        format!("Endereço {:?} não pertence ao cliente {}", input.id, client_id),
                    ));
                }
                Some(upsert_address(&mut uow, Some(current), input, client_id, tenant).await?)
            }
            (None, Some(input)) => Some(upsert_address(&mut uow, None, input, client_id, tenant).await?),
            (current, None) => current,
        };

        let updated_user = uow
            .patch_user(client_id, user.into_patch())
            .await?
            .ok_or_else(|| AppError::not_found(MessageKey::ClientNotFound, format!("Cliente {} sumiu", client_id)))?;

        let info = uow.find_client_info(client_id, tenant).await?.ok_or_else(|| {
            AppError::not_found(
                MessageKey::ClientNotFound,
                format!("Informações do cliente {} no petshop {} não encontradas", client_id, tenant),
            )
        })?;
        let client_petshop_info = uow
            .patch_client_info(info.id, client_info.into_patch())
            .await?
            .ok_or_else(|| anyhow::anyhow!("info {} sumiu durante a transação", info.id))?;

        let owned_pets = graph.pets.unwrap_or_default();
        let mut updated_pets = Vec::with_capacity(pets.len());
        for pet in pets {
            match pet.id {
                Some(pet_id) => {
                    if !owned_pets.iter().any(|p| p.id == pet_id) {
                        return Err(AppError::not_found(
                            MessageKey::PetNotFound,
                            format!("Pet {} do petshop {} não encontrado", pet_id, tenant),
                        ));
                    }
                    let updated = uow
                        .patch_pet(pet_id, pet.into_patch())
                        .await?
                        .ok_or_else(|| anyhow::anyhow!("pet {} sumiu durante a transação", pet_id))?;
                    updated_pets.push(updated);
                }
                None => updated_pets.push(uow.insert_pet(pet.into_new(client_id, tenant)).await?),
            }
        }

        uow.commit().await?;

        Ok(UpdatedClient {
            user: updated_user,
            client_address,
            pets: updated_pets,
            client_petshop_info,
        })
    }

    /// Clientes ativos do petshop (ou do petshop onde o colaborador trabalha).
    pub async fn list_clients(
        &self,
        store: &dyn Store,
        principal: &Principal,
        petshop_id: Option<Uuid>,
    ) -> Result<Vec<UserGraph>, AppError> {
        require_any(principal, &[Capability::Petshop, Capability::Worker], MessageKey::NotAuthorized)?;

        let mut uow = store.begin().await?;
        let tenant = resolve_tenant(&mut uow, principal, petshop_id, ExplicitTenant::Ignore).await?;

        let relations = uow
            .list_client_relations(RelationFilter::active().petshop(tenant))
            .await?;

        let mut clients = Vec::with_capacity(relations.len());
        for relation in relations {
            if let Some(client) = load_client_in_tenant(&mut uow, relation.client_id, tenant).await? {
                clients.push(client);
            }
        }
        Ok(clients)
    }

    // Um bloco por petshop: pets sem observações internas, endereço daquele
    // petshop e o resumo do petshop com o endereço dele
    pub async fn get_client_self(&self, store: &dyn Store, principal: &Principal) -> Result<ClientSelfView, AppError> {
        require(principal, Capability::Client, MessageKey::NotAClient)?;

        let mut uow = store.begin().await?;
        let graph = uow
            .load_user(
                principal.id,
                &Include::new()
                    .with(Relation::ClientRelations)
                    .with(Relation::Pets)
                    .with(Relation::Address)
                    .with(Relation::ClientInfo)
                    .with(Relation::ClientPetshops),
                GraphScope::Unscoped,
            )
            .await?
            .ok_or_else(|| {
                AppError::not_found(MessageKey::DataNotFound, format!("Cliente {} não encontrado", principal.id))
            })?;

        let pets = graph.pets.unwrap_or_default();
        let addresses = graph.address.unwrap_or_default();
        let infos = graph.client_petshop_info.unwrap_or_default();
        let petshops = graph.client_petshops.unwrap_or_default();

        let views = graph
            .client_petshop_relation
            .unwrap_or_default()
            .iter()
            .map(|relation| ClientPetshopView {
                pets: pets
                    .iter()
                    .filter(|p| p.petshop_id == relation.petshop_id)
                    .map(PetSummary::from)
                    .collect(),
                client_address: addresses
                    .iter()
                    .find(|a| a.petshop_id == Some(relation.petshop_id))
                    .cloned(),
                client_petshop_info: infos
                    .iter()
                    .find(|i| i.petshop_id == relation.petshop_id)
                    .map(|i| ClientInfoSummary {
                        petshop_id: i.petshop_id,
                        can_schedule_through_app: i.can_schedule_through_app,
                    }),
                petshop_info: petshops.iter().find(|p| p.id == relation.petshop_id).cloned(),
            })
            .collect();

        Ok(ClientSelfView { user: graph.user, petshops: views })
    }

    pub async fn update_client_self(
        &self,
        store: &dyn Store,
        principal: &Principal,
        payload: ClientSelfUpdatePayload,
    ) -> Result<User, AppError> {
        require(principal, Capability::Client, MessageKey::NotAClient)?;

        let mut uow = store.begin().await?;
        let user = uow
            .patch_user(principal.id, UserPatch::from(payload))
            .await?
            .ok_or_else(|| {
                AppError::not_found(MessageKey::DataNotFound, format!("Cliente {} não encontrado", principal.id))
            })?;
        uow.commit().await?;
        Ok(user)
    }

    /// Só o CPF, e só de um cliente ativo no petshop de quem chama.
    pub async fn update_client_cpf(
        &self,
        store: &dyn Store,
        principal: &Principal,
        client_id: Uuid,
        payload: ClientCpfPayload,
    ) -> Result<User, AppError> {
        require(principal, Capability::Petshop, MessageKey::NotAPetshop)?;
        let tenant = principal.id;

        let mut uow = store.begin().await?;
        let related = !uow
            .list_client_relations(RelationFilter::active().member(client_id).petshop(tenant))
            .await?
            .is_empty();

        if !related {
            return Err(AppError::not_found(
                MessageKey::DataNotFound,
                format!("Cliente {} não encontrado no petshop {}", client_id, tenant),
            ));
        }

        let patch = UserPatch { cpf: Some(Some(payload.cpf)), ..Default::default() };
        let user = uow.patch_user(client_id, patch).await?.ok_or_else(|| {
            AppError::not_found(MessageKey::DataNotFound, format!("Cliente {} não encontrado", client_id))
        })?;
        uow.commit().await?;
        Ok(user)
    }

    pub async fn micro_get_client_petshop(
        &self,
        store: &dyn Store,
        principal: &Principal,
        client_id: Uuid,
        petshop_id: Uuid,
    ) -> Result<UserGraph, AppError> {
        require(principal, Capability::Service, MessageKey::NotAuthorized)?;

        let mut uow = store.begin().await?;
        load_client_in_tenant(&mut uow, client_id, petshop_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    MessageKey::ClientNotFound,
                    format!("Cliente {} não encontrado no petshop {}", client_id, petshop_id),
                )
            })
    }

    pub async fn micro_check_client_petshops(
        &self,
        store: &dyn Store,
        principal: &Principal,
        client_id: Uuid,
    ) -> Result<UserGraph, AppError> {
        require(principal, Capability::Service, MessageKey::NotAuthorized)?;

        let mut uow = store.begin().await?;
        uow.load_user(client_id, &Include::new().with(Relation::ClientRelations), GraphScope::Unscoped)
            .await?
            .ok_or_else(|| AppError::not_found(MessageKey::ClientNotFound, format!("Cliente {} não encontrado", client_id)))
    }

    // Conferência feita pela agenda antes de marcar um horário
    pub async fn check_scheduled_client_data(
        &self,
        store: &dyn Store,
        principal: &Principal,
        payload: ScheduledClientCheckPayload,
    ) -> Result<ScheduledClientData, AppError> {
        require(principal, Capability::Service, MessageKey::NotAuthorized)?;

        let ScheduledClientCheckPayload { client_id, pet_id, petshop_id, pay_through_app, delivery_value } = payload;

        let mut uow = store.begin().await?;
        let not_found = || {
            AppError::not_found(
                MessageKey::ClientOrPetNotFound,
                format!("Cliente {} com o pet {} não encontrado no petshop {}", client_id, pet_id, petshop_id),
            )
        };

        let mut client = load_client_in_tenant(&mut uow, client_id, petshop_id)
            .await?
            .ok_or_else(not_found)?;

        let pets: Vec<_> = client
            .pets
            .take()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.id == pet_id)
            .collect();
        if pets.is_empty() {
            return Err(not_found());
        }
        client.pets = Some(pets);

        if let Some(delivery_value) = delivery_value {
            let address = client.address.as_deref().and_then(|a| a.first()).ok_or_else(|| {
                AppError::not_found(
                    MessageKey::DeliveryWithoutAddress,
                    format!("Cliente {} não tem endereço no petshop {}", client_id, petshop_id),
                )
            })?;
            if address.delivery_value != Some(delivery_value) {
                return Err(AppError::not_found(
                    MessageKey::DeliveryValueMismatch,
                    format!("Valor de entrega {} diferente do cadastrado para o cliente {}", delivery_value, client_id),
                ));
            }
        }

        let config = uow.find_configuration(petshop_id).await?.ok_or_else(|| {
            AppError::not_found(
                MessageKey::ConfigurationNotFound,
                format!("Petshop {} sem configurações", petshop_id),
            )
        })?;

        let cancel_if_not_payed = if pay_through_app {
            if !config.payment_through_app {
                return Err(AppError::not_found(
                    MessageKey::PaymentThroughAppNotAllowed,
                    format!("Petshop {} não aceita pagamento pelo app", petshop_id),
                ));
            }
            config.schedule_through_app_cancel_if_not_payed
        } else {
            if !config.payment_outside_app {
                return Err(AppError::not_found(
                    MessageKey::PaymentOutsideAppNotAllowed,
                    format!("Petshop {} não aceita pagamento fora do app", petshop_id),
                ));
            }
            false
        };

        Ok(ScheduledClientData {
            client,
            cancellation_fee: config.cancellation_fee,
            schedule_through_app_cancel_if_not_payed: cancel_if_not_payed,
        })
    }
}

// Cliente como o petshop o enxerga. `None` se não houver vínculo ativo
// ou informações do cliente naquele petshop.
async fn load_client_in_tenant(
    uow: &mut UnitOfWork,
    client_id: Uuid,
    tenant: Uuid,
) -> Result<Option<UserGraph>, AppError> {
    let Some(graph) = uow
        .load_user(client_id, &Include::client_in_tenant(), GraphScope::Tenant(tenant))
        .await?
    else {
        return Ok(None);
    };

    let has_relation = graph.client_petshop_relation.as_ref().is_some_and(|r| !r.is_empty());
    let has_info = graph.client_petshop_info.as_ref().is_some_and(|i| !i.is_empty());

    Ok((has_relation && has_info).then_some(graph))
}

// Insere o endereço do cliente no petshop, ou substitui o que já existe
// ---
// Versão aninhada: roda dentro da unidade de trabalho de quem chama.
// Se o e-mail já é de um cliente de outro petshop, reaproveita o usuário;
// `placeholder_password` só é usado quando o usuário é novo.
// ---
pub async fn create_client_in(
    uow: &mut UnitOfWork,
    tenant: Uuid,
    payload: ClientPayload,
    placeholder_password: String,
) -> Result<CreatedClient, AppError> {
    require_delivery_pricing(payload.address.as_ref())?;

    let ClientPayload { user, address, pets, client_info } = payload;

    let Some(existing) = uow.find_user_by_email(&user.email).await? else {
        let client = uow.insert_user(new_client_user(user, placeholder_password)).await?;
        return attach_to_tenant(uow, tenant, client, None, address, pets, client_info).await;
    };

    if !existing.is_client_family() {
        return Err(AppError::bad_request(
            MessageKey::EmailInUse,
            format!("Usuário {} não é cliente e não pode ser adicionado", existing.id),
        ));
    }

    let relations = uow
        .list_client_relations(RelationFilter::active().with_removed().member(existing.id).petshop(tenant))
        .await?;

    if relations.iter().any(|r| !r.is_removed) {
        return Err(AppError::conflict(
            MessageKey::ClientAlreadyAdded,
            format!("Usuário {} já foi adicionado pelo petshop {}", existing.id, tenant),
        ));
    }
    let removed_relation = relations.into_iter().next();

    let mut created = attach_to_tenant(uow, tenant, existing, removed_relation, address, pets, client_info).await?;
    created.already_exists = true;
    Ok(created)
}

/// Cliente de demonstração de um petshop recém-criado: sempre um usuário novo,
/// nunca reaproveita o de outro petshop.
pub async fn seed_client_in(
    uow: &mut UnitOfWork,
    tenant: Uuid,
    payload: ClientPayload,
    placeholder_password: String,
) -> Result<CreatedClient, AppError> {
    require_delivery_pricing(payload.address.as_ref())?;

    let ClientPayload { user, address, pets, client_info } = payload;

    if let Some(existing) = uow.find_user_by_email(&user.email).await? {
        return Err(AppError::bad_request(
            MessageKey::EmailInUse,
            format!("E-mail {} já pertence ao usuário {}", user.email, existing.id),
        ));
    }

    let client = uow.insert_user(new_client_user(user, placeholder_password)).await?;
    attach_to_tenant(uow, tenant, client, None, address, pets, client_info).await
}

fn new_client_user(user: ClientUserPayload, password: String) -> NewUser {
    NewUser {
        email: user.email,
        password,
        name: user.name,
        phone_number: Some(user.phone_number),
        additional_phone_number: empty_as_none(user.additional_phone_number),
        auth: Role::UnconfirmedClient,
        cnpj: None,
        cpf: None,
        terms_version: UNACCEPTED_POLICY_VERSION.to_string(),
        privacy_version: UNACCEPTED_POLICY_VERSION.to_string(),
    }
}

// Vínculo, endereço, info e pets do cliente no tenant.
async fn attach_to_tenant(
    uow: &mut UnitOfWork,
    tenant: Uuid,
    client: User,
    removed_relation: Option<ClientPetshopRelation>,
    address: Option<AddressPayload>,
    pets: Vec<PetPayload>,
    client_info: ClientInfoPayload,
) -> Result<CreatedClient, AppError> {
    // Vínculo removido volta a ficar ativo em vez de duplicar
    let relation = match removed_relation {
        Some(removed) => uow
            .set_client_relation_removed(removed.id, false)
            .await?
            .ok_or_else(|| anyhow::anyhow!("vínculo {} sumiu durante a transação", removed.id))?,
        None => uow.insert_client_relation(client.id, tenant).await?,
    };

    let client_address = match address {
        Some(address) => {
            let current = uow
                .list_addresses(client.id, AddressScope::Tenant(tenant))
                .await?
                .into_iter()
                .next();
            Some(upsert_address(uow, current, address, client.id, tenant).await?)
        }
        None => None,
    };

    let client_petshop_info = match uow.find_client_info(client.id, tenant).await? {
        Some(info) => uow
            .patch_client_info(info.id, client_info.into_patch())
            .await?
            .ok_or_else(|| anyhow::anyhow!("info {} sumiu durante a transação", info.id))?,
        None => uow.insert_client_info(client_info.into_new(client.id, tenant)).await?,
    };

    let mut created_pets = Vec::with_capacity(pets.len());
    for pet in pets {
        created_pets.push(uow.insert_pet(pet.into_new(client.id, tenant)).await?);
    }

    Ok(CreatedClient {
        user: client,
        client_petshop_relation: relation,
        client_petshop_info,
        client_address,
        pets: created_pets,
        already_exists: false,
    })
}

async fn upsert_address(
    uow: &mut UnitOfWork,
    current: Option<Address>,
    input: AddressPayload,
    client_id: Uuid,
    tenant: Uuid,
) -> Result<Address, AppError> {
    match current {
        Some(current) => uow
            .patch_address(current.id, input.into_patch())
            .await?
            .ok_or_else(|| anyhow::anyhow!("endereço {} sumiu durante a transação", current.id).into()),
        None => uow.insert_address(input.into_new(client_id, Some(tenant))).await,
    }
}

// Endereço de cliente sempre tem preço e tempo de entrega
fn require_delivery_pricing(address: Option<&AddressPayload>) -> Result<(), AppError> {
    let Some(address) = address else {
        return Ok(());
    };

    let mut errors = ValidationErrors::new();
    if address.delivery_value.is_none() {
        errors.add(
            "delivery_value",
            ValidationError::new("required").with_message("O valor de entrega é obrigatório.".into()),
        );
    }
    if address.delivery_time.is_none() {
        errors.add(
            "delivery_time",
            ValidationError::new("required").with_message("O tempo de entrega é obrigatório.".into()),
        );
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(delivery_value: Option<i32>, delivery_time: Option<i32>) -> AddressPayload {
        AddressPayload {
            id: None,
            cep: "01001000".into(),
            city: "São Paulo".into(),
            uf: "SP".into(),
            district: "Sé".into(),
            street: "Praça da Sé".into(),
            street_number: 1,
            complement: None,
            delivery_value,
            delivery_time,
        }
    }

    #[test]
    fn client_address_requires_delivery_pricing() {
        assert!(require_delivery_pricing(None).is_ok());
        assert!(require_delivery_pricing(Some(&address(Some(1500), Some(20)))).is_ok());

        let err = require_delivery_pricing(Some(&address(None, Some(20)))).unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("delivery_value"));
                assert!(!errors.field_errors().contains_key("delivery_time"));
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }
}
