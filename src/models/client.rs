// src/models/client.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::serde_utils::double_option;
use crate::models::{
    address::{Address, AddressPayload, empty_as_none},
    pet::{Pet, PetPayload, PetSummary},
    relation::{ClientInfoPayload, ClientInfoSummary, ClientPetshopInfo, ClientPetshopRelation},
    user::{PetshopSummary, User, UserGraph, UserPatch},
};

/// `?petshopId=` usado por colaboradores para dizer em qual petshop estão atuando.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PetshopQuery {
    pub petshop_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientUserPayload {
    #[serde(default)]
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O telefone é obrigatório (máx. 60 caracteres)."))]
    pub phone_number: String,
    #[validate(length(max = 60))]
    pub additional_phone_number: Option<String>,
}

impl ClientUserPayload {
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            email: Some(self.email),
            name: Some(self.name),
            phone_number: Some(Some(self.phone_number)),
            additional_phone_number: Some(empty_as_none(self.additional_phone_number)),
            ..Default::default()
        }
    }
}

// Usado tanto no cadastro quanto na atualização de um cliente pelo petshop
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(nested)]
    pub user: ClientUserPayload,
    #[validate(nested)]
    pub address: Option<AddressPayload>,
    #[serde(default)]
    #[validate(nested)]
    pub pets: Vec<PetPayload>,
    #[serde(default)]
    #[validate(nested)]
    pub client_info: ClientInfoPayload,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClient {
    pub user: User,
    pub client_petshop_relation: ClientPetshopRelation,
    pub client_petshop_info: ClientPetshopInfo,
    pub client_address: Option<Address>,
    pub pets: Vec<Pet>,
    /// O e-mail já pertencia a um cliente de outro petshop
    pub already_exists: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedClient {
    pub user: User,
    pub client_address: Option<Address>,
    pub pets: Vec<Pet>,
    pub client_petshop_info: ClientPetshopInfo,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSelfUpdatePayload {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 60))]
    pub additional_phone_number: Option<Option<String>>,
    #[validate(length(min = 1, max = 60))]
    pub cpf: Option<String>,
}

impl From<ClientSelfUpdatePayload> for UserPatch {
    fn from(payload: ClientSelfUpdatePayload) -> Self {
        UserPatch {
            name: payload.name,
            phone_number: payload.phone_number.map(Some),
            additional_phone_number: payload.additional_phone_number.map(empty_as_none),
            cpf: payload.cpf.map(Some),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClientCpfPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O CPF é obrigatório (máx. 60 caracteres)."))]
    pub cpf: String,
}

// ---
// Visão do próprio cliente: um bloco por petshop em que está cadastrado
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPetshopView {
    pub pets: Vec<PetSummary>,
    pub client_address: Option<Address>,
    pub client_petshop_info: Option<ClientInfoSummary>,
    pub petshop_info: Option<PetshopSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSelfView {
    #[serde(flatten)]
    pub user: User,
    pub petshops: Vec<ClientPetshopView>,
}

// ---
// Conferência feita pelo serviço de agenda antes de marcar um horário
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledClientCheckPayload {
    pub client_id: Uuid,
    pub pet_id: Uuid,
    pub petshop_id: Uuid,
    #[serde(default)]
    pub pay_through_app: bool,
    #[validate(range(min = 0))]
    pub delivery_value: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledClientData {
    #[serde(flatten)]
    pub client: UserGraph,
    pub cancellation_fee: i32,
    pub schedule_through_app_cancel_if_not_payed: bool,
}
