// src/models/petshop.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    address::{Address, AddressPayload, AddressUpdatePayload},
    client::CreatedClient,
    user::{PetshopSummary, User},
};

// ---
// Configurações do petshop (uma por petshop)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetshopConfiguration {
    pub id: Uuid,
    pub petshop_id: Uuid,
    pub payment_through_app: bool,
    pub payment_outside_app: bool,
    /// Em centavos
    pub cancellation_fee: i32,
    pub schedule_through_app_cancel_if_not_payed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subconjunto visível para o cliente.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigurationView {
    pub payment_through_app: bool,
    pub payment_outside_app: bool,
    pub cancellation_fee: i32,
}

impl From<PetshopConfiguration> for ClientConfigurationView {
    fn from(config: PetshopConfiguration) -> Self {
        Self {
            payment_through_app: config.payment_through_app,
            payment_outside_app: config.payment_outside_app,
            cancellation_fee: config.cancellation_fee,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewConfiguration {
    pub petshop_id: Uuid,
    pub payment_through_app: bool,
    pub payment_outside_app: bool,
    #[validate(range(min = 0))]
    pub cancellation_fee: i32,
    pub schedule_through_app_cancel_if_not_payed: bool,
}

impl NewConfiguration {
    /// Valores padrão criados junto com o petshop.
    pub fn defaults(petshop_id: Uuid) -> Self {
        Self {
            petshop_id,
            payment_through_app: false,
            payment_outside_app: true,
            cancellation_fee: 0,
            schedule_through_app_cancel_if_not_payed: false,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ConfigurationPatch {
    pub payment_through_app: Option<bool>,
    pub payment_outside_app: Option<bool>,
    #[validate(range(min = 0))]
    pub cancellation_fee: Option<i32>,
    pub schedule_through_app_cancel_if_not_payed: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationPayload {
    pub petshop_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigurationPayload {
    pub payment_through_app: bool,
    pub payment_outside_app: bool,
    #[validate(range(min = 0, message = "A taxa de cancelamento não pode ser negativa."))]
    pub cancellation_fee: i32,
    pub schedule_through_app_cancel_if_not_payed: Option<bool>,
}

impl From<UpdateConfigurationPayload> for ConfigurationPatch {
    fn from(payload: UpdateConfigurationPayload) -> Self {
        Self {
            payment_through_app: Some(payload.payment_through_app),
            payment_outside_app: Some(payload.payment_outside_app),
            cancellation_fee: Some(payload.cancellation_fee),
            schedule_through_app_cancel_if_not_payed: payload.schedule_through_app_cancel_if_not_payed,
        }
    }
}

// ---
// Pessoa responsável pelo petshop (uma por petshop)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiblePerson {
    pub id: Uuid,
    pub petshop_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub cpf: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiblePersonWithPetshop {
    #[serde(flatten)]
    pub responsible_person: ResponsiblePerson,
    pub petshop: PetshopSummary,
}

#[derive(Debug, Clone, Validate)]
pub struct NewResponsiblePerson {
    pub petshop_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub phone_number: String,
    #[validate(length(max = 60))]
    pub cpf: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ResponsiblePersonPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub phone_number: Option<String>,
    #[validate(length(max = 60))]
    pub cpf: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiblePersonPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O telefone é obrigatório (máx. 60 caracteres)."))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O CPF é obrigatório (máx. 60 caracteres)."))]
    pub cpf: String,
}

impl ResponsiblePersonPayload {
    pub fn into_new(self, petshop_id: Uuid) -> NewResponsiblePerson {
        NewResponsiblePerson {
            petshop_id,
            name: self.name,
            phone_number: self.phone_number,
            cpf: Some(self.cpf),
        }
    }

    pub fn into_patch(self) -> ResponsiblePersonPatch {
        ResponsiblePersonPatch {
            name: Some(self.name),
            phone_number: Some(self.phone_number),
            cpf: Some(Some(self.cpf)),
        }
    }
}

// ---
// Cadastro / atualização do petshop
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetshopUserPayload {
    #[serde(default)]
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O telefone é obrigatório (máx. 60 caracteres)."))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O CNPJ é obrigatório (máx. 60 caracteres)."))]
    pub cnpj: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetshopPayload {
    #[validate(nested)]
    pub user: PetshopUserPayload,
    #[validate(nested)]
    pub address: AddressPayload,
}

// E-mail e CNPJ são aceitos no JSON mas descartados: só o suporte altera.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetshopUserUpdatePayload {
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub phone_number: Option<String>,
    pub cnpj: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetshopPayload {
    #[serde(default)]
    #[validate(nested)]
    pub user: PetshopUserUpdatePayload,
    #[serde(default)]
    #[validate(nested)]
    pub address: AddressUpdatePayload,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPetshop {
    pub user: User,
    pub address: Address,
    pub petshop_configuration: PetshopConfiguration,
    pub client_list: Vec<CreatedClient>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedPetshop {
    pub user: User,
    pub address: Address,
}
