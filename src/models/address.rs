// src/models/address.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::serde_utils::double_option;

// Endereço. `petshop_id` nulo = endereço do próprio usuário (ex: o petshop);
// preenchido = endereço do cliente visto por aquele petshop.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub petshop_id: Option<Uuid>,
    pub cep: String,
    pub city: String,
    pub uf: String,
    pub district: String,
    pub street: String,
    pub street_number: i32,
    pub complement: Option<String>,
    /// Em centavos
    pub delivery_value: Option<i32>,
    /// Em minutos
    pub delivery_time: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Versão pública do endereço (sem ids nem preço de entrega).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressSummary {
    pub cep: String,
    pub city: String,
    pub uf: String,
    pub district: String,
    pub street: String,
    pub street_number: i32,
    pub complement: Option<String>,
}

impl From<&Address> for AddressSummary {
    fn from(address: &Address) -> Self {
        Self {
            cep: address.cep.clone(),
            city: address.city.clone(),
            uf: address.uf.clone(),
            district: address.district.clone(),
            street: address.street.clone(),
            street_number: address.street_number,
            complement: address.complement.clone(),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewAddress {
    pub user_id: Uuid,
    pub petshop_id: Option<Uuid>,
    #[validate(length(min = 1, max = 10))]
    pub cep: String,
    #[validate(length(min = 1, max = 60))]
    pub city: String,
    #[validate(length(min = 1, max = 10))]
    pub uf: String,
    #[validate(length(min = 1, max = 60))]
    pub district: String,
    #[validate(length(min = 1, max = 60))]
    pub street: String,
    pub street_number: i32,
    #[validate(length(max = 60))]
    pub complement: Option<String>,
    #[validate(range(min = 0))]
    pub delivery_value: Option<i32>,
    #[validate(range(min = 0))]
    pub delivery_time: Option<i32>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct AddressPatch {
    #[validate(length(min = 1, max = 10))]
    pub cep: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub uf: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub district: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub street: Option<String>,
    pub street_number: Option<i32>,
    #[validate(length(max = 60))]
    pub complement: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub delivery_value: Option<Option<i32>>,
    #[validate(range(min = 0))]
    pub delivery_time: Option<Option<i32>>,
}

/// Quais endereços de um usuário listar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    /// Endereço próprio (`petshop_id IS NULL`)
    Own,
    /// Endereço visto por um petshop
    Tenant(Uuid),
    Any,
}

impl AddressScope {
    pub fn matches(&self, address: &Address) -> bool {
        match self {
            AddressScope::Own => address.petshop_id.is_none(),
            AddressScope::Tenant(petshop_id) => address.petshop_id == Some(*petshop_id),
            AddressScope::Any => true,
        }
    }
}

// ---
// Payloads
// ---

// Endereço completo enviado pelo app. No update de cliente o `id`
// precisa bater com o endereço já cadastrado.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, max = 10, message = "O CEP é obrigatório (máx. 10 caracteres)."))]
    pub cep: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "A cidade é obrigatória (máx. 60 caracteres)."))]
    pub city: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 10, message = "A UF é obrigatória (máx. 10 caracteres)."))]
    pub uf: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O bairro é obrigatório (máx. 60 caracteres)."))]
    pub district: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "A rua é obrigatória (máx. 60 caracteres)."))]
    pub street: String,
    pub street_number: i32,
    #[validate(length(max = 60))]
    pub complement: Option<String>,
    #[validate(range(min = 0))]
    pub delivery_value: Option<i32>,
    #[validate(range(min = 0))]
    pub delivery_time: Option<i32>,
}

impl AddressPayload {
    pub fn into_new(self, user_id: Uuid, petshop_id: Option<Uuid>) -> NewAddress {
        NewAddress {
            user_id,
            petshop_id,
            cep: self.cep,
            city: self.city,
            uf: self.uf,
            district: self.district,
            street: self.street,
            street_number: self.street_number,
            complement: empty_as_none(self.complement),
            delivery_value: self.delivery_value,
            delivery_time: self.delivery_time,
        }
    }

    /// Substitui todos os campos editáveis (o id nunca é alterado).
    pub fn into_patch(self) -> AddressPatch {
        AddressPatch {
            cep: Some(self.cep),
            city: Some(self.city),
            uf: Some(self.uf),
            district: Some(self.district),
            street: Some(self.street),
            street_number: Some(self.street_number),
            complement: Some(empty_as_none(self.complement)),
            delivery_value: Some(self.delivery_value),
            delivery_time: Some(self.delivery_time),
        }
    }
}

// Atualização parcial do endereço do petshop
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdatePayload {
    #[validate(length(min = 1, max = 10))]
    pub cep: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub uf: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub district: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub street: Option<String>,
    pub street_number: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 60))]
    pub complement: Option<Option<String>>,
}

impl From<AddressUpdatePayload> for AddressPatch {
    fn from(payload: AddressUpdatePayload) -> Self {
        AddressPatch {
            cep: payload.cep,
            city: payload.city,
            uf: payload.uf,
            district: payload.district,
            street: payload.street,
            street_number: payload.street_number,
            complement: payload.complement.map(empty_as_none),
            ..Default::default()
        }
    }
}

// O app manda "" para "sem complemento"
pub(crate) fn empty_as_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
