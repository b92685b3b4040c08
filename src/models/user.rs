// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    address::{Address, AddressSummary},
    auth::Role,
    petshop::{PetshopConfiguration, ResponsiblePerson},
    pet::Pet,
    relation::{ClientPetshopInfo, ClientPetshopRelation},
};

// Usuário vindo do banco. Clientes, colaboradores, petshops e admins
// dividem a mesma tabela, separados pela coluna `auth`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // nunca sai na resposta
    #[schema(ignore)]
    pub password: String,

    pub name: String,
    pub phone_number: Option<String>,
    pub additional_phone_number: Option<String>,
    pub auth: i32,
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
    pub terms_version: String,
    pub privacy_version: String,
    pub is_blocked_from_receiving_email: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `None` quando o código gravado não é um papel conhecido.
    pub fn role(&self) -> Option<Role> {
        Role::try_from(self.auth).ok()
    }

    pub fn is_client_family(&self) -> bool {
        self.role().is_some_and(Role::is_client_family)
    }

    pub fn is_worker_family(&self) -> bool {
        self.role().is_some_and(Role::is_worker_family)
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 255))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "O nome deve ter entre 1 e 255 caracteres."))]
    pub name: String,
    #[validate(length(max = 60))]
    pub phone_number: Option<String>,
    #[validate(length(max = 60))]
    pub additional_phone_number: Option<String>,
    pub auth: Role,
    #[validate(length(max = 60))]
    pub cnpj: Option<String>,
    #[validate(length(max = 60))]
    pub cpf: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub terms_version: String,
    #[validate(length(min = 1, max = 60))]
    pub privacy_version: String,
}

// Patch parcial: `None` = não mexe. Nos campos anuláveis,
// `Some(None)` grava NULL.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserPatch {
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 255))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(min = 1, max = 255, message = "O nome deve ter entre 1 e 255 caracteres."))]
    pub name: Option<String>,
    #[validate(length(max = 60))]
    pub phone_number: Option<Option<String>>,
    #[validate(length(max = 60))]
    pub additional_phone_number: Option<Option<String>>,
    #[validate(length(max = 60))]
    pub cnpj: Option<Option<String>>,
    #[validate(length(max = 60))]
    pub cpf: Option<Option<String>>,
    #[validate(length(max = 60))]
    pub terms_version: Option<String>,
    #[validate(length(max = 60))]
    pub privacy_version: Option<String>,
    pub is_blocked_from_receiving_email: Option<bool>,
}

/// Filtro para listagem de usuários.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub ids: Option<Vec<Uuid>>,
    pub roles: Option<Vec<Role>>,
    pub blocked_from_email: Option<bool>,
}

// ---
// Resumo de um petshop visto por terceiros (cliente, colaborador, lista pública)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetshopSummary {
    pub id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressSummary>,
}

impl PetshopSummary {
    pub fn from_user(user: &User, address: Option<&Address>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone_number: user.phone_number.clone(),
            address: address.map(AddressSummary::from),
        }
    }
}

/// Apenas id + nome (listas concisas para colaboradores).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ConciseUser {
    pub id: Uuid,
    pub name: String,
}

// ---
// Usuário + relações carregadas via `Include`.
// Relação não pedida não aparece no JSON.
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserGraph {
    #[serde(flatten)]
    pub user: User,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<Pet>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_petshop_relation: Option<Vec<ClientPetshopRelation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_petshop_info: Option<Vec<ClientPetshopInfo>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_petshops: Option<Vec<PetshopSummary>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PetshopConfiguration>, nullable)]
    pub petshop_configuration: Option<Option<PetshopConfiguration>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<ResponsiblePerson>, nullable)]
    pub responsible_person: Option<Option<ResponsiblePerson>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<User>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub petshops: Option<Vec<PetshopSummary>>,
}

impl UserGraph {
    pub fn bare(user: User) -> Self {
        Self {
            user,
            address: None,
            pets: None,
            client_petshop_relation: None,
            client_petshop_info: None,
            client_petshops: None,
            petshop_configuration: None,
            responsible_person: None,
            workers: None,
            petshops: None,
        }
    }
}

// ---
// Bloqueio de e-mail
// ---
#[derive(Debug, Deserialize, IntoParams)]
pub struct EmailQuery {
    /// E-mail do usuário
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailBlockStatus {
    pub is_user_blocked_from_receiving_email: bool,
}
