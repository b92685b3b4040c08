// src/models/pet.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::address::empty_as_none;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "body_size", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BodySize {
    Small,
    Medium,
    Large,
    Special,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "fur_size", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FurSize {
    Short,
    Long,
}

// Pet de um cliente, sempre atrelado ao petshop que o cadastrou
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub client_id: Uuid,
    pub petshop_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub body_size: BodySize,
    pub fur_size: FurSize,
    pub notes: Option<String>,
    /// Minutos extras no atendimento
    pub extra_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pet visto pelo próprio cliente (sem as observações do petshop).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetSummary {
    pub id: Uuid,
    pub client_id: Uuid,
    pub petshop_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub body_size: BodySize,
    pub fur_size: FurSize,
    pub extra_time: i32,
}

impl From<&Pet> for PetSummary {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            client_id: pet.client_id,
            petshop_id: pet.petshop_id,
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            body_size: pet.body_size,
            fur_size: pet.fur_size,
            extra_time: pet.extra_time,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewPet {
    pub client_id: Uuid,
    pub petshop_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub breed: Option<String>,
    pub body_size: BodySize,
    pub fur_size: FurSize,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub extra_time: i32,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct PetPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub breed: Option<Option<String>>,
    pub body_size: Option<BodySize>,
    pub fur_size: Option<FurSize>,
    #[validate(length(max = 1024))]
    pub notes: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub extra_time: Option<i32>,
}

// ---
// Payload de pet (criação e atualização de cliente).
// Com `id` -> atualiza o pet existente; sem `id` -> cria um novo.
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome do pet é obrigatório."))]
    pub name: String,
    #[validate(length(max = 255))]
    pub breed: Option<String>,
    pub body_size: BodySize,
    pub fur_size: FurSize,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub extra_time: Option<i32>,
}

impl PetPayload {
    pub fn into_new(self, client_id: Uuid, petshop_id: Uuid) -> NewPet {
        NewPet {
            client_id,
            petshop_id,
            name: self.name,
            breed: empty_as_none(self.breed),
            body_size: self.body_size,
            fur_size: self.fur_size,
            notes: empty_as_none(self.notes),
            extra_time: self.extra_time.unwrap_or(0),
        }
    }

    pub fn into_patch(self) -> PetPatch {
        PetPatch {
            name: Some(self.name),
            breed: Some(empty_as_none(self.breed)),
            body_size: Some(self.body_size),
            fur_size: Some(self.fur_size),
            notes: Some(empty_as_none(self.notes)),
            extra_time: self.extra_time,
        }
    }
}
