// src/models/relation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::serde_utils::double_option;
use crate::models::address::empty_as_none;

// Vínculo cliente <-> petshop. Nunca é apagado, só marcado como removido.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPetshopRelation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub petshop_id: Uuid,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Vínculo colaborador <-> petshop
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPetshopRelation {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub petshop_id: Uuid,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filtro comum às duas tabelas de vínculo.
/// `member_id` é o cliente ou o colaborador, conforme a tabela.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationFilter {
    pub member_id: Option<Uuid>,
    pub petshop_id: Option<Uuid>,
    pub include_removed: bool,
}

impl RelationFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn member(mut self, id: Uuid) -> Self {
        self.member_id = Some(id);
        self
    }

    pub fn petshop(mut self, id: Uuid) -> Self {
        self.petshop_id = Some(id);
        self
    }

    pub fn with_removed(mut self) -> Self {
        self.include_removed = true;
        self
    }

    pub fn matches(&self, member_id: Uuid, petshop_id: Uuid, is_removed: bool) -> bool {
        self.member_id.is_none_or(|id| id == member_id)
            && self.petshop_id.is_none_or(|id| id == petshop_id)
            && (self.include_removed || !is_removed)
    }
}

// Dados do cliente que só o petshop enxerga
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPetshopInfo {
    pub id: Uuid,
    pub client_id: Uuid,
    pub petshop_id: Uuid,
    pub notes: Option<String>,
    pub can_schedule_through_app: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// O que o cliente pode ver das próprias informações no petshop.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfoSummary {
    pub petshop_id: Uuid,
    pub can_schedule_through_app: bool,
}

#[derive(Debug, Clone, Validate)]
pub struct NewClientInfo {
    pub client_id: Uuid,
    pub petshop_id: Uuid,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
    pub can_schedule_through_app: bool,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ClientInfoPatch {
    #[validate(length(max = 1024))]
    pub notes: Option<Option<String>>,
    pub can_schedule_through_app: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfoPayload {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 1024, message = "As observações podem ter no máximo 1024 caracteres."))]
    pub notes: Option<Option<String>>,
    pub can_schedule_through_app: Option<bool>,
}

impl ClientInfoPayload {
    pub fn into_new(self, client_id: Uuid, petshop_id: Uuid) -> NewClientInfo {
        NewClientInfo {
            client_id,
            petshop_id,
            notes: self.notes.and_then(empty_as_none),
            can_schedule_through_app: self.can_schedule_through_app.unwrap_or(false),
        }
    }

    pub fn into_patch(self) -> ClientInfoPatch {
        ClientInfoPatch {
            notes: self.notes.map(empty_as_none),
            can_schedule_through_app: self.can_schedule_through_app,
        }
    }
}
