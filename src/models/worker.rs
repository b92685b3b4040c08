// src/models/worker.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::user::{User, UserPatch};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerPayload {
    #[serde(default)]
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 60, message = "O telefone é obrigatório (máx. 60 caracteres)."))]
    pub phone_number: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkerPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub phone_number: Option<String>,
}

impl From<UpdateWorkerPayload> for UserPatch {
    fn from(payload: UpdateWorkerPayload) -> Self {
        UserPatch {
            email: payload.email,
            name: payload.name,
            phone_number: payload.phone_number.map(Some),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkerResponse {
    pub user: User,
}
