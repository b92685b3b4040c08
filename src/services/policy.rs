// src/services/policy.rs

use crate::{
    common::{error::AppError, i18n::MessageKey},
    models::auth::{Principal, Role},
};

/// O que um endpoint exige de quem chama.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Client,
    UnconfirmedClient,
    /// Cliente confirmado ou não
    ClientFamily,
    Worker,
    UnconfirmedWorker,
    /// Colaborador confirmado ou não
    WorkerFamily,
    Petshop,
    Admin,
    /// Chamada entre serviços ("micro")
    Service,
}

// Sem principal, nenhuma capacidade é concedida.
// O flag de serviço é independente do papel.
pub fn has_role(principal: Option<&Principal>, capability: Capability) -> bool {
    let Some(principal) = principal else {
        return false;
    };

    if capability == Capability::Service {
        return principal.is_service;
    }

    let Some(role) = principal.role else {
        return false;
    };

    match capability {
        Capability::Client => role == Role::Client,
        Capability::UnconfirmedClient => role == Role::UnconfirmedClient,
        Capability::ClientFamily => role.is_client_family(),
        Capability::Worker => role == Role::Worker,
        Capability::UnconfirmedWorker => role == Role::UnconfirmedWorker,
        Capability::WorkerFamily => role.is_worker_family(),
        Capability::Petshop => role == Role::Petshop,
        Capability::Admin => role == Role::Admin,
        Capability::Service => principal.is_service,
    }
}

/// `has_role` que falha com `Forbidden` e a mensagem localizada de `key`.
pub fn require(principal: &Principal, capability: Capability, key: MessageKey) -> Result<(), AppError> {
    if has_role(Some(principal), capability) {
        return Ok(());
    }
    Err(AppError::forbidden(
        key,
        format!("Usuário {} não tem a permissão {:?}", principal.id, capability),
    ))
}

/// Vale se o principal tiver qualquer uma das capacidades.
pub fn require_any(principal: &Principal, capabilities: &[Capability], key: MessageKey) -> Result<(), AppError> {
    if capabilities.iter().any(|c| has_role(Some(principal), *c)) {
        return Ok(());
    }
    Err(AppError::forbidden(
        key,
        format!("Usuário {} não tem nenhuma das permissões {:?}", principal.id, capabilities),
    ))
}
