// src/services/email_block_service.rs
// Flag de bloqueio de e-mail por usuário.

use crate::{
    common::{error::AppError, i18n::MessageKey},
    db::Store,
    models::{
        auth::Principal,
        user::{EmailBlockStatus, User, UserFilter, UserPatch},
    },
    services::policy::{Capability, require, require_any},
};

const MANAGERS: [Capability; 2] = [Capability::Service, Capability::Admin];

/// Na dúvida, bloqueado: e-mail ausente ou desconhecido conta como bloqueado.
pub async fn is_user_blocked(
    store: &dyn Store,
    principal: &Principal,
    email: Option<&str>,
) -> Result<EmailBlockStatus, AppError> {
    require(principal, Capability::Service, MessageKey::NotAuthorized)?;

    let blocked = match email.filter(|e| !e.is_empty()) {
        Some(email) => {
            let mut uow = store.begin().await?;
            uow.find_user_by_email(email)
                .await?
                .is_none_or(|u| u.is_blocked_from_receiving_email)
        }
        None => true,
    };

    Ok(EmailBlockStatus { is_user_blocked_from_receiving_email: blocked })
}

pub async fn list_blocked(store: &dyn Store, principal: &Principal) -> Result<Vec<User>, AppError> {
    require(principal, Capability::Admin, MessageKey::NotAuthorized)?;

    let mut uow = store.begin().await?;
    uow.list_users(&UserFilter { blocked_from_email: Some(true), ..Default::default() })
        .await
}

pub async fn block(store: &dyn Store, principal: &Principal, email: Option<&str>) -> Result<User, AppError> {
    set_blocked(store, principal, email, true).await
}

pub async fn release(store: &dyn Store, principal: &Principal, email: Option<&str>) -> Result<User, AppError> {
    set_blocked(store, principal, email, false).await
}

async fn set_blocked(
    store: &dyn Store,
    principal: &Principal,
    email: Option<&str>,
    blocked: bool,
) -> Result<User, AppError> {
    require_any(principal, &MANAGERS, MessageKey::NotAuthorized)?;

    let email = email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::bad_request(MessageKey::EmailRequired, "Parâmetro email é obrigatório"))?;

    let mut uow = store.begin().await?;
    let user_not_found = || AppError::not_found(MessageKey::UserNotFound, format!("Nenhum usuário com o e-mail {}", email));

    let user = uow.find_user_by_email(email).await?.ok_or_else(user_not_found)?;
    let patch = UserPatch { is_blocked_from_receiving_email: Some(blocked), ..Default::default() };
    let user = uow.patch_user(user.id, patch).await?.ok_or_else(user_not_found)?;
    uow.commit().await?;

    tracing::info!("Usuário {} com bloqueio de e-mail = {}", user.id, blocked);
    Ok(user)
}
