// src/common/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::i18n::{I18nStore, MessageKey};
use crate::middleware::i18n::Locale;

// Erro interno da aplicação. Os serviços só conhecem este tipo;
// a tradução para HTTP acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Token de autenticação inválido ou ausente")]
    Unauthorized,

    #[error("Token de autenticação expirado")]
    TokenExpired,

    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Payload inválido: {0}")]
    InvalidPayload(String),

    #[error("{message}")]
    BadRequest { message: String, key: MessageKey },

    #[error("{message}")]
    Forbidden { message: String, key: MessageKey },

    #[error("{message}")]
    NotFound { message: String, key: MessageKey },

    // Regra de unicidade verificada pela aplicação (ex: cliente já adicionado).
    // Responde 400, como o restante dos erros de regra de negócio.
    #[error("{message}")]
    Conflict { message: String, key: MessageKey },

    // Violação de UNIQUE vinda do banco (nome da constraint)
    #[error("Violação de unicidade: {0}")]
    UniqueViolation(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl AppError {
    pub fn bad_request(key: MessageKey, message: impl Into<String>) -> Self {
        AppError::BadRequest { message: message.into(), key }
    }

    pub fn forbidden(key: MessageKey, message: impl Into<String>) -> Self {
        AppError::Forbidden { message: message.into(), key }
    }

    pub fn not_found(key: MessageKey, message: impl Into<String>) -> Self {
        AppError::NotFound { message: message.into(), key }
    }

    pub fn conflict(key: MessageKey, message: impl Into<String>) -> Self {
        AppError::Conflict { message: message.into(), key }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_)
            | AppError::InvalidPayload(_)
            | AppError::BadRequest { .. }
            | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::UniqueViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Monta a resposta HTTP localizada.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
            return ApiError {
                status,
                body: ErrorBody {
                    message: "Internal server error".to_string(),
                    error_type: "UnexpectedError",
                    code: None,
                    data: None,
                    display_message: Some(
                        i18n.translate(locale, MessageKey::UnexpectedError).to_string(),
                    ),
                    detail: i18n.expose_internal_errors().then(|| self.to_string()),
                },
            };
        }

        let (error_type, message, key, data) = match self {
            AppError::Unauthorized => (
                "Unauthorized",
                self.to_string(),
                MessageKey::Unauthorized,
                None,
            ),
            AppError::TokenExpired => (
                "TokenExpired",
                self.to_string(),
                MessageKey::TokenExpired,
                None,
            ),
            AppError::ValidationError(errors) => {
                let (field, message) = first_field_error(errors)
                    .unwrap_or_else(|| (String::new(), self.to_string()));
                ("ValidationError", message, MessageKey::InvalidData, Some(Value::String(field)))
            }
            AppError::InvalidPayload(_) => (
                "ValidationError",
                self.to_string(),
                MessageKey::InvalidData,
                None,
            ),
            AppError::BadRequest { message, key } => ("BadRequest", message.clone(), *key, None),
            AppError::Forbidden { message, key } => ("Forbidden", message.clone(), *key, None),
            AppError::NotFound { message, key } => ("NotFound", message.clone(), *key, None),
            AppError::Conflict { message, key } => ("Conflict", message.clone(), *key, None),
            AppError::UniqueViolation(constraint) => (
                "UniqueViolation",
                self.to_string(),
                unique_violation_key(constraint),
                Some(json!({ "constraint": constraint })),
            ),
            // 5xx já tratados acima
            _ => ("UnexpectedError", self.to_string(), MessageKey::UnexpectedError, None),
        };

        ApiError {
            status,
            body: ErrorBody {
                message,
                error_type,
                code: None,
                data,
                display_message: Some(i18n.translate(locale, key).to_string()),
                detail: None,
            },
        }
    }
}

fn unique_violation_key(constraint: &str) -> MessageKey {
    match constraint {
        "users_email_key" => MessageKey::EmailInUse,
        "petshop_configurations_petshop_id_key" => MessageKey::ConfigurationAlreadyExists,
        "petshop_responsible_persons_petshop_id_key" => MessageKey::ResponsiblePersonAlreadyExists,
        "client_petshop_relations_client_petshop_key" | "client_petshop_infos_client_petshop_key" => {
            MessageKey::ClientAlreadyAdded
        }
        _ => MessageKey::AlreadyRegistered,
    }
}

// Rejeições do extrator `Json` do axum (corpo malformado, tipo errado, campo faltando)
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidPayload(rejection.body_text())
    }
}

/// Corpo de erro devolvido ao cliente.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ---
// Caminho do primeiro campo inválido ("pets[0].name") + mensagem.
// As chaves são ordenadas para que a resposta seja determinística.
// ---
pub fn first_field_error(errors: &ValidationErrors) -> Option<(String, String)> {
    let mut keys: Vec<_> = errors.errors().keys().collect();
    keys.sort();
    let field = keys.into_iter().next()?;
    let name = camel_case(field);

    match errors.errors().get(field)? {
        ValidationErrorsKind::Field(list) => {
            let message = list
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("O campo '{}' é inválido.", name));
            Some((name, message))
        }
        ValidationErrorsKind::Struct(inner) => {
            let (child, message) = first_field_error(inner)?;
            Some((format!("{}.{}", name, child), message))
        }
        ValidationErrorsKind::List(items) => {
            let (index, inner) = items.iter().next()?;
            let (child, message) = first_field_error(inner)?;
            Some((format!("{}[{}].{}", name, index, child), message))
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Pet {
        #[validate(length(min = 1, message = "O nome do pet é obrigatório."))]
        name: String,
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(nested)]
        pets: Vec<Pet>,
    }

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn validation_errors_name_the_nested_field() {
        let payload = Payload {
            pets: vec![Pet { name: "Rex".into() }, Pet { name: String::new() }],
        };
        let errors = payload.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&pt(), &I18nStore::new(false));

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body.error_type, "ValidationError");
        assert_eq!(api.body.data, Some(Value::String("pets[1].name".into())));
        assert_eq!(api.body.message, "O nome do pet é obrigatório.");
    }

    #[test]
    fn snake_case_fields_are_reported_in_camel_case() {
        assert_eq!(camel_case("phone_number"), "phoneNumber");
        assert_eq!(camel_case("can_schedule_through_app"), "canScheduleThroughApp");
    }

    #[test]
    fn server_errors_hide_details_in_production() {
        let err = AppError::InternalServerError(anyhow::anyhow!("conexão perdida"));

        let prod = err.to_api_error(&pt(), &I18nStore::new(false));
        assert_eq!(prod.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(prod.body.message, "Internal server error");
        assert!(prod.body.detail.is_none());

        let dev = err.to_api_error(&pt(), &I18nStore::new(true));
        assert!(dev.body.detail.unwrap().contains("conexão perdida"));
    }

    #[test]
    fn business_errors_keep_internal_and_display_messages_apart() {
        let err = AppError::forbidden(MessageKey::NotAPetshop, "User is not of type petshop");
        let api = err.to_api_error(&pt(), &I18nStore::new(false));

        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.body.message, "User is not of type petshop");
        assert_eq!(
            api.body.display_message.as_deref(),
            Some("Não autorizado. Usuário não é Petshop.")
        );
    }

    #[test]
    fn conflicts_are_bad_requests_and_unique_violations_are_409() {
        let conflict = AppError::conflict(MessageKey::ClientAlreadyAdded, "already added");
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

        let unique = AppError::UniqueViolation("users_email_key".into());
        let api = unique.to_api_error(&pt(), &I18nStore::new(false));
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.body.data, Some(json!({ "constraint": "users_email_key" })));
    }

    #[test]
    fn duplicate_client_rows_read_as_client_already_added() {
        let i18n = I18nStore::new(false);
        let expected = i18n.translate(&pt(), MessageKey::ClientAlreadyAdded);
        for constraint in ["client_petshop_relations_client_petshop_key", "client_petshop_infos_client_petshop_key"] {
            let api = AppError::UniqueViolation(constraint.into()).to_api_error(&pt(), &i18n);
            assert_eq!(api.status, StatusCode::CONFLICT);
            assert_eq!(api.body.display_message.as_deref(), Some(expected));
        }
    }
}
