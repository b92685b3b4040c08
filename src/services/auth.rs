// src/services/auth.rs

use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};

use crate::{
    common::error::AppError,
    models::auth::{Claims, Principal, Role},
};

// Só valida tokens: quem emite é o serviço de autenticação
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => {
                tracing::debug!("Token rejeitado: {}", e);
                AppError::Unauthorized
            }
        })?;

        let claims = token_data.claims;

        // Código de papel desconhecido é rejeitado aqui, na borda
        let role = match claims.auth {
            Some(code) => Some(Role::try_from(code).map_err(|e| {
                tracing::warn!("Token com papel inválido: {}", e);
                AppError::Unauthorized
            })?),
            None => None,
        };

        if !claims.is_micro && role.is_none() {
            return Err(AppError::Unauthorized);
        }

        Ok(Principal {
            id: claims.sub,
            role,
            is_service: claims.is_micro,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;
    use uuid::Uuid;

    const SECRET: &str = "segredo-de-teste";

    fn token(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn in_one_hour() -> i64 {
        (Utc::now() + Duration::hours(1)).timestamp()
    }

    #[test]
    fn decodes_a_petshop_principal() {
        let id = Uuid::new_v4();
        let service = AuthService::new(SECRET.to_string());
        let principal = service
            .validate_token(&token(json!({ "sub": id, "auth": 50, "exp": in_one_hour() })))
            .unwrap();

        assert_eq!(principal, Principal::user(id, Role::Petshop));
    }

    #[test]
    fn service_tokens_may_omit_the_role() {
        let id = Uuid::new_v4();
        let service = AuthService::new(SECRET.to_string());
        let principal = service
            .validate_token(&token(json!({ "sub": id, "isMicro": true, "exp": in_one_hour() })))
            .unwrap();

        assert!(principal.is_service);
        assert_eq!(principal.role, None);
    }

    #[test]
    fn unknown_role_codes_are_unauthorized() {
        let service = AuthService::new(SECRET.to_string());
        let err = service
            .validate_token(&token(json!({ "sub": Uuid::new_v4(), "auth": 30, "exp": in_one_hour() })))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_tokens_are_reported_as_such() {
        let service = AuthService::new(SECRET.to_string());
        let expired = (Utc::now() - Duration::hours(2)).timestamp();
        let err = service
            .validate_token(&token(json!({ "sub": Uuid::new_v4(), "auth": 10, "exp": expired })))
            .unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let service = AuthService::new("outro-segredo".to_string());
        let err = service
            .validate_token(&token(json!({ "sub": Uuid::new_v4(), "auth": 10, "exp": in_one_hour() })))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
