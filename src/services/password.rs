// src/services/password.rs

use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric};

use crate::common::error::AppError;

const GENERATED_PASSWORD_LENGTH: usize = 32;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError>;
}

#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        // bcrypt é CPU-bound: roda fora do executor
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(&plaintext, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        Ok(hashed)
    }
}

/// Senha provisória para contas criadas por outra pessoa (cliente, colaborador).
pub fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_long_and_alphanumeric() {
        let password = random_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(password, random_password());
    }

    #[tokio::test]
    async fn bcrypt_hash_verifies() {
        let hasher = BcryptHasher::new(4);
        let hashed = hasher.hash("segredo123").await.unwrap();
        assert_ne!(hashed, "segredo123");
        assert!(bcrypt::verify("segredo123", &hashed).unwrap());
    }
}
