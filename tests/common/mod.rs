// Peças compartilhadas pelos testes de integração
#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

use petshop_backend::{
    common::{error::AppError, i18n::I18nStore},
    config::AppState,
    db::{MemoryStore, Store},
    models::{
        auth::{Principal, Role},
        client::ClientPayload,
        petshop::NewConfiguration,
        user::{NewUser, User},
    },
    services::{
        auth::AuthService,
        notification::{CreatedUserEmail, Notifier},
        password::PasswordHasher,
        petshop_service::PolicyVersions,
    },
};

pub const JWT_SECRET: &str = "segredo-dos-testes";

// bcrypt de verdade deixaria os testes lentos
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        Ok(format!("hash:{}", plaintext))
    }
}

// Falha se alguém pedir hash com uma unidade de trabalho aberta
pub struct LockCheckingHasher {
    pub store: MemoryStore,
}

#[async_trait]
impl PasswordHasher for LockCheckingHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        match tokio::time::timeout(Duration::from_millis(200), self.store.begin()).await {
            Ok(uow) => {
                drop(uow?);
                Ok(format!("hash:{}", plaintext))
            }
            Err(_) => Err(anyhow::anyhow!("hash pedido com a transação aberta").into()),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub emails: Mutex<Vec<CreatedUserEmail>>,
    pub free_trials: Mutex<Vec<Uuid>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    /// Espera as tarefas disparadas depois do commit.
    pub async fn wait_for_emails(&self, count: usize) -> Vec<CreatedUserEmail> {
        for _ in 0..200 {
            {
                let emails = self.emails.lock().await;
                if emails.len() >= count {
                    return emails.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.emails.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_created_user_email(&self, email: CreatedUserEmail) -> anyhow::Result<()> {
        self.emails.lock().await.push(email);
        if self.fail {
            anyhow::bail!("serviço de e-mail fora do ar");
        }
        Ok(())
    }

    async fn create_free_trial(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.free_trials.lock().await.push(user_id);
        if self.fail {
            anyhow::bail!("serviço de assinaturas fora do ar");
        }
        Ok(())
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self::build(MemoryStore::new(), notifier, Arc::new(PlainHasher))
    }

    /// Hasher que não aceita ser chamado dentro de uma transação.
    pub fn with_lock_checking_hasher() -> Self {
        let store = MemoryStore::new();
        let hasher = Arc::new(LockCheckingHasher { store: store.clone() });
        Self::build(store, RecordingNotifier::default(), hasher)
    }

    fn build(store: MemoryStore, notifier: RecordingNotifier, hasher: Arc<dyn PasswordHasher>) -> Self {
        let notifier = Arc::new(notifier);
        let state = AppState::with_parts(
            Arc::new(store.clone()),
            AuthService::new(JWT_SECRET.to_string()),
            I18nStore::new(true),
            hasher,
            notifier.clone(),
            PolicyVersions { terms: "v1".to_string(), privacy: "v1".to_string() },
        );
        Self { store, state, notifier }
    }

    pub fn store(&self) -> &dyn Store {
        self.state.store.as_ref()
    }

    /// Usuário gravado direto na store, sem passar pelos serviços.
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let mut uow = self.store.begin().await.unwrap();
        let user = uow
            .insert_user(NewUser {
                email: email.to_string(),
                password: "hash:segredo".to_string(),
                name: format!("Usuário {}", email),
                phone_number: Some("11999990000".to_string()),
                additional_phone_number: None,
                auth: role,
                cnpj: None,
                cpf: None,
                terms_version: "v1".to_string(),
                privacy_version: "v1".to_string(),
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
        user
    }

    /// Petshop com a configuração padrão.
    pub async fn seed_petshop(&self, email: &str) -> User {
        let petshop = self.seed_user(email, Role::Petshop).await;
        let mut uow = self.store.begin().await.unwrap();
        uow.insert_configuration(NewConfiguration::defaults(petshop.id)).await.unwrap();
        uow.commit().await.unwrap();
        petshop
    }

    pub async fn seed_worker(&self, email: &str, petshop_id: Uuid) -> User {
        let worker = self.seed_user(email, Role::Worker).await;
        let mut uow = self.store.begin().await.unwrap();
        uow.insert_worker_relation(worker.id, petshop_id).await.unwrap();
        uow.commit().await.unwrap();
        worker
    }
}

pub fn petshop_principal(petshop: &User) -> Principal {
    Principal::user(petshop.id, Role::Petshop)
}

pub fn client_json(email: &str) -> Value {
    json!({
        "user": { "email": email, "name": "Maria Souza", "phoneNumber": "11988887777" },
        "address": {
            "cep": "01001000",
            "city": "São Paulo",
            "uf": "SP",
            "district": "Sé",
            "street": "Praça da Sé",
            "streetNumber": 10,
            "deliveryValue": 1500,
            "deliveryTime": 20
        },
        "pets": [
            { "name": "Rex", "bodySize": "medium", "furSize": "short" },
            { "name": "Mia", "bodySize": "small", "furSize": "long", "notes": "Tem medo de secador" }
        ],
        "clientInfo": { "notes": "Prefere banho à tarde", "canScheduleThroughApp": true }
    })
}

pub fn client_payload(email: &str) -> ClientPayload {
    serde_json::from_value(client_json(email)).unwrap()
}

pub fn petshop_json(email: &str) -> Value {
    json!({
        "user": {
            "email": email,
            "password": "senha-forte",
            "name": "Pet Feliz",
            "phoneNumber": "1133334444",
            "cnpj": "12345678000199"
        },
        "address": {
            "cep": "04567000",
            "city": "São Paulo",
            "uf": "SP",
            "district": "Brooklin",
            "street": "Rua das Flores",
            "streetNumber": 42,
            "deliveryValue": 900,
            "deliveryTime": 15
        }
    })
}

pub fn token(id: Uuid, role: Option<Role>, is_micro: bool) -> String {
    let claims = json!({
        "sub": id,
        "auth": role.map(Role::code),
        "isMicro": is_micro,
        "exp": (Utc::now() + chrono::Duration::hours(1)).timestamp(),
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap()
}
