// src/config.rs

use std::{env, str::FromStr, sync::Arc};

use anyhow::Context;
use sqlx::PgPool;

use crate::{
    common::i18n::I18nStore,
    db::{PgStore, Store},
    services::{
        auth::AuthService,
        client_service::ClientService,
        notification::{HttpNotifier, Notifier},
        password::{BcryptHasher, PasswordHasher},
        petshop_service::{PetshopService, PolicyVersions},
        worker_service::WorkerService,
    },
};

/// Variáveis de ambiente (com `.env` opcional).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub app_env: String,
    pub api_entrypoint: String,
    pub micro_psk: String,
    pub plans_uri: Option<String>,
    pub terms_version: String,
    pub privacy_version: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_or("PORT", 3000)?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            api_entrypoint: required("API_ENTRYPOINT")?,
            micro_psk: required("MICRO_PSK")?,
            plans_uri: env::var("PLANS_URI").ok().filter(|v| !v.is_empty()),
            terms_version: required("TERMS_VERSION")?,
            privacy_version: required("PRIVACY_VERSION")?,
            bcrypt_cost: parsed_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    pub fn policy_versions(&self) -> PolicyVersions {
        PolicyVersions {
            terms: self.terms_version.clone(),
            privacy: self.privacy_version.clone(),
        }
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{} deve ser definida", name))
}

fn parsed_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw.parse().with_context(|| format!("{} inválida: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth_service: AuthService,
    pub i18n_store: I18nStore,
    pub client_service: ClientService,
    pub worker_service: WorkerService,
    pub petshop_service: PetshopService,
}

impl AppState {
    /// Estado de produção: Postgres, bcrypt e notificações via HTTP.
    pub fn new(config: &Config, pool: PgPool) -> Self {
        let notifier = HttpNotifier::new(
            config.api_entrypoint.clone(),
            config.micro_psk.clone(),
            config.plans_uri.clone(),
        );

        Self::with_parts(
            Arc::new(PgStore::new(pool)),
            AuthService::new(config.jwt_secret.clone()),
            I18nStore::new(!config.is_production()),
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            Arc::new(notifier),
            config.policy_versions(),
        )
    }

    // Monta o grafo de dependências a partir das peças (testes usam a store em memória)
    pub fn with_parts(
        store: Arc<dyn Store>,
        auth_service: AuthService,
        i18n_store: I18nStore,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn Notifier>,
        policy_versions: PolicyVersions,
    ) -> Self {
        let client_service = ClientService::new(hasher.clone(), notifier.clone());
        let worker_service = WorkerService::new(hasher.clone(), notifier.clone());
        let petshop_service = PetshopService::new(hasher, notifier, policy_versions);

        Self {
            store,
            auth_service,
            i18n_store,
            client_service,
            worker_service,
            petshop_service,
        }
    }
}
