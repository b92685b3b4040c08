// src/services/notification.rs
// E-mails de boas-vindas e assinatura de teste grátis.
// Tudo aqui roda depois do commit e nunca derruba a operação principal.

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Qual template de "usuário criado" usar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailFlavor {
    Petshop,
    Worker,
    Client,
}

impl EmailFlavor {
    fn path(self) -> &'static str {
        match self {
            EmailFlavor::Petshop => "email/petshop/new",
            EmailFlavor::Worker => "email/worker/new",
            EmailFlavor::Client => "email/client/new",
        }
    }

    // Cliente e colaborador não escolheram a senha: recebem o link para definir
    fn needs_action_link(self) -> bool {
        matches!(self, EmailFlavor::Worker | EmailFlavor::Client)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUserEmail {
    pub email: String,
    pub name: String,
    pub flavor: EmailFlavor,
    pub petshop_name: Option<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_created_user_email(&self, email: CreatedUserEmail) -> anyhow::Result<()>;
    async fn create_free_trial(&self, user_id: Uuid) -> anyhow::Result<()>;
}

// ---
// Implementação HTTP: serviços internos autenticados pelo MICRO_PSK
// ---
#[derive(Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    api_entrypoint: String,
    micro_psk: String,
    plans_uri: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedUserEmailBody<'a> {
    email: &'a str,
    name: &'a str,
    petshop_name: Option<&'a str>,
    plans_uri: Option<&'a str>,
    action_uri: Option<Value>,
}

impl HttpNotifier {
    pub fn new(api_entrypoint: String, micro_psk: String, plans_uri: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_entrypoint: api_entrypoint.trim_end_matches('/').to_string(),
            micro_psk,
            plans_uri,
        }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> anyhow::Result<Value> {
        let url = format!("{}/{}", self.api_entrypoint, path);
        let response = self
            .client
            .post(&url)
            .header("authorization", &self.micro_psk)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            anyhow::bail!("POST {} respondeu {}: {}", url, status, payload);
        }
        Ok(payload)
    }

    async fn action_link(&self, email: &str) -> anyhow::Result<Value> {
        self.post("auth/setpassword/link", &serde_json::json!({ "email": email }))
            .await
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_created_user_email(&self, email: CreatedUserEmail) -> anyhow::Result<()> {
        let action_uri = if email.flavor.needs_action_link() {
            Some(self.action_link(&email.email).await?)
        } else {
            None
        };

        let body = CreatedUserEmailBody {
            email: &email.email,
            name: &email.name,
            petshop_name: email.petshop_name.as_deref(),
            plans_uri: self.plans_uri.as_deref(),
            action_uri,
        };

        self.post(email.flavor.path(), &body).await?;
        Ok(())
    }

    async fn create_free_trial(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.post(
            "subscription/free-trial",
            &serde_json::json!({ "userId": user_id }),
        )
        .await?;
        Ok(())
    }
}

/// Loga a falha de um efeito colateral e segue em frente.
pub fn report(what: &str, result: anyhow::Result<()>) {
    if let Err(e) = result {
        tracing::error!("Falha ao executar '{}': {:#}", what, e);
    }
}

// Dispara sem esperar. O handle só existe para quem quiser observar (testes).
pub fn spawn_best_effort<F>(what: &'static str, task: F) -> JoinHandle<()>
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move { report(what, task.await) })
}
