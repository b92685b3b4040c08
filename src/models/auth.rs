// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---
// Papéis (coluna `auth` da tabela users). Conjunto fechado:
// qualquer código fora desta lista é rejeitado na borda.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum Role {
    UnconfirmedClient = 5,
    Client = 10,
    UnconfirmedWorker = 20,
    Worker = 40,
    Petshop = 50,
    Admin = 100,
}

impl Role {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Cliente confirmado ou não (5 / 10)
    pub fn is_client_family(self) -> bool {
        matches!(self, Role::UnconfirmedClient | Role::Client)
    }

    /// Colaborador confirmado ou não (20 / 40)
    pub fn is_worker_family(self) -> bool {
        matches!(self, Role::UnconfirmedWorker | Role::Worker)
    }
}

impl TryFrom<i32> for Role {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            5 => Ok(Role::UnconfirmedClient),
            10 => Ok(Role::Client),
            20 => Ok(Role::UnconfirmedWorker),
            40 => Ok(Role::Worker),
            50 => Ok(Role::Petshop),
            100 => Ok(Role::Admin),
            other => Err(format!("código de papel desconhecido: {}", other)),
        }
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

// Claims emitidos pelo serviço de autenticação.
// Tokens de serviço ("micro") podem vir sem `auth`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub auth: Option<i32>,
    #[serde(rename = "isMicro", default)]
    pub is_micro: bool,
    pub exp: usize,
}

/// Quem está chamando. Montado pelo `auth_guard` a partir do token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Option<Role>,
    pub is_service: bool,
}

impl Principal {
    pub fn user(id: Uuid, role: Role) -> Self {
        Self { id, role: Some(role), is_service: false }
    }

    pub fn service(id: Uuid) -> Self {
        Self { id, role: None, is_service: true }
    }
}
