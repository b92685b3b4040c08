// src/db/include.rs

use std::collections::BTreeSet;

use uuid::Uuid;

/// Relações de um usuário que podem ser carregadas junto com ele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// Endereços do usuário
    Address,
    /// Pets do cliente
    Pets,
    /// Vínculos ativos cliente <-> petshop
    ClientRelations,
    /// Informações do cliente por petshop
    ClientInfo,
    /// Petshops do cliente, com o endereço de cada um
    ClientPetshops,
    /// Configurações do petshop
    Configuration,
    /// Responsável pelo petshop
    ResponsiblePerson,
    /// Colaboradores ativos do petshop
    Workers,
    /// Petshops em que o colaborador trabalha
    Petshops,
}

// Conjunto tipado de relações, montado no estilo builder:
//   Include::new().with(Relation::Address).with(Relation::Pets)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Include(BTreeSet<Relation>);

impl Include {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, relation: Relation) -> Self {
        self.0.insert(relation);
        self
    }

    pub fn relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.0.iter().copied()
    }

    /// Tudo que um petshop enxerga de um cliente seu.
    pub fn client_in_tenant() -> Self {
        Self::new()
            .with(Relation::ClientRelations)
            .with(Relation::Pets)
            .with(Relation::Address)
            .with(Relation::ClientInfo)
    }

    /// Grafo completo do petshop.
    pub fn petshop() -> Self {
        Self::new()
            .with(Relation::ResponsiblePerson)
            .with(Relation::Address)
            .with(Relation::Workers)
            .with(Relation::Configuration)
    }
}

/// Filtro aplicado às relações carregadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphScope {
    /// Só o que pertence ao petshop informado (endereço, pets, info e vínculo)
    Tenant(Uuid),
    Unscoped,
}

impl GraphScope {
    pub fn tenant(&self) -> Option<Uuid> {
        match self {
            GraphScope::Tenant(id) => Some(*id),
            GraphScope::Unscoped => None,
        }
    }
}
