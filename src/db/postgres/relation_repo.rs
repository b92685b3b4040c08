// src/db/postgres/relation_repo.rs
// Vínculos cliente/colaborador <-> petshop e as informações do cliente por petshop.

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::postgres::{TOUCH_UPDATED_AT, map_unique_violation},
    models::relation::{
        ClientInfoPatch, ClientPetshopInfo, ClientPetshopRelation, NewClientInfo, RelationFilter,
        WorkerPetshopRelation,
    },
};

const CLIENT_RELATION_COLUMNS: &str = "id, client_id, petshop_id, is_removed, created_at, updated_at";
const WORKER_RELATION_COLUMNS: &str = "id, worker_id, petshop_id, is_removed, created_at, updated_at";
const CLIENT_INFO_COLUMNS: &str =
    "id, client_id, petshop_id, notes, can_schedule_through_app, created_at, updated_at";

// Monta o WHERE comum às duas tabelas de vínculo
fn push_relation_filter(query: &mut QueryBuilder<'_, Postgres>, member_column: &str, filter: &RelationFilter) {
    query.push(" WHERE TRUE");
    if let Some(member_id) = filter.member_id {
        query.push(format!(" AND {member_column} = ")).push_bind(member_id);
    }
    if let Some(petshop_id) = filter.petshop_id {
        query.push(" AND petshop_id = ").push_bind(petshop_id);
    }
    if !filter.include_removed {
        query.push(" AND is_removed = FALSE");
    }
    query.push(" ORDER BY created_at");
}

pub struct ClientRelationRepository;

impl ClientRelationRepository {
    pub async fn list<'e, E>(executor: E, filter: &RelationFilter) -> Result<Vec<ClientPetshopRelation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CLIENT_RELATION_COLUMNS} FROM client_petshop_relations"
        ));
        push_relation_filter(&mut query, "client_id", filter);

        let relations = query
            .build_query_as::<ClientPetshopRelation>()
            .fetch_all(executor)
            .await?;
        Ok(relations)
    }

    pub async fn insert<'e, E>(executor: E, client_id: Uuid, petshop_id: Uuid) -> Result<ClientPetshopRelation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let relation = sqlx::query_as::<_, ClientPetshopRelation>(&format!(
            r#"
            INSERT INTO client_petshop_relations (client_id, petshop_id)
            VALUES ($1, $2)
            RETURNING {CLIENT_RELATION_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(petshop_id)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;
        Ok(relation)
    }

    pub async fn set_removed<'e, E>(
        executor: E,
        id: Uuid,
        is_removed: bool,
    ) -> Result<Option<ClientPetshopRelation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let relation = sqlx::query_as::<_, ClientPetshopRelation>(&format!(
            r#"
            UPDATE client_petshop_relations
            SET {TOUCH_UPDATED_AT}, is_removed = $2
            WHERE id = $1
            RETURNING {CLIENT_RELATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_removed)
        .fetch_optional(executor)
        .await?;
        Ok(relation)
    }
}

pub struct ClientInfoRepository;

impl ClientInfoRepository {
    pub async fn list<'e, E>(
        executor: E,
        client_id: Uuid,
        petshop_id: Option<Uuid>,
    ) -> Result<Vec<ClientPetshopInfo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CLIENT_INFO_COLUMNS} FROM client_petshop_infos WHERE client_id = "
        ));
        query.push_bind(client_id);
        if let Some(petshop_id) = petshop_id {
            query.push(" AND petshop_id = ").push_bind(petshop_id);
        }
        query.push(" ORDER BY created_at");

        let infos = query
            .build_query_as::<ClientPetshopInfo>()
            .fetch_all(executor)
            .await?;
        Ok(infos)
    }

    pub async fn insert<'e, E>(executor: E, new: &NewClientInfo) -> Result<ClientPetshopInfo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let info = sqlx::query_as::<_, ClientPetshopInfo>(&format!(
            r#"
            INSERT INTO client_petshop_infos (client_id, petshop_id, notes, can_schedule_through_app)
            VALUES ($1, $2, $3, $4)
            RETURNING {CLIENT_INFO_COLUMNS}
            "#
        ))
        .bind(new.client_id)
        .bind(new.petshop_id)
        .bind(&new.notes)
        .bind(new.can_schedule_through_app)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;
        Ok(info)
    }

    pub async fn patch<'e, E>(executor: E, id: Uuid, patch: &ClientInfoPatch) -> Result<Option<ClientPetshopInfo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("UPDATE client_petshop_infos SET {TOUCH_UPDATED_AT}"));

        if let Some(notes) = &patch.notes {
            query.push(", notes = ").push_bind(notes.clone());
        }
        if let Some(value) = patch.can_schedule_through_app {
            query.push(", can_schedule_through_app = ").push_bind(value);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {CLIENT_INFO_COLUMNS}"));

        let info = query
            .build_query_as::<ClientPetshopInfo>()
            .fetch_optional(executor)
            .await?;
        Ok(info)
    }
}

pub struct WorkerRelationRepository;

impl WorkerRelationRepository {
    pub async fn list<'e, E>(executor: E, filter: &RelationFilter) -> Result<Vec<WorkerPetshopRelation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {WORKER_RELATION_COLUMNS} FROM worker_petshop_relations"
        ));
        push_relation_filter(&mut query, "worker_id", filter);

        let relations = query
            .build_query_as::<WorkerPetshopRelation>()
            .fetch_all(executor)
            .await?;
        Ok(relations)
    }

    pub async fn insert<'e, E>(executor: E, worker_id: Uuid, petshop_id: Uuid) -> Result<WorkerPetshopRelation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let relation = sqlx::query_as::<_, WorkerPetshopRelation>(&format!(
            r#"
            INSERT INTO worker_petshop_relations (worker_id, petshop_id)
            VALUES ($1, $2)
            RETURNING {WORKER_RELATION_COLUMNS}
            "#
        ))
        .bind(worker_id)
        .bind(petshop_id)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;
        Ok(relation)
    }
}
