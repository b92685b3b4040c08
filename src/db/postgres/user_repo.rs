// src/db/postgres/user_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::postgres::{TOUCH_UPDATED_AT, map_unique_violation},
    models::user::{NewUser, User, UserFilter, UserPatch},
};

const USER_COLUMNS: &str = "id, email, password, name, phone_number, additional_phone_number, auth, \
     cnpj, cpf, terms_version, privacy_version, is_blocked_from_receiving_email, created_at, updated_at";

// Tabela 'users'
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    pub async fn list<'e, E>(executor: E, filter: &UserFilter) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));

        if let Some(ids) = &filter.ids {
            query.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        if let Some(roles) = &filter.roles {
            let codes: Vec<i32> = roles.iter().map(|r| r.code()).collect();
            query.push(" AND auth = ANY(").push_bind(codes).push(")");
        }
        if let Some(blocked) = filter.blocked_from_email {
            query
                .push(" AND is_blocked_from_receiving_email = ")
                .push_bind(blocked);
        }
        query.push(" ORDER BY created_at");

        let users = query.build_query_as::<User>().fetch_all(executor).await?;
        Ok(users)
    }

    pub async fn insert<'e, E>(executor: E, new: &NewUser) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                email, password, name, phone_number, additional_phone_number, auth,
                cnpj, cpf, terms_version, privacy_version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.password)
        .bind(&new.name)
        .bind(&new.phone_number)
        .bind(&new.additional_phone_number)
        .bind(new.auth.code())
        .bind(&new.cnpj)
        .bind(&new.cpf)
        .bind(&new.terms_version)
        .bind(&new.privacy_version)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    pub async fn patch<'e, E>(executor: E, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE users SET {TOUCH_UPDATED_AT}"));

        if let Some(email) = &patch.email {
            query.push(", email = ").push_bind(email.clone());
        }
        if let Some(password) = &patch.password {
            query.push(", password = ").push_bind(password.clone());
        }
        if let Some(name) = &patch.name {
            query.push(", name = ").push_bind(name.clone());
        }
        if let Some(phone_number) = &patch.phone_number {
            query.push(", phone_number = ").push_bind(phone_number.clone());
        }
        if let Some(additional) = &patch.additional_phone_number {
            query.push(", additional_phone_number = ").push_bind(additional.clone());
        }
        if let Some(cnpj) = &patch.cnpj {
            query.push(", cnpj = ").push_bind(cnpj.clone());
        }
        if let Some(cpf) = &patch.cpf {
            query.push(", cpf = ").push_bind(cpf.clone());
        }
        if let Some(terms_version) = &patch.terms_version {
            query.push(", terms_version = ").push_bind(terms_version.clone());
        }
        if let Some(privacy_version) = &patch.privacy_version {
            query.push(", privacy_version = ").push_bind(privacy_version.clone());
        }
        if let Some(blocked) = patch.is_blocked_from_receiving_email {
            query.push(", is_blocked_from_receiving_email = ").push_bind(blocked);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        let user = query
            .build_query_as::<User>()
            .fetch_optional(executor)
            .await
            .map_err(map_unique_violation)?;
        Ok(user)
    }
}
