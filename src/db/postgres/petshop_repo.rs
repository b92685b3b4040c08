// src/db/postgres/petshop_repo.rs
// Tabelas 1:1 com o petshop: configurações e pessoa responsável.

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::postgres::{TOUCH_UPDATED_AT, map_unique_violation},
    models::petshop::{
        ConfigurationPatch, NewConfiguration, NewResponsiblePerson, PetshopConfiguration,
        ResponsiblePerson, ResponsiblePersonPatch,
    },
};

const CONFIGURATION_COLUMNS: &str = "id, petshop_id, payment_through_app, payment_outside_app, \
     cancellation_fee, schedule_through_app_cancel_if_not_payed, created_at, updated_at";

const RESPONSIBLE_COLUMNS: &str = "id, petshop_id, name, phone_number, cpf, created_at, updated_at";

pub struct ConfigurationRepository;

impl ConfigurationRepository {
    pub async fn find_by_petshop<'e, E>(executor: E, petshop_id: Uuid) -> Result<Option<PetshopConfiguration>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let config = sqlx::query_as::<_, PetshopConfiguration>(&format!(
            "SELECT {CONFIGURATION_COLUMNS} FROM petshop_configurations WHERE petshop_id = $1"
        ))
        .bind(petshop_id)
        .fetch_optional(executor)
        .await?;
        Ok(config)
    }

    pub async fn insert<'e, E>(executor: E, new: &NewConfiguration) -> Result<PetshopConfiguration, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let config = sqlx::query_as::<_, PetshopConfiguration>(&format!(
            r#"
            INSERT INTO petshop_configurations (
                petshop_id, payment_through_app, payment_outside_app,
                cancellation_fee, schedule_through_app_cancel_if_not_payed
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CONFIGURATION_COLUMNS}
            "#
        ))
        .bind(new.petshop_id)
        .bind(new.payment_through_app)
        .bind(new.payment_outside_app)
        .bind(new.cancellation_fee)
        .bind(new.schedule_through_app_cancel_if_not_payed)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;
        Ok(config)
    }

    pub async fn patch<'e, E>(
        executor: E,
        petshop_id: Uuid,
        patch: &ConfigurationPatch,
    ) -> Result<Option<PetshopConfiguration>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("UPDATE petshop_configurations SET {TOUCH_UPDATED_AT}"));

        if let Some(value) = patch.payment_through_app {
            query.push(", payment_through_app = ").push_bind(value);
        }
        if let Some(value) = patch.payment_outside_app {
            query.push(", payment_outside_app = ").push_bind(value);
        }
        if let Some(value) = patch.cancellation_fee {
            query.push(", cancellation_fee = ").push_bind(value);
        }
        if let Some(value) = patch.schedule_through_app_cancel_if_not_payed {
            query
                .push(", schedule_through_app_cancel_if_not_payed = ")
                .push_bind(value);
        }

        query
            .push(" WHERE petshop_id = ")
            .push_bind(petshop_id)
            .push(format!(" RETURNING {CONFIGURATION_COLUMNS}"));

        let config = query
            .build_query_as::<PetshopConfiguration>()
            .fetch_optional(executor)
            .await?;
        Ok(config)
    }
}

pub struct ResponsiblePersonRepository;

impl ResponsiblePersonRepository {
    pub async fn find_by_petshop<'e, E>(executor: E, petshop_id: Uuid) -> Result<Option<ResponsiblePerson>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let person = sqlx::query_as::<_, ResponsiblePerson>(&format!(
            "SELECT {RESPONSIBLE_COLUMNS} FROM petshop_responsible_persons WHERE petshop_id = $1"
        ))
        .bind(petshop_id)
        .fetch_optional(executor)
        .await?;
        Ok(person)
    }

    pub async fn insert<'e, E>(executor: E, new: &NewResponsiblePerson) -> Result<ResponsiblePerson, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let person = sqlx::query_as::<_, ResponsiblePerson>(&format!(
            r#"
            INSERT INTO petshop_responsible_persons (petshop_id, name, phone_number, cpf)
            VALUES ($1, $2, $3, $4)
            RETURNING {RESPONSIBLE_COLUMNS}
            "#
        ))
        .bind(new.petshop_id)
        .bind(&new.name)
        .bind(&new.phone_number)
        .bind(&new.cpf)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;
        Ok(person)
    }

    pub async fn patch<'e, E>(
        executor: E,
        petshop_id: Uuid,
        patch: &ResponsiblePersonPatch,
    ) -> Result<Option<ResponsiblePerson>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("UPDATE petshop_responsible_persons SET {TOUCH_UPDATED_AT}"));

        if let Some(name) = &patch.name {
            query.push(", name = ").push_bind(name.clone());
        }
        if let Some(phone_number) = &patch.phone_number {
            query.push(", phone_number = ").push_bind(phone_number.clone());
        }
        if let Some(cpf) = &patch.cpf {
            query.push(", cpf = ").push_bind(cpf.clone());
        }

        query
            .push(" WHERE petshop_id = ")
            .push_bind(petshop_id)
            .push(format!(" RETURNING {RESPONSIBLE_COLUMNS}"));

        let person = query
            .build_query_as::<ResponsiblePerson>()
            .fetch_optional(executor)
            .await?;
        Ok(person)
    }
}
