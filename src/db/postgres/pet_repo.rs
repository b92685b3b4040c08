// src/db/postgres/pet_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::postgres::{TOUCH_UPDATED_AT, map_unique_violation},
    models::pet::{NewPet, Pet, PetPatch},
};

const PET_COLUMNS: &str = "id, client_id, petshop_id, name, breed, body_size, fur_size, notes, \
     extra_time, created_at, updated_at";

pub struct PetRepository;

impl PetRepository {
    /// Pets do cliente; com `petshop_id`, só os daquele petshop.
    pub async fn list<'e, E>(executor: E, client_id: Uuid, petshop_id: Option<Uuid>) -> Result<Vec<Pet>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {PET_COLUMNS} FROM pets WHERE client_id = "));
        query.push_bind(client_id);
        if let Some(petshop_id) = petshop_id {
            query.push(" AND petshop_id = ").push_bind(petshop_id);
        }
        query.push(" ORDER BY created_at");

        let pets = query.build_query_as::<Pet>().fetch_all(executor).await?;
        Ok(pets)
    }

    pub async fn insert<'e, E>(executor: E, new: &NewPet) -> Result<Pet, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            r#"
            INSERT INTO pets (client_id, petshop_id, name, breed, body_size, fur_size, notes, extra_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(new.client_id)
        .bind(new.petshop_id)
        .bind(&new.name)
        .bind(&new.breed)
        .bind(new.body_size)
        .bind(new.fur_size)
        .bind(&new.notes)
        .bind(new.extra_time)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;

        Ok(pet)
    }

    pub async fn patch<'e, E>(executor: E, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE pets SET {TOUCH_UPDATED_AT}"));

        if let Some(name) = &patch.name {
            query.push(", name = ").push_bind(name.clone());
        }
        if let Some(breed) = &patch.breed {
            query.push(", breed = ").push_bind(breed.clone());
        }
        if let Some(body_size) = patch.body_size {
            query.push(", body_size = ").push_bind(body_size);
        }
        if let Some(fur_size) = patch.fur_size {
            query.push(", fur_size = ").push_bind(fur_size);
        }
        if let Some(notes) = &patch.notes {
            query.push(", notes = ").push_bind(notes.clone());
        }
        if let Some(extra_time) = patch.extra_time {
            query.push(", extra_time = ").push_bind(extra_time);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {PET_COLUMNS}"));

        let pet = query.build_query_as::<Pet>().fetch_optional(executor).await?;
        Ok(pet)
    }
}
