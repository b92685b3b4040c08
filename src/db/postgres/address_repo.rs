// src/db/postgres/address_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::postgres::{TOUCH_UPDATED_AT, map_unique_violation},
    models::address::{Address, AddressPatch, AddressScope, NewAddress},
};

const ADDRESS_COLUMNS: &str = "id, user_id, petshop_id, cep, city, uf, district, street, street_number, \
     complement, delivery_value, delivery_time, created_at, updated_at";

pub struct AddressRepository;

impl AddressRepository {
    pub async fn list<'e, E>(executor: E, user_id: Uuid, scope: AddressScope) -> Result<Vec<Address>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = "
        ));
        query.push_bind(user_id);

        match scope {
            AddressScope::Own => {
                query.push(" AND petshop_id IS NULL");
            }
            AddressScope::Tenant(petshop_id) => {
                query.push(" AND petshop_id = ").push_bind(petshop_id);
            }
            AddressScope::Any => {}
        }
        query.push(" ORDER BY created_at");

        let addresses = query.build_query_as::<Address>().fetch_all(executor).await?;
        Ok(addresses)
    }

    pub async fn insert<'e, E>(executor: E, new: &NewAddress) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            INSERT INTO addresses (
                user_id, petshop_id, cep, city, uf, district, street, street_number,
                complement, delivery_value, delivery_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.petshop_id)
        .bind(&new.cep)
        .bind(&new.city)
        .bind(&new.uf)
        .bind(&new.district)
        .bind(&new.street)
        .bind(new.street_number)
        .bind(&new.complement)
        .bind(new.delivery_value)
        .bind(new.delivery_time)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;

        Ok(address)
    }

    pub async fn patch<'e, E>(executor: E, id: Uuid, patch: &AddressPatch) -> Result<Option<Address>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE addresses SET {TOUCH_UPDATED_AT}"));

        if let Some(cep) = &patch.cep {
            query.push(", cep = ").push_bind(cep.clone());
        }
        if let Some(city) = &patch.city {
            query.push(", city = ").push_bind(city.clone());
        }
        if let Some(uf) = &patch.uf {
            query.push(", uf = ").push_bind(uf.clone());
        }
        if let Some(district) = &patch.district {
            query.push(", district = ").push_bind(district.clone());
        }
        if let Some(street) = &patch.street {
            query.push(", street = ").push_bind(street.clone());
        }
        if let Some(street_number) = patch.street_number {
            query.push(", street_number = ").push_bind(street_number);
        }
        if let Some(complement) = &patch.complement {
            query.push(", complement = ").push_bind(complement.clone());
        }
        if let Some(delivery_value) = patch.delivery_value {
            query.push(", delivery_value = ").push_bind(delivery_value);
        }
        if let Some(delivery_time) = patch.delivery_time {
            query.push(", delivery_time = ").push_bind(delivery_time);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {ADDRESS_COLUMNS}"));

        let address = query.build_query_as::<Address>().fetch_optional(executor).await?;
        Ok(address)
    }
}
