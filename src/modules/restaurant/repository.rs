use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::database::{DatabaseConnection, MemoryDatabase};

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub location: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateRestaurantPayload {
    pub name: String,
    pub location: String,
    pub owner_id: String,
}

pub struct UpdateRestaurantPayload {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait RestaurantRepository {
    async fn create_restaurant(&self, payload: CreateRestaurantPayload) -> Result<Restaurant>;
    /// Newest first.
    async fn find_restaurants_by_owner_id(&self, owner_id: &str) -> Result<Vec<Restaurant>>;
    async fn find_restaurant_by_id(&self, id: &str) -> Result<Option<Restaurant>>;
    async fn find_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Restaurant>>;
    async fn update_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>>;
    /// Also removes the restaurant's categories, dishes and their links.
    /// Returns whether anything was deleted.
    async fn delete_restaurant_by_id_and_owner_id(&self, id: &str, owner_id: &str)
        -> Result<bool>;
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateRestaurantPayload,
) -> Result<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        "
        INSERT INTO restaurants (id, name, location, owner_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.location)
    .bind(payload.owner_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create a restaurant: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_many_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: &str,
) -> Result<Vec<Restaurant>> {
    sqlx::query_as::<_, Restaurant>(
        "SELECT * FROM restaurants WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(owner_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching restaurants: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching restaurant by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_by_id_and_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching restaurant by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn update_by_id_and_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
    payload: UpdateRestaurantPayload,
) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>(
        "
        UPDATE restaurants SET
            name = COALESCE($1, name),
            location = COALESCE($2, location),
            updated_at = NOW()
        WHERE
            id = $3
            AND owner_id = $4
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.location)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Failed to update restaurant by id {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id_and_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
) -> Result<bool> {
    sqlx::query("DELETE FROM restaurants WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete restaurant by id {}: {}", id, err);
            Error::UnexpectedError
        })
}

#[async_trait]
impl RestaurantRepository for DatabaseConnection {
    async fn create_restaurant(&self, payload: CreateRestaurantPayload) -> Result<Restaurant> {
        create(&self.pool, payload).await
    }

    async fn find_restaurants_by_owner_id(&self, owner_id: &str) -> Result<Vec<Restaurant>> {
        find_many_by_owner_id(&self.pool, owner_id).await
    }

    async fn find_restaurant_by_id(&self, id: &str) -> Result<Option<Restaurant>> {
        find_by_id(&self.pool, id).await
    }

    async fn find_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Restaurant>> {
        find_by_id_and_owner_id(&self.pool, id, owner_id).await
    }

    async fn update_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>> {
        update_by_id_and_owner_id(&self.pool, id, owner_id, payload).await
    }

    async fn delete_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<bool> {
        delete_by_id_and_owner_id(&self.pool, id, owner_id).await
    }
}

#[async_trait]
impl RestaurantRepository for MemoryDatabase {
    async fn create_restaurant(&self, payload: CreateRestaurantPayload) -> Result<Restaurant> {
        let mut tables = self.tables.write().await;

        let restaurant = Restaurant {
            id: Ulid::new().to_string(),
            name: payload.name,
            location: payload.location,
            owner_id: payload.owner_id,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };
        tables.restaurants.push(restaurant.clone());

        Ok(restaurant)
    }

    async fn find_restaurants_by_owner_id(&self, owner_id: &str) -> Result<Vec<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .restaurants
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_restaurant_by_id(&self, id: &str) -> Result<Option<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables.restaurants.iter().find(|r| r.id == id).cloned())
    }

    async fn find_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .restaurants
            .iter()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .cloned())
    }

    async fn update_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .restaurants
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .map(|restaurant| {
                if let Some(name) = payload.name {
                    restaurant.name = name;
                }
                if let Some(location) = payload.location {
                    restaurant.location = location;
                }
                restaurant.updated_at = Some(Utc::now().naive_utc());
                restaurant.clone()
            }))
    }

    async fn delete_restaurant_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.restaurants.len();
        tables
            .restaurants
            .retain(|r| !(r.id == id && r.owner_id == owner_id));
        if tables.restaurants.len() == before {
            return Ok(false);
        }

        let dish_ids = tables
            .dishes
            .iter()
            .filter(|d| d.restaurant_id == id)
            .map(|d| d.id.clone())
            .collect::<Vec<_>>();
        tables
            .dish_categories
            .retain(|dc| !dish_ids.contains(&dc.dish_id));
        tables.dishes.retain(|d| d.restaurant_id != id);
        tables.categories.retain(|c| c.restaurant_id != id);

        Ok(true)
    }
}
