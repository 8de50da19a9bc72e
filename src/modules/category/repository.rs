use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::database::{DatabaseConnection, MemoryDatabase};

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub restaurant_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateCategoryPayload {
    pub name: String,
    pub restaurant_id: String,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait CategoryRepository {
    async fn create_category(&self, payload: CreateCategoryPayload) -> Result<Category>;
    /// Ordered by name.
    async fn find_categories_by_restaurant_id(&self, restaurant_id: &str)
        -> Result<Vec<Category>>;
    /// Renames a category, provided its restaurant belongs to `owner_id`.
    async fn update_category_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        name: String,
    ) -> Result<Option<Category>>;
    async fn delete_category_by_id_and_owner_id(&self, id: &str, owner_id: &str) -> Result<bool>;
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateCategoryPayload,
) -> Result<Category> {
    sqlx::query_as::<_, Category>(
        "
        INSERT INTO categories (id, name, restaurant_id)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.restaurant_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create a category: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_many_by_restaurant_id<'e, E: PgExecutor<'e>>(
    e: E,
    restaurant_id: &str,
) -> Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE restaurant_id = $1 ORDER BY name ASC, id ASC",
    )
    .bind(restaurant_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching categories: {}", err);
        Error::UnexpectedError
    })
}

pub async fn update_by_id_and_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
    name: String,
) -> Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        "
        UPDATE categories SET
            name = $1,
            updated_at = NOW()
        FROM restaurants
        WHERE
            categories.id = $2
            AND restaurants.id = categories.restaurant_id
            AND restaurants.owner_id = $3
        RETURNING categories.*
        ",
    )
    .bind(name)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Failed to update category by id {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id_and_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
) -> Result<bool> {
    sqlx::query(
        "
        DELETE FROM categories
        USING restaurants
        WHERE
            categories.id = $1
            AND restaurants.id = categories.restaurant_id
            AND restaurants.owner_id = $2
        ",
    )
    .bind(id)
    .bind(owner_id)
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Failed to delete category by id {}: {}", id, err);
        Error::UnexpectedError
    })
}

#[async_trait]
impl CategoryRepository for DatabaseConnection {
    async fn create_category(&self, payload: CreateCategoryPayload) -> Result<Category> {
        create(&self.pool, payload).await
    }

    async fn find_categories_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Category>> {
        find_many_by_restaurant_id(&self.pool, restaurant_id).await
    }

    async fn update_category_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        name: String,
    ) -> Result<Option<Category>> {
        update_by_id_and_owner_id(&self.pool, id, owner_id, name).await
    }

    async fn delete_category_by_id_and_owner_id(&self, id: &str, owner_id: &str) -> Result<bool> {
        delete_by_id_and_owner_id(&self.pool, id, owner_id).await
    }
}

#[async_trait]
impl CategoryRepository for MemoryDatabase {
    async fn create_category(&self, payload: CreateCategoryPayload) -> Result<Category> {
        let mut tables = self.tables.write().await;

        if !tables
            .restaurants
            .iter()
            .any(|r| r.id == payload.restaurant_id)
        {
            tracing::error!(
                "Error occurred while trying to create a category: restaurant {} does not exist",
                payload.restaurant_id
            );
            return Err(Error::UnexpectedError);
        }

        let category = Category {
            id: Ulid::new().to_string(),
            name: payload.name,
            restaurant_id: payload.restaurant_id,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };
        tables.categories.push(category.clone());

        Ok(category)
    }

    async fn find_categories_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;

        let mut categories = tables
            .categories
            .iter()
            .filter(|c| c.restaurant_id == restaurant_id)
            .cloned()
            .collect::<Vec<_>>();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(categories)
    }

    async fn update_category_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        name: String,
    ) -> Result<Option<Category>> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let restaurants = &tables.restaurants;
        Ok(tables
            .categories
            .iter_mut()
            .find(|c| {
                c.id == id
                    && restaurants
                        .iter()
                        .any(|r| r.id == c.restaurant_id && r.owner_id == owner_id)
            })
            .map(|category| {
                category.name = name;
                category.updated_at = Some(Utc::now().naive_utc());
                category.clone()
            }))
    }

    async fn delete_category_by_id_and_owner_id(&self, id: &str, owner_id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let restaurants = &tables.restaurants;
        let Some(position) = tables.categories.iter().position(|c| {
            c.id == id
                && restaurants
                    .iter()
                    .any(|r| r.id == c.restaurant_id && r.owner_id == owner_id)
        }) else {
            return Ok(false);
        };

        tables.categories.remove(position);
        tables.dish_categories.retain(|dc| dc.category_id != id);

        Ok(true)
    }
}
