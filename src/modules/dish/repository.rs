use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal, PgExecutor};
use std::collections::HashMap;
use ulid::Ulid;

use crate::utils::database::{memory::Tables, DatabaseConnection, MemoryDatabase};

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub spice_level: Option<i16>,
    pub price: Option<BigDecimal>,
    pub is_vegetarian: bool,
    pub restaurant_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug)]
pub struct DishCategory {
    pub dish_id: String,
    pub category_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
}

#[derive(sqlx::FromRow)]
struct DishCategoryRow {
    dish_id: String,
    id: String,
    name: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct DishWithCategories {
    #[serde(flatten)]
    pub dish: Dish,
    pub categories: Vec<CategorySummary>,
}

/// `category_ids` must not contain duplicates.
pub struct CreateDishPayload {
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub spice_level: Option<i16>,
    pub price: Option<BigDecimal>,
    pub is_vegetarian: bool,
    pub category_ids: Vec<String>,
}

/// Outer `None` leaves a field untouched; `Some(None)` clears a nullable one.
/// `category_ids`, when present, replaces the whole association set.
#[derive(Default)]
pub struct UpdateDishPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<Option<String>>,
    pub spice_level: Option<Option<i16>>,
    pub price: Option<Option<BigDecimal>>,
    pub is_vegetarian: Option<bool>,
    pub category_ids: Option<Vec<String>>,
}

#[derive(Debug, PartialEq)]
pub enum Error {
    CategoryNotInRestaurant,
    UnexpectedError,
}

#[async_trait]
pub trait DishRepository {
    /// Fails with `CategoryNotInRestaurant`, persisting nothing, when any
    /// category id is not one of the restaurant's.
    async fn create_dish(&self, payload: CreateDishPayload) -> Result<DishWithCategories>;
    /// Newest first.
    async fn find_dishes_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<DishWithCategories>>;
    /// Same all-or-nothing category rule as `create_dish`.
    async fn update_dish_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        payload: UpdateDishPayload,
    ) -> Result<Option<DishWithCategories>>;
    async fn delete_dish_by_id_and_owner_id(&self, id: &str, owner_id: &str) -> Result<bool>;
}

fn unexpected(context: &str, err: sqlx::Error) -> Error {
    tracing::error!("{}: {}", context, err);
    Error::UnexpectedError
}

fn with_categories(dishes: Vec<Dish>, rows: Vec<DishCategoryRow>) -> Vec<DishWithCategories> {
    let mut categories_by_dish = rows
        .into_iter()
        .map(|row| {
            (
                row.dish_id,
                CategorySummary {
                    id: row.id,
                    name: row.name,
                },
            )
        })
        .into_group_map();

    dishes
        .into_iter()
        .map(|dish| DishWithCategories {
            categories: categories_by_dish.remove(&dish.id).unwrap_or_default(),
            dish,
        })
        .collect()
}

pub async fn count_categories_in_restaurant<'e, E: PgExecutor<'e>>(
    e: E,
    category_ids: &[String],
    restaurant_id: &str,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM categories WHERE id = ANY($1) AND restaurant_id = $2",
    )
    .bind(category_ids)
    .bind(restaurant_id)
    .fetch_one(e)
    .await
    .map_err(|err| unexpected("Error occurred while checking dish categories", err))
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: &CreateDishPayload) -> Result<Dish> {
    sqlx::query_as::<_, Dish>(
        "
        INSERT INTO dishes (
            id,
            name,
            description,
            image_url,
            spice_level,
            price,
            is_vegetarian,
            restaurant_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.image_url)
    .bind(payload.spice_level)
    .bind(&payload.price)
    .bind(payload.is_vegetarian)
    .bind(&payload.restaurant_id)
    .fetch_one(e)
    .await
    .map_err(|err| unexpected("Error occurred while trying to create a dish", err))
}

pub async fn find_by_id_and_owner_id_for_update<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
) -> Result<Option<Dish>> {
    sqlx::query_as::<_, Dish>(
        "
        SELECT dishes.*
        FROM
            dishes
            INNER JOIN restaurants ON restaurants.id = dishes.restaurant_id
        WHERE
            dishes.id = $1
            AND restaurants.owner_id = $2
        FOR UPDATE OF dishes
        ",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(e)
    .await
    .map_err(|err| unexpected("Error occurred while fetching dish by id", err))
}

pub async fn find_many_by_restaurant_id<'e, E: PgExecutor<'e>>(
    e: E,
    restaurant_id: &str,
) -> Result<Vec<Dish>> {
    sqlx::query_as::<_, Dish>(
        "SELECT * FROM dishes WHERE restaurant_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(restaurant_id)
    .fetch_all(e)
    .await
    .map_err(|err| unexpected("Error occurred while fetching dishes", err))
}

async fn find_category_rows<'e, E: PgExecutor<'e>>(
    e: E,
    dish_ids: &[String],
) -> Result<Vec<DishCategoryRow>> {
    sqlx::query_as::<_, DishCategoryRow>(
        "
        SELECT
            dish_categories.dish_id,
            categories.id,
            categories.name
        FROM
            dish_categories
            INNER JOIN categories ON categories.id = dish_categories.category_id
        WHERE
            dish_categories.dish_id = ANY($1)
        ORDER BY categories.name ASC, categories.id ASC
        ",
    )
    .bind(dish_ids)
    .fetch_all(e)
    .await
    .map_err(|err| unexpected("Error occurred while fetching dish categories", err))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    payload: &UpdateDishPayload,
) -> Result<Dish> {
    sqlx::query_as::<_, Dish>(
        "
        UPDATE dishes SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            image_url = CASE WHEN $3 THEN $4 ELSE image_url END,
            spice_level = CASE WHEN $5 THEN $6 ELSE spice_level END,
            price = CASE WHEN $7 THEN $8 ELSE price END,
            is_vegetarian = COALESCE($9, is_vegetarian),
            updated_at = NOW()
        WHERE id = $10
        RETURNING *
        ",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.image_url.is_some())
    .bind(payload.image_url.clone().flatten())
    .bind(payload.spice_level.is_some())
    .bind(payload.spice_level.flatten())
    .bind(payload.price.is_some())
    .bind(payload.price.clone().flatten())
    .bind(payload.is_vegetarian)
    .bind(id)
    .fetch_one(e)
    .await
    .map_err(|err| unexpected("Failed to update dish", err))
}

pub async fn link_categories<'e, E: PgExecutor<'e>>(
    e: E,
    dish_id: &str,
    category_ids: &[String],
) -> Result<()> {
    sqlx::query(
        "
        INSERT INTO dish_categories (dish_id, category_id)
        SELECT $1, UNNEST($2::VARCHAR[])
        ",
    )
    .bind(dish_id)
    .bind(category_ids)
    .execute(e)
    .await
    .map(|_| ())
    .map_err(|err| unexpected("Failed to link dish categories", err))
}

pub async fn unlink_categories<'e, E: PgExecutor<'e>>(e: E, dish_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM dish_categories WHERE dish_id = $1")
        .bind(dish_id)
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| unexpected("Failed to unlink dish categories", err))
}

pub async fn delete_by_id_and_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    owner_id: &str,
) -> Result<bool> {
    sqlx::query(
        "
        DELETE FROM dishes
        USING restaurants
        WHERE
            dishes.id = $1
            AND restaurants.id = dishes.restaurant_id
            AND restaurants.owner_id = $2
        ",
    )
    .bind(id)
    .bind(owner_id)
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| unexpected("Failed to delete dish", err))
}

#[async_trait]
impl DishRepository for DatabaseConnection {
    async fn create_dish(&self, payload: CreateDishPayload) -> Result<DishWithCategories> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| unexpected("Failed to start database transaction", err))?;

        if !payload.category_ids.is_empty() {
            let found = count_categories_in_restaurant(
                &mut *tx,
                &payload.category_ids,
                &payload.restaurant_id,
            )
            .await?;
            if found != payload.category_ids.len() as i64 {
                return Err(Error::CategoryNotInRestaurant);
            }
        }

        let dish = create(&mut *tx, &payload).await?;
        link_categories(&mut *tx, &dish.id, &payload.category_ids).await?;
        let rows = find_category_rows(&mut *tx, &[dish.id.clone()]).await?;

        tx.commit()
            .await
            .map_err(|err| unexpected("Failed to commit database transaction", err))?;

        Ok(with_categories(vec![dish], rows).remove(0))
    }

    async fn find_dishes_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<DishWithCategories>> {
        let dishes = find_many_by_restaurant_id(&self.pool, restaurant_id).await?;
        let dish_ids = dishes.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
        let rows = find_category_rows(&self.pool, &dish_ids).await?;

        Ok(with_categories(dishes, rows))
    }

    async fn update_dish_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        payload: UpdateDishPayload,
    ) -> Result<Option<DishWithCategories>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| unexpected("Failed to start database transaction", err))?;

        let Some(dish) = find_by_id_and_owner_id_for_update(&mut *tx, id, owner_id).await? else {
            return Ok(None);
        };

        if let Some(category_ids) = &payload.category_ids {
            if !category_ids.is_empty() {
                let found =
                    count_categories_in_restaurant(&mut *tx, category_ids, &dish.restaurant_id)
                        .await?;
                if found != category_ids.len() as i64 {
                    return Err(Error::CategoryNotInRestaurant);
                }
            }

            unlink_categories(&mut *tx, &dish.id).await?;
            link_categories(&mut *tx, &dish.id, category_ids).await?;
        }

        let dish = update_by_id(&mut *tx, &dish.id, &payload).await?;
        let rows = find_category_rows(&mut *tx, &[dish.id.clone()]).await?;

        tx.commit()
            .await
            .map_err(|err| unexpected("Failed to commit database transaction", err))?;

        Ok(with_categories(vec![dish], rows).pop())
    }

    async fn delete_dish_by_id_and_owner_id(&self, id: &str, owner_id: &str) -> Result<bool> {
        delete_by_id_and_owner_id(&self.pool, id, owner_id).await
    }
}

fn categories_in_memory(tables: &Tables, dish_id: &str) -> Vec<CategorySummary> {
    tables
        .dish_categories
        .iter()
        .filter(|dc| dc.dish_id == dish_id)
        .filter_map(|dc| tables.categories.iter().find(|c| c.id == dc.category_id))
        .sorted_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)))
        .map(|c| CategorySummary {
            id: c.id.clone(),
            name: c.name.clone(),
        })
        .collect()
}

fn all_in_restaurant(tables: &Tables, category_ids: &[String], restaurant_id: &str) -> bool {
    category_ids.iter().all(|category_id| {
        tables
            .categories
            .iter()
            .any(|c| &c.id == category_id && c.restaurant_id == restaurant_id)
    })
}

fn owned_by(tables: &Tables, dish: &Dish, owner_id: &str) -> bool {
    tables
        .restaurants
        .iter()
        .any(|r| r.id == dish.restaurant_id && r.owner_id == owner_id)
}

#[async_trait]
impl DishRepository for MemoryDatabase {
    async fn create_dish(&self, payload: CreateDishPayload) -> Result<DishWithCategories> {
        let mut tables = self.tables.write().await;

        if !tables
            .restaurants
            .iter()
            .any(|r| r.id == payload.restaurant_id)
        {
            tracing::error!(
                "Error occurred while trying to create a dish: restaurant {} does not exist",
                payload.restaurant_id
            );
            return Err(Error::UnexpectedError);
        }

        if !all_in_restaurant(&tables, &payload.category_ids, &payload.restaurant_id) {
            return Err(Error::CategoryNotInRestaurant);
        }

        let dish = Dish {
            id: Ulid::new().to_string(),
            name: payload.name,
            description: payload.description,
            image_url: payload.image_url,
            spice_level: payload.spice_level,
            price: payload.price,
            is_vegetarian: payload.is_vegetarian,
            restaurant_id: payload.restaurant_id,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };
        tables.dishes.push(dish.clone());
        for category_id in payload.category_ids {
            tables.dish_categories.push(DishCategory {
                dish_id: dish.id.clone(),
                category_id,
            });
        }

        Ok(DishWithCategories {
            categories: categories_in_memory(&tables, &dish.id),
            dish,
        })
    }

    async fn find_dishes_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<DishWithCategories>> {
        let tables = self.tables.read().await;

        Ok(tables
            .dishes
            .iter()
            .rev()
            .filter(|d| d.restaurant_id == restaurant_id)
            .map(|dish| DishWithCategories {
                categories: categories_in_memory(&tables, &dish.id),
                dish: dish.clone(),
            })
            .collect())
    }

    async fn update_dish_by_id_and_owner_id(
        &self,
        id: &str,
        owner_id: &str,
        payload: UpdateDishPayload,
    ) -> Result<Option<DishWithCategories>> {
        let mut tables = self.tables.write().await;

        let Some(position) = tables
            .dishes
            .iter()
            .position(|d| d.id == id && owned_by(&tables, d, owner_id))
        else {
            return Ok(None);
        };
        let restaurant_id = tables.dishes[position].restaurant_id.clone();

        if let Some(category_ids) = &payload.category_ids {
            if !all_in_restaurant(&tables, category_ids, &restaurant_id) {
                return Err(Error::CategoryNotInRestaurant);
            }
        }

        let dish = &mut tables.dishes[position];
        if let Some(name) = payload.name {
            dish.name = name;
        }
        if let Some(description) = payload.description {
            dish.description = description;
        }
        if let Some(image_url) = payload.image_url {
            dish.image_url = image_url;
        }
        if let Some(spice_level) = payload.spice_level {
            dish.spice_level = spice_level;
        }
        if let Some(price) = payload.price {
            dish.price = price;
        }
        if let Some(is_vegetarian) = payload.is_vegetarian {
            dish.is_vegetarian = is_vegetarian;
        }
        dish.updated_at = Some(Utc::now().naive_utc());
        let dish = dish.clone();

        if let Some(category_ids) = payload.category_ids {
            tables.dish_categories.retain(|dc| dc.dish_id != dish.id);
            for category_id in category_ids {
                tables.dish_categories.push(DishCategory {
                    dish_id: dish.id.clone(),
                    category_id,
                });
            }
        }

        Ok(Some(DishWithCategories {
            categories: categories_in_memory(&tables, &dish.id),
            dish,
        }))
    }

    async fn delete_dish_by_id_and_owner_id(&self, id: &str, owner_id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;

        let Some(position) = tables
            .dishes
            .iter()
            .position(|d| d.id == id && owned_by(&tables, d, owner_id))
        else {
            return Ok(false);
        };

        tables.dishes.remove(position);
        tables.dish_categories.retain(|dc| dc.dish_id != id);

        Ok(true)
    }
}
