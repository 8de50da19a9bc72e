use super::types::{request, response};
use crate::{
    modules::{
        category::repository::{Category, CategoryRepository},
        dish::repository::{DishRepository, DishWithCategories},
        restaurant::repository::{Restaurant, RestaurantRepository},
    },
    types::Context,
};
use std::sync::Arc;

/// Nests dishes under every category they belong to. Dishes without a
/// category do not appear on the menu.
fn project(
    restaurant: Restaurant,
    categories: Vec<Category>,
    dishes: Vec<DishWithCategories>,
) -> response::Menu {
    response::Menu {
        restaurant: response::MenuRestaurant {
            id: restaurant.id,
            name: restaurant.name,
            location: restaurant.location,
        },
        categories: categories
            .into_iter()
            .map(|category| response::MenuCategory {
                dishes: dishes
                    .iter()
                    .filter(|d| d.categories.iter().any(|c| c.id == category.id))
                    .map(|d| response::MenuDish {
                        id: d.dish.id.clone(),
                        name: d.dish.name.clone(),
                        description: d.dish.description.clone(),
                        image_url: d.dish.image_url.clone(),
                        spice_level: d.dish.spice_level,
                        price: d.dish.price.clone(),
                        is_vegetarian: d.dish.is_vegetarian,
                        categories: d.categories.clone(),
                    })
                    .collect(),
                id: category.id,
                name: category.name,
            })
            .collect(),
    }
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let restaurant = ctx
        .db_conn
        .find_restaurant_by_id(&payload.restaurant_id)
        .await
        .map_err(|_| response::Error::FailedToFetchMenu)?
        .ok_or(response::Error::RestaurantNotFound)?;

    let categories = ctx
        .db_conn
        .find_categories_by_restaurant_id(&restaurant.id)
        .await
        .map_err(|_| response::Error::FailedToFetchMenu)?;

    let dishes = ctx
        .db_conn
        .find_dishes_by_restaurant_id(&restaurant.id)
        .await
        .map_err(|_| response::Error::FailedToFetchMenu)?;

    Ok(response::Success::Menu(project(restaurant, categories, dishes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::dish::repository::{CategorySummary, Dish};
    use chrono::Utc;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            restaurant_id: String::from("r1"),
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    fn dish(id: &str, categories: &[(&str, &str)]) -> DishWithCategories {
        DishWithCategories {
            dish: Dish {
                id: id.to_string(),
                name: format!("Dish {id}"),
                description: String::from("Good"),
                image_url: None,
                spice_level: Some(2),
                price: None,
                is_vegetarian: true,
                restaurant_id: String::from("r1"),
                created_at: Utc::now().naive_utc(),
                updated_at: None,
            },
            categories: categories
                .iter()
                .map(|(id, name)| CategorySummary {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn lists_shared_dishes_under_each_category() {
        let restaurant = Restaurant {
            id: String::from("r1"),
            name: String::from("Trattoria"),
            location: String::from("Rome"),
            owner_id: String::from("u1"),
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };

        let menu = project(
            restaurant,
            vec![category("c1", "Mains"), category("c2", "Specials")],
            vec![
                dish("d1", &[("c1", "Mains"), ("c2", "Specials")]),
                dish("d2", &[("c1", "Mains")]),
                dish("d3", &[]),
            ],
        );

        assert_eq!(menu.restaurant.name, "Trattoria");
        assert_eq!(menu.categories.len(), 2);
        assert_eq!(
            menu.categories[0]
                .dishes
                .iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>(),
            vec!["d1", "d2"]
        );
        assert_eq!(menu.categories[1].dishes.len(), 1);
        assert_eq!(menu.categories[1].dishes[0].categories.len(), 2);
    }
}
