use crate::modules::{
    auth::repository::{session::Session, verification_code::VerificationCode},
    category::repository::Category,
    dish::repository::{Dish, DishCategory},
    restaurant::repository::Restaurant,
    user::repository::User,
};
use tokio::sync::RwLock;

#[derive(Default)]
pub(crate) struct Tables {
    pub users: Vec<User>,
    pub verification_codes: Vec<VerificationCode>,
    pub sessions: Vec<Session>,
    pub restaurants: Vec<Restaurant>,
    pub categories: Vec<Category>,
    pub dishes: Vec<Dish>,
    pub dish_categories: Vec<DishCategory>,
}

/// In-process store with the same semantics as the Postgres schema.
///
/// Rows keep insertion order, so "newest first" listings walk the vectors
/// backwards. A single lock guards all tables, which gives every repository
/// call the isolation of a database transaction.
#[derive(Default)]
pub struct MemoryDatabase {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}
