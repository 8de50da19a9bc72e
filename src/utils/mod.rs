pub mod database;
pub mod json;
pub mod nullable;
pub mod validation;
