//! SeaORM entities and field rules for users and their restaurants.

pub mod errors;
pub mod db;
pub mod user;
pub mod restaurant;
