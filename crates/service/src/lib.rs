//! Service layer providing the business operations of the restaurant API.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Enforces the access policy before any mutation.

pub mod errors;
pub mod auth;
pub mod policy;
pub mod repository;
pub mod repo;
pub mod user_service;
pub mod restaurant_service;
#[cfg(test)]
pub mod test_support;

pub use restaurant_service::{RestaurantPatch, RestaurantService};
pub use user_service::{UserPatch, UserService};
