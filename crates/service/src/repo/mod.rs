pub mod seaorm;

pub use seaorm::{SeaOrmRestaurantRepository, SeaOrmUserRepository};
