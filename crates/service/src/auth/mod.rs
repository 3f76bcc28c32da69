//! Auth module: credential primitives (password hashing, signed tokens) and
//! the registration/login service built on them.

pub mod credentials;
pub mod domain;
pub mod errors;
pub mod service;
pub mod token;

pub use domain::{Claims, Principal};
pub use service::{AuthConfig, AuthService};
