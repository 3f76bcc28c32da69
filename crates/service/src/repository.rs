use async_trait::async_trait;

use models::restaurant::{self, NewRestaurant};
use models::user::{self, Role};

use crate::errors::ServiceError;

/// Resolved changes to a user row; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Resolved changes to a restaurant row; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// User persistence. Lookups only ever return live (not soft-deleted) rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError>;
    /// Whether any row, deleted or not, other than `except` uses `email`.
    async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ServiceError>;
    async fn create(&self, name: &str, email: &str, password_hash: String, role: Role) -> Result<user::Model, ServiceError>;
    async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError>;
    /// Soft-delete the user together with all of their live restaurants.
    async fn soft_delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// Restaurant persistence. Lookups only ever return live rows.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<restaurant::Model>, ServiceError>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<restaurant::Model>, ServiceError>;
    async fn create(&self, user_id: i32, input: &NewRestaurant) -> Result<restaurant::Model, ServiceError>;
    async fn update(&self, id: i32, changes: RestaurantChanges) -> Result<restaurant::Model, ServiceError>;
    async fn soft_delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// Simple in-memory store for tests and doc examples.
///
/// One value backs both repositories so that deleting a user can cascade to
/// their restaurants exactly as the database-backed store does.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    #[derive(Default)]
    struct Tables {
        users: BTreeMap<i32, user::Model>,
        restaurants: BTreeMap<i32, restaurant::Model>,
        next_user_id: i32,
        next_restaurant_id: i32,
    }

    #[derive(Default)]
    pub struct MemoryStore {
        tables: Mutex<Tables>,
    }

    impl MemoryStore {
        fn lock(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
            self.tables.lock().map_err(|_| ServiceError::Db("memory store lock poisoned".into()))
        }

        /// Every stored restaurant row including soft-deleted ones.
        pub fn all_restaurants(&self) -> Vec<restaurant::Model> {
            self.lock().map(|t| t.restaurants.values().cloned().collect()).unwrap_or_default()
        }

        /// Raw user row regardless of deletion state.
        pub fn raw_user(&self, id: i32) -> Option<user::Model> {
            self.lock().ok().and_then(|t| t.users.get(&id).cloned())
        }
    }

    #[async_trait]
    impl UserRepository for MemoryStore {
        async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
            let t = self.lock()?;
            Ok(t.users.get(&id).filter(|u| !u.is_deleted()).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
            let t = self.lock()?;
            Ok(t.users.values().find(|u| u.email == email && !u.is_deleted()).cloned())
        }

        async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ServiceError> {
            let t = self.lock()?;
            Ok(t.users.values().any(|u| u.email == email && Some(u.id) != except))
        }

        async fn create(&self, name: &str, email: &str, password_hash: String, role: Role) -> Result<user::Model, ServiceError> {
            let email = user::normalize_email(email);
            let mut t = self.lock()?;
            if t.users.values().any(|u| u.email == email) {
                return Err(ServiceError::Conflict("user with this email already exists".into()));
            }
            t.next_user_id += 1;
            let now = Utc::now().into();
            let u = user::Model {
                id: t.next_user_id,
                name: name.trim().to_string(),
                email,
                password_hash,
                role: role.as_str().to_string(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            t.users.insert(u.id, u.clone());
            Ok(u)
        }

        async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError> {
            let mut t = self.lock()?;
            if let Some(email) = &changes.email {
                if t.users.values().any(|u| &u.email == email && u.id != id) {
                    return Err(ServiceError::Conflict("user with this email already exists".into()));
                }
            }
            let u = t.users.get_mut(&id).filter(|u| !u.is_deleted()).ok_or_else(|| ServiceError::not_found("user"))?;
            if let Some(name) = changes.name { u.name = name; }
            if let Some(email) = changes.email { u.email = email; }
            if let Some(hash) = changes.password_hash { u.password_hash = hash; }
            if let Some(role) = changes.role { u.role = role.as_str().to_string(); }
            u.updated_at = Utc::now().into();
            Ok(u.clone())
        }

        async fn soft_delete(&self, id: i32) -> Result<(), ServiceError> {
            let mut t = self.lock()?;
            let now = Utc::now().into();
            let u = t.users.get_mut(&id).filter(|u| !u.is_deleted()).ok_or_else(|| ServiceError::not_found("user"))?;
            u.deleted_at = Some(now);
            u.updated_at = now;
            for r in t.restaurants.values_mut().filter(|r| r.user_id == id && !r.is_deleted()) {
                r.deleted_at = Some(now);
                r.updated_at = now;
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RestaurantRepository for MemoryStore {
        async fn find_by_id(&self, id: i32) -> Result<Option<restaurant::Model>, ServiceError> {
            let t = self.lock()?;
            Ok(t.restaurants.get(&id).filter(|r| !r.is_deleted()).cloned())
        }

        async fn list_by_user(&self, user_id: i32) -> Result<Vec<restaurant::Model>, ServiceError> {
            let t = self.lock()?;
            Ok(t.restaurants.values().filter(|r| r.user_id == user_id && !r.is_deleted()).cloned().collect())
        }

        async fn create(&self, user_id: i32, input: &NewRestaurant) -> Result<restaurant::Model, ServiceError> {
            input.validate()?;
            let mut t = self.lock()?;
            if !t.users.contains_key(&user_id) {
                return Err(ServiceError::Db(format!("foreign key violation: user {user_id} does not exist")));
            }
            t.next_restaurant_id += 1;
            let now = Utc::now().into();
            let r = restaurant::Model {
                id: t.next_restaurant_id,
                name: input.name.trim().to_string(),
                description: input.description.clone(),
                address: input.address.clone(),
                phone: input.phone.clone(),
                user_id,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            t.restaurants.insert(r.id, r.clone());
            Ok(r)
        }

        async fn update(&self, id: i32, changes: RestaurantChanges) -> Result<restaurant::Model, ServiceError> {
            let mut t = self.lock()?;
            let r = t.restaurants.get_mut(&id).filter(|r| !r.is_deleted()).ok_or_else(|| ServiceError::not_found("restaurant"))?;
            if let Some(name) = changes.name { r.name = name; }
            if let Some(description) = changes.description { r.description = description; }
            if let Some(address) = changes.address { r.address = address; }
            if let Some(phone) = changes.phone { r.phone = phone; }
            r.updated_at = Utc::now().into();
            Ok(r.clone())
        }

        async fn soft_delete(&self, id: i32) -> Result<(), ServiceError> {
            let mut t = self.lock()?;
            let r = t.restaurants.get_mut(&id).filter(|r| !r.is_deleted()).ok_or_else(|| ServiceError::not_found("restaurant"))?;
            let now = Utc::now().into();
            r.deleted_at = Some(now);
            r.updated_at = now;
            Ok(())
        }
    }
}
