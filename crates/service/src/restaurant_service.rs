use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use models::restaurant::{self, NewRestaurant};

use crate::auth::domain::Principal;
use crate::errors::ServiceError;
use crate::policy;
use crate::repository::{RestaurantChanges, RestaurantRepository, UserRepository};
use crate::user_service::supplied;

/// Partial restaurant update. Absent and empty fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl RestaurantPatch {
    fn into_changes(self) -> Result<RestaurantChanges, ServiceError> {
        let mut changes = RestaurantChanges::default();
        if let Some(name) = supplied(self.name) {
            restaurant::validate_name(&name)?;
            changes.name = Some(name.trim().to_string());
        }
        if let Some(description) = supplied(self.description) {
            restaurant::validate_description(&description)?;
            changes.description = Some(description);
        }
        if let Some(address) = supplied(self.address) {
            restaurant::validate_address(&address)?;
            changes.address = Some(address);
        }
        if let Some(phone) = supplied(self.phone) {
            restaurant::validate_phone(&phone)?;
            changes.phone = Some(phone);
        }
        Ok(changes)
    }
}

pub struct RestaurantService<RR: RestaurantRepository + ?Sized, UR: UserRepository + ?Sized> {
    restaurants: Arc<RR>,
    users: Arc<UR>,
}

impl<RR: RestaurantRepository + ?Sized, UR: UserRepository + ?Sized> RestaurantService<RR, UR> {
    pub fn new(restaurants: Arc<RR>, users: Arc<UR>) -> Self { Self { restaurants, users } }

    async fn ensure_user(&self, id: i32) -> Result<(), ServiceError> {
        match self.users.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("user")),
        }
    }

    async fn load(&self, id: i32) -> Result<restaurant::Model, ServiceError> {
        self.restaurants.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("restaurant"))
    }

    /// Create a restaurant owned by the caller.
    #[instrument(skip(self, input), fields(principal_id = principal.id))]
    pub async fn create(&self, principal: &Principal, input: NewRestaurant) -> Result<restaurant::Model, ServiceError> {
        self.ensure_user(principal.id).await?;
        input.validate()?;
        let created = self.restaurants.create(principal.id, &input).await?;
        info!(restaurant_id = created.id, "restaurant_created");
        Ok(created)
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn list_for_user(&self, principal: &Principal, user_id: i32) -> Result<Vec<restaurant::Model>, ServiceError> {
        self.ensure_user(user_id).await?;
        policy::authorize(principal, user_id)?;
        self.restaurants.list_by_user(user_id).await
    }

    /// A restaurant reached through its owner; one owned by someone else is reported missing.
    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn get_for_user(&self, principal: &Principal, user_id: i32, id: i32) -> Result<restaurant::Model, ServiceError> {
        self.ensure_user(user_id).await?;
        policy::authorize(principal, user_id)?;
        let found = self.load(id).await?;
        if found.user_id != user_id {
            return Err(ServiceError::not_found("restaurant"));
        }
        Ok(found)
    }

    #[instrument(skip(self, patch), fields(principal_id = principal.id))]
    pub async fn update(&self, principal: &Principal, id: i32, patch: RestaurantPatch) -> Result<restaurant::Model, ServiceError> {
        let current = self.load(id).await?;
        policy::authorize(principal, current.user_id)?;
        let changes = patch.into_changes()?;
        if changes == RestaurantChanges::default() {
            return Ok(current);
        }
        let updated = self.restaurants.update(id, changes).await?;
        info!(restaurant_id = updated.id, "restaurant_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete(&self, principal: &Principal, id: i32) -> Result<(), ServiceError> {
        let current = self.load(id).await?;
        policy::authorize(principal, current.user_id)?;
        self.restaurants.soft_delete(id).await?;
        info!(restaurant_id = id, "restaurant_deleted");
        Ok(())
    }
}
