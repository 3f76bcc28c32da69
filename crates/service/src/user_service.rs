use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use models::user::{self, Role};

use crate::auth::credentials::hash_password;
use crate::auth::domain::Principal;
use crate::errors::ServiceError;
use crate::policy;
use crate::repository::{UserChanges, UserRepository};

/// Partial user update. Absent and empty fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

pub(crate) fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    async fn load(&self, id: i32) -> Result<user::Model, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn get(&self, principal: &Principal, id: i32) -> Result<user::Model, ServiceError> {
        let found = self.load(id).await?;
        policy::authorize(principal, found.id)?;
        Ok(found)
    }

    /// Apply the non-empty fields of `patch`. Only admins may touch `role`.
    #[instrument(skip(self, patch), fields(principal_id = principal.id))]
    pub async fn update(&self, principal: &Principal, id: i32, patch: UserPatch) -> Result<user::Model, ServiceError> {
        let current = self.load(id).await?;
        let role = supplied(patch.role);
        if role.is_some() {
            policy::authorize_role_change(principal)?;
        }
        policy::authorize(principal, current.id)?;

        let mut changes = UserChanges::default();
        if let Some(name) = supplied(patch.name) {
            user::validate_name(&name)?;
            changes.name = Some(name.trim().to_string());
        }
        if let Some(email) = supplied(patch.email) {
            let email = user::normalize_email(&email);
            user::validate_email(&email)?;
            if email != current.email {
                if self.repo.email_taken(&email, Some(id)).await? {
                    return Err(ServiceError::Conflict("user with this email already exists".into()));
                }
                changes.email = Some(email);
            }
        }
        if let Some(password) = supplied(patch.password) {
            user::validate_password(&password)?;
            changes.password_hash = Some(hash_password(&password)?);
        }
        if let Some(role) = role {
            changes.role = Some(role.trim().parse::<Role>()?);
        }

        if changes == UserChanges::default() {
            return Ok(current);
        }
        let updated = self.repo.update(id, changes).await?;
        info!(user_id = updated.id, "user_updated");
        Ok(updated)
    }

    /// Soft-delete a user; their restaurants go with them.
    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete(&self, principal: &Principal, id: i32) -> Result<(), ServiceError> {
        let found = self.load(id).await?;
        policy::authorize(principal, found.id)?;
        self.repo.soft_delete(id).await?;
        info!(user_id = id, "user_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::verify_password;
    use crate::repository::mock::MemoryStore;
    use crate::repository::RestaurantRepository;
    use models::restaurant::NewRestaurant;

    async fn seed(store: &MemoryStore, email: &str, role: Role) -> user::Model {
        UserRepository::create(store, "Seeded", email, hash_password("Original1").unwrap(), role).await.unwrap()
    }

    fn fixture() -> (Arc<MemoryStore>, UserService<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (store.clone(), UserService::new(store))
    }

    #[tokio::test]
    async fn owner_reads_self_and_others_are_forbidden() {
        let (store, svc) = fixture();
        let a = seed(&store, "a@example.com", Role::User).await;
        let b = seed(&store, "b@example.com", Role::User).await;
        let admin = seed(&store, "root@example.com", Role::Admin).await;

        assert_eq!(svc.get(&Principal::new(a.id, Role::User), a.id).await.unwrap().id, a.id);
        assert!(matches!(svc.get(&Principal::new(b.id, Role::User), a.id).await, Err(ServiceError::Forbidden(_))));
        assert!(svc.get(&Principal::new(admin.id, Role::Admin), a.id).await.is_ok());
    }

    #[tokio::test]
    async fn missing_user_is_not_found_before_policy() {
        let (_store, svc) = fixture();
        let stranger = Principal::new(1, Role::User);
        assert!(matches!(svc.get(&stranger, 404).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(&stranger, 404).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn partial_update_changes_only_supplied_fields() {
        let (store, svc) = fixture();
        let u = seed(&store, "p@example.com", Role::User).await;
        let me = Principal::new(u.id, Role::User);

        let patch = UserPatch { name: Some("New Name".into()), email: Some("".into()), ..Default::default() };
        let updated = svc.update(&me, u.id, patch).await.unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, "p@example.com");
        assert_eq!(updated.password_hash, u.password_hash);
        assert_eq!(updated.role, "user");
    }

    #[tokio::test]
    async fn password_change_is_rehashed() {
        let (store, svc) = fixture();
        let u = seed(&store, "pw@example.com", Role::User).await;
        let patch = UserPatch { password: Some("Changed123".into()), ..Default::default() };
        let updated = svc.update(&Principal::new(u.id, Role::User), u.id, patch).await.unwrap();
        assert!(verify_password("Changed123", &updated.password_hash));
        assert!(!verify_password("Original1", &updated.password_hash));
    }

    #[tokio::test]
    async fn role_change_requires_admin_even_for_self() {
        let (store, svc) = fixture();
        let u = seed(&store, "r@example.com", Role::User).await;
        let patch = UserPatch { role: Some("admin".into()), ..Default::default() };
        let err = svc.update(&Principal::new(u.id, Role::User), u.id, patch.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let admin = seed(&store, "boss@example.com", Role::Admin).await;
        let promoted = svc.update(&Principal::new(admin.id, Role::Admin), u.id, patch).await.unwrap();
        assert_eq!(promoted.role(), Role::Admin);
    }

    #[tokio::test]
    async fn unknown_role_is_a_validation_error() {
        let (store, svc) = fixture();
        let admin = seed(&store, "adm@example.com", Role::Admin).await;
        let patch = UserPatch { role: Some("superuser".into()), ..Default::default() };
        let err = svc.update(&Principal::new(admin.id, Role::Admin), admin.id, patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn email_change_to_taken_address_conflicts() {
        let (store, svc) = fixture();
        let a = seed(&store, "one@example.com", Role::User).await;
        seed(&store, "two@example.com", Role::User).await;
        let patch = UserPatch { email: Some("two@example.com".into()), ..Default::default() };
        let err = svc.update(&Principal::new(a.id, Role::User), a.id, patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let shouted = UserPatch { email: Some("TWO@Example.com".into()), ..Default::default() };
        let err = svc.update(&Principal::new(a.id, Role::User), a.id, shouted).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // keeping one's own address is not a conflict
        let same = UserPatch { email: Some("one@example.com".into()), ..Default::default() };
        assert!(svc.update(&Principal::new(a.id, Role::User), a.id, same).await.is_ok());
    }

    #[tokio::test]
    async fn delete_cascades_to_restaurants() {
        let (store, svc) = fixture();
        let u = seed(&store, "d@example.com", Role::User).await;
        let input = NewRestaurant { name: "Diner".into(), address: "2 Side St".into(), ..Default::default() };
        let r = RestaurantRepository::create(store.as_ref(), u.id, &input).await.unwrap();

        svc.delete(&Principal::new(u.id, Role::User), u.id).await.unwrap();

        assert!(matches!(svc.get(&Principal::new(u.id, Role::Admin), u.id).await, Err(ServiceError::NotFound(_))));
        assert!(RestaurantRepository::find_by_id(store.as_ref(), r.id).await.unwrap().is_none());
        assert!(store.raw_user(u.id).unwrap().deleted_at.is_some());
        // a second delete finds nothing
        assert!(matches!(svc.delete(&Principal::new(u.id, Role::Admin), u.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let (store, svc) = fixture();
        let a = seed(&store, "x@example.com", Role::User).await;
        let b = seed(&store, "y@example.com", Role::User).await;
        assert!(matches!(svc.delete(&Principal::new(b.id, Role::User), a.id).await, Err(ServiceError::Forbidden(_))));
        assert!(store.raw_user(a.id).unwrap().deleted_at.is_none());
    }
}
