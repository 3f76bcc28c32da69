use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::debug;

use models::errors::ModelError;
use models::restaurant::{self, NewRestaurant};
use models::user::{self, Role};

use crate::errors::ServiceError;
use crate::repository::{RestaurantChanges, RestaurantRepository, UserChanges, UserRepository};

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[derive(Clone)]
pub struct SeaOrmRestaurantRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_live(&self.db, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(ModelError::from)?;
        Ok(found)
    }

    async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ServiceError> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(user::Column::Id.ne(id));
        }
        let n = query.count(&self.db).await.map_err(ModelError::from)?;
        Ok(n > 0)
    }

    async fn create(&self, name: &str, email: &str, password_hash: String, role: Role) -> Result<user::Model, ServiceError> {
        Ok(user::create(&self.db, name, email, password_hash, role).await?)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError> {
        let found = user::find_live(&self.db, id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
        let mut am: user::ActiveModel = found.into();
        if let Some(name) = changes.name { am.name = Set(name); }
        if let Some(email) = changes.email { am.email = Set(email); }
        if let Some(hash) = changes.password_hash { am.password_hash = Set(hash); }
        if let Some(role) = changes.role { am.role = Set(role.as_str().to_string()); }
        am.updated_at = Set(Utc::now().into());
        Ok(am.update(&self.db).await.map_err(ModelError::from)?)
    }

    async fn soft_delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(ModelError::from)?;
        if user::find_live(&txn, id).await?.is_none() {
            return Err(ServiceError::not_found("user"));
        }
        user::soft_delete(&txn, id).await?;
        let cascaded = restaurant::soft_delete_by_user(&txn, id).await?;
        txn.commit().await.map_err(ModelError::from)?;
        debug!(user_id = id, restaurants = cascaded, "user soft-deleted");
        Ok(())
    }
}

#[async_trait]
impl RestaurantRepository for SeaOrmRestaurantRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<restaurant::Model>, ServiceError> {
        Ok(restaurant::find_live(&self.db, id).await?)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<restaurant::Model>, ServiceError> {
        Ok(restaurant::list_live_by_user(&self.db, user_id).await?)
    }

    async fn create(&self, user_id: i32, input: &NewRestaurant) -> Result<restaurant::Model, ServiceError> {
        Ok(restaurant::create(&self.db, user_id, input).await?)
    }

    async fn update(&self, id: i32, changes: RestaurantChanges) -> Result<restaurant::Model, ServiceError> {
        let found = restaurant::find_live(&self.db, id).await?.ok_or_else(|| ServiceError::not_found("restaurant"))?;
        let mut am: restaurant::ActiveModel = found.into();
        if let Some(name) = changes.name { am.name = Set(name); }
        if let Some(description) = changes.description { am.description = Set(description); }
        if let Some(address) = changes.address { am.address = Set(address); }
        if let Some(phone) = changes.phone { am.phone = Set(phone); }
        am.updated_at = Set(Utc::now().into());
        Ok(am.update(&self.db).await.map_err(ModelError::from)?)
    }

    async fn soft_delete(&self, id: i32) -> Result<(), ServiceError> {
        if restaurant::find_live(&self.db, id).await?.is_none() {
            return Err(ServiceError::not_found("restaurant"));
        }
        Ok(restaurant::soft_delete(&self.db, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn unique_email() -> String {
        format!("repo_{}@example.com", uuid::Uuid::new_v4().simple())
    }

    #[tokio::test]
    async fn user_repository_lifecycle() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let users = SeaOrmUserRepository { db: db.clone() };
        let restaurants = SeaOrmRestaurantRepository { db: db.clone() };

        let email = unique_email();
        let u = users.create("Repo User", &email, "$argon2id$fake".into(), Role::User).await?;
        assert!(users.email_taken(&email, None).await?);
        assert!(!users.email_taken(&email, Some(u.id)).await?);
        assert_eq!(users.find_by_email(&email).await?.map(|f| f.id), Some(u.id));

        let changed = users
            .update(u.id, UserChanges { name: Some("Renamed".into()), ..Default::default() })
            .await?;
        assert_eq!(changed.name, "Renamed");
        assert_eq!(changed.email, email);

        let r = restaurants
            .create(u.id, &NewRestaurant { name: "Cafe".into(), address: "1 Main St".into(), ..Default::default() })
            .await?;
        users.soft_delete(u.id).await?;

        assert!(users.find_by_id(u.id).await?.is_none());
        assert!(users.find_by_email(&email).await?.is_none());
        assert!(restaurants.find_by_id(r.id).await?.is_none());
        // deleted rows still reserve their email
        assert!(users.email_taken(&email, None).await?);
        assert!(matches!(users.soft_delete(u.id).await, Err(ServiceError::NotFound(_))));

        restaurant::hard_delete(&db, r.id).await?;
        user::hard_delete(&db, u.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let users = SeaOrmUserRepository { db: db.clone() };

        let email = unique_email();
        let first = users.create("First", &email, "h".into(), Role::User).await?;
        let second = users.create("Second", &email, "h".into(), Role::User).await;
        assert!(matches!(second, Err(ServiceError::Conflict(_))));

        user::hard_delete(&db, first.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn restaurant_update_touches_only_given_fields() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let users = SeaOrmUserRepository { db: db.clone() };
        let restaurants = SeaOrmRestaurantRepository { db: db.clone() };

        let u = users.create("Owner", &unique_email(), "h".into(), Role::User).await?;
        let r = restaurants
            .create(u.id, &NewRestaurant { name: "Old".into(), address: "Addr".into(), phone: "555".into(), ..Default::default() })
            .await?;
        let updated = restaurants
            .update(r.id, RestaurantChanges { name: Some("New".into()), ..Default::default() })
            .await?;
        assert_eq!(updated.name, "New");
        assert_eq!(updated.address, "Addr");
        assert_eq!(updated.phone, "555");

        restaurants.soft_delete(r.id).await?;
        assert!(restaurants.list_by_user(u.id).await?.is_empty());

        restaurant::hard_delete(&db, r.id).await?;
        user::hard_delete(&db, u.id).await?;
        Ok(())
    }
}
