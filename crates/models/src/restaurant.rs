use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 1000;
pub const ADDRESS_MAX: usize = 200;
pub const PHONE_MAX: usize = 20;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub user_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Restaurant fields supplied by a caller; the owner comes separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let len = name.trim().chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ModelError::Validation(format!("name must be {NAME_MIN}-{NAME_MAX} characters")));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ModelError> {
    check_len("description", description, DESCRIPTION_MAX)
}

pub fn validate_address(address: &str) -> Result<(), ModelError> {
    check_len("address", address, ADDRESS_MAX)
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    check_len("phone", phone, PHONE_MAX)
}

impl NewRestaurant {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        if self.address.trim().is_empty() {
            return Err(ModelError::Validation("address required".into()));
        }
        validate_address(&self.address)?;
        validate_description(&self.description)?;
        validate_phone(&self.phone)
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, user_id: i32, input: &NewRestaurant) -> Result<Model, ModelError> {
    input.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Default::default(),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description.clone()),
        address: Set(input.address.clone()),
        phone: Set(input.phone.clone()),
        user_id: Set(user_id),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

/// Live (not soft-deleted) restaurant by id.
pub async fn find_live<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).filter(Column::DeletedAt.is_null()).one(db).await?)
}

/// Live restaurants of one owner, oldest first.
pub async fn list_live_by_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::Validation("restaurant not found".into()))?.into();
    let now = Utc::now().into();
    found.deleted_at = Set(Some(now));
    found.updated_at = Set(now);
    found.update(db).await?;
    Ok(())
}

/// Soft-delete every live restaurant of `user_id`; returns the number of rows touched.
pub async fn soft_delete_by_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::DeletedAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
