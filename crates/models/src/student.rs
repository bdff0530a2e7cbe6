use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub course: String,
    pub batch: String,
    pub grade: String,
    pub date_of_admission: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column values written on insert and full replacement.
/// Callers hand in already validated and normalised text.
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch: String,
    pub grade: String,
    pub date_of_admission: Date,
}

pub async fn create(
    db: &DatabaseConnection,
    id: Uuid,
    fields: Fields,
    now: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(id),
        name: Set(fields.name),
        email: Set(fields.email),
        course: Set(fields.course),
        batch: Set(fields.batch),
        grade: Set(fields.grade),
        date_of_admission: Set(fields.date_of_admission),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// All rows, oldest first.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Overwrite every mutable column; `created_at` is left alone.
pub async fn replace(
    db: &DatabaseConnection,
    id: Uuid,
    fields: Fields,
    now: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let existing = Entity::find_by_id(id).one(db).await?.ok_or(ModelError::NotFound)?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(fields.name);
    am.email = Set(fields.email);
    am.course = Set(fields.course);
    am.batch = Set(fields.batch);
    am.grade = Set(fields.grade);
    am.date_of_admission = Set(fields.date_of_admission);
    am.updated_at = Set(now);
    Ok(am.update(db).await?)
}

/// Returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
