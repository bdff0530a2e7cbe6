use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::errors::ModelError;
use models::student;

use crate::student::clock::{Clock, SystemClock};
use crate::student::domain::{Grade, NewStudent, Student};
use crate::student::repository::{StoreError, StudentRepository};

/// SeaORM-backed repository; the `uniq_student_email` index is the atomic uniqueness guarantee.
pub struct SeaOrmStudentRepository {
    pub db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SeaOrmStudentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

fn to_fields(s: NewStudent) -> student::Fields {
    student::Fields {
        name: s.name,
        email: s.email,
        course: s.course,
        batch: s.batch,
        grade: s.grade.as_str().to_string(),
        date_of_admission: s.date_of_admission,
    }
}

fn to_domain(m: student::Model) -> Result<Student, StoreError> {
    let grade = Grade::parse(&m.grade)
        .ok_or_else(|| StoreError::Unavailable(format!("row {} holds unknown grade {:?}", m.id, m.grade)))?;
    Ok(Student {
        id: m.id,
        name: m.name,
        email: m.email,
        course: m.course,
        batch: m.batch,
        grade,
        date_of_admission: m.date_of_admission,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    })
}

fn map_err(e: ModelError, email: &str) -> StoreError {
    match e {
        ModelError::Duplicate(_) => StoreError::Duplicate { email: email.to_string() },
        ModelError::NotFound => StoreError::NotFound,
        ModelError::Db(msg) => StoreError::Unavailable(msg),
    }
}

#[async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn insert(&self, fields: NewStudent) -> Result<Student, StoreError> {
        let email = fields.email.clone();
        let now = self.clock.now().fixed_offset();
        let created = student::create(&self.db, Uuid::new_v4(), to_fields(fields), now)
            .await
            .map_err(|e| map_err(e, &email))?;
        to_domain(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        let found = student::find(&self.db, id).await.map_err(|e| map_err(e, ""))?;
        found.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let found = student::find_by_email(&self.db, email).await.map_err(|e| map_err(e, email))?;
        found.map(to_domain).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let rows = student::list(&self.db).await.map_err(|e| map_err(e, ""))?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn update_by_id(&self, id: Uuid, fields: NewStudent) -> Result<Student, StoreError> {
        let email = fields.email.clone();
        let now = self.clock.now().fixed_offset();
        let updated = student::replace(&self.db, id, to_fields(fields), now)
            .await
            .map_err(|e| map_err(e, &email))?;
        to_domain(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        match student::delete(&self.db, id).await.map_err(|e| map_err(e, "")) {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::NotFound),
            Err(e) => Err(e),
        }
    }
}
