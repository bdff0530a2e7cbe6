use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::domain::{NewStudent, Student};

/// Failures a record store may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("email {email} is already taken")]
    Duplicate { email: String },
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed storage for student records.
///
/// Implementations assign identifiers and timestamps, keep `find_all` in
/// insertion order, and must enforce email uniqueness atomically: of two racing
/// writes carrying the same email exactly one succeeds.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, fields: NewStudent) -> Result<Student, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Student>, StoreError>;
    async fn update_by_id(&self, id: Uuid, fields: NewStudent) -> Result<Student, StoreError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;
}
