use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{Student, StudentPayload};
use super::errors::StudentError;
use super::filter::{search, SearchTerm};
use super::repository::{StoreError, StudentRepository};
use super::validate::validate;

/// Student business service independent of web framework.
///
/// Holds no state of its own between calls; everything lives in the repository.
pub struct StudentService<R: StudentRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: StudentRepository + ?Sized> Clone for StudentService<R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo) }
    }
}

impl<R: StudentRepository + ?Sized> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and store a new student.
    ///
    /// # Examples
    /// ```
    /// use service::student::{StudentService, StudentPayload, repo::MemoryStudentRepository};
    /// use std::sync::Arc;
    /// let svc = StudentService::new(Arc::new(MemoryStudentRepository::default()));
    /// let payload: StudentPayload = serde_json::from_value(serde_json::json!({
    ///     "name": " Alice ", "email": "Alice@X.com", "course": "Math",
    ///     "batch": "2024", "grade": "A", "dateOfAdmission": "2024-01-15"
    /// })).unwrap();
    /// let s = tokio_test::block_on(svc.create(&payload)).unwrap();
    /// assert_eq!(s.name, "Alice");
    /// assert_eq!(s.email, "alice@x.com");
    /// ```
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &StudentPayload) -> Result<Student, StudentError> {
        let fields = validate(payload)?;
        self.ensure_email_free(&fields.email, None).await?;

        let created = self.repo.insert(fields).await.map_err(|e| store_error(e, None))?;
        info!(id = %created.id, email = %created.email, "student_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Student, StudentError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| store_error(e, Some(id)))?
            .ok_or(StudentError::NotFound(id))
    }

    /// Fresh snapshot filtered by `term`; absent or empty terms return everything.
    #[instrument(skip(self))]
    pub async fn list(&self, term: Option<&str>) -> Result<Vec<Student>, StudentError> {
        let snapshot = self.repo.find_all().await.map_err(|e| store_error(e, None))?;
        let term = SearchTerm::new(term);
        if term.is_all() {
            return Ok(snapshot);
        }
        let hits: Vec<Student> = search(&snapshot, &term).cloned().collect();
        debug!(total = snapshot.len(), matched = hits.len(), "student_search");
        Ok(hits)
    }

    /// Replace every field of an existing student.
    ///
    /// Order of checks: payload, then existence of `id`, then email ownership.
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: Uuid, payload: &StudentPayload) -> Result<Student, StudentError> {
        let fields = validate(payload)?;
        self.get(id).await?;
        self.ensure_email_free(&fields.email, Some(id)).await?;

        let updated = self.repo.update_by_id(id, fields).await.map_err(|e| store_error(e, Some(id)))?;
        info!(id = %updated.id, "student_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), StudentError> {
        self.repo.delete_by_id(id).await.map_err(|e| store_error(e, Some(id)))?;
        info!(id = %id, "student_deleted");
        Ok(())
    }

    /// Early conflict detection; the repository's own check stays authoritative.
    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> Result<(), StudentError> {
        let existing = self.repo.find_by_email(email).await.map_err(|e| store_error(e, owner))?;
        match existing {
            Some(other) if Some(other.id) != owner => {
                warn!(email = %email, existing = %other.id, "student_email_conflict");
                Err(StudentError::Conflict(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn store_error(e: StoreError, id: Option<Uuid>) -> StudentError {
    match (e, id) {
        (StoreError::Duplicate { email }, _) => StudentError::Conflict(email),
        (StoreError::NotFound, Some(id)) => StudentError::NotFound(id),
        (StoreError::NotFound, None) => StudentError::StorageUnavailable("store lost a record mid-operation".into()),
        (StoreError::Unavailable(msg), _) => StudentError::StorageUnavailable(msg),
    }
}
