use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::json_snapshot::JsonSnapshot;
use crate::student::clock::{Clock, SystemClock};
use crate::student::domain::{NewStudent, Student};
use crate::student::repository::{StoreError, StudentRepository};

#[derive(Clone, Default)]
struct Inner {
    records: Vec<Student>,
    by_email: HashMap<String, Uuid>,
}

impl Inner {
    fn from_records(records: Vec<Student>) -> Result<Self, ServiceError> {
        let mut by_email = HashMap::with_capacity(records.len());
        for r in &records {
            if by_email.insert(r.email.clone(), r.id).is_some() {
                return Err(ServiceError::Storage(format!("snapshot holds duplicate email {}", r.email)));
            }
        }
        Ok(Self { records, by_email })
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

/// Insertion-ordered in-process store, optionally snapshotted to a JSON file.
///
/// Uniqueness checks and writes happen under one write guard, which serialises
/// every mutation and makes same-email races resolve to a single winner.
pub struct MemoryStudentRepository {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
    snapshot: Option<JsonSnapshot<Vec<Student>>>,
}

impl Default for MemoryStudentRepository {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl MemoryStudentRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { inner: RwLock::new(Inner::default()), clock, snapshot: None }
    }

    /// Load records from `path` (created if missing) and rewrite it after every mutation.
    pub async fn open<P: Into<PathBuf>>(path: P, clock: Arc<dyn Clock>) -> Result<Self, ServiceError> {
        let (snapshot, records) = JsonSnapshot::<Vec<Student>>::open(path).await?;
        debug!(path = %snapshot.path().display(), count = records.len(), "student snapshot loaded");
        let inner = Inner::from_records(records)?;
        Ok(Self { inner: RwLock::new(inner), clock, snapshot: Some(snapshot) })
    }

    /// Persist `next`; on failure the caller keeps the previous state.
    async fn persist(&self, next: &Inner) -> Result<(), StoreError> {
        let Some(snapshot) = &self.snapshot else { return Ok(()) };
        snapshot.save(&next.records).await.map_err(|e| {
            warn!(error = %e, "student snapshot write failed");
            StoreError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl StudentRepository for MemoryStudentRepository {
    async fn insert(&self, fields: NewStudent) -> Result<Student, StoreError> {
        let mut guard = self.inner.write().await;
        if guard.by_email.contains_key(&fields.email) {
            return Err(StoreError::Duplicate { email: fields.email });
        }
        let now = self.clock.now();
        let record = Student::from_parts(Uuid::new_v4(), fields, now, now);

        let mut next = guard.clone();
        next.by_email.insert(record.email.clone(), record.id);
        next.records.push(record.clone());
        self.persist(&next).await?;
        *guard = next;
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let guard = self.inner.read().await;
        let Some(id) = guard.by_email.get(email) else { return Ok(None) };
        Ok(guard.records.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn update_by_id(&self, id: Uuid, fields: NewStudent) -> Result<Student, StoreError> {
        let mut guard = self.inner.write().await;
        let idx = guard.position(id).ok_or(StoreError::NotFound)?;
        if let Some(owner) = guard.by_email.get(&fields.email) {
            if *owner != id {
                return Err(StoreError::Duplicate { email: fields.email });
            }
        }

        let mut next = guard.clone();
        let old_email = next.records[idx].email.clone();
        next.records[idx].apply(fields, self.clock.now());
        let updated = next.records[idx].clone();
        if old_email != updated.email {
            next.by_email.remove(&old_email);
            next.by_email.insert(updated.email.clone(), id);
        }
        self.persist(&next).await?;
        *guard = next;
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let idx = guard.position(id).ok_or(StoreError::NotFound)?;

        let mut next = guard.clone();
        let removed = next.records.remove(idx);
        next.by_email.remove(&removed.email);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }
}
