//! Runtime wiring helpers
//!
//! Turns the resolved `configs::AppConfig` into a ready repository so binary
//! crates do not need to know about the individual store implementations.

use std::sync::Arc;

use configs::{AppConfig, StorageBackend};
use tracing::info;

use crate::errors::ServiceError;
use crate::student::clock::{Clock, SystemClock};
use crate::student::repo::{MemoryStudentRepository, SeaOrmStudentRepository};
use crate::student::repository::StudentRepository;

/// Build the record store selected by `cfg.storage`, migrating the database if needed.
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn StudentRepository>, ServiceError> {
    build_repository_with_clock(cfg, Arc::new(SystemClock)).await
}

pub async fn build_repository_with_clock(
    cfg: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn StudentRepository>, ServiceError> {
    let repo: Arc<dyn StudentRepository> = match cfg.storage_backend() {
        StorageBackend::Memory => {
            info!(backend = "memory", "student store ready");
            Arc::new(MemoryStudentRepository::new(clock))
        }
        StorageBackend::File => {
            let repo = MemoryStudentRepository::open(&cfg.storage.path, clock).await?;
            info!(backend = "file", path = %cfg.storage.path, "student store ready");
            Arc::new(repo)
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| ServiceError::Storage(format!("database connect failed: {e}")))?;
            models::db::migrate(&db)
                .await
                .map_err(|e| ServiceError::Storage(format!("migration failed: {e}")))?;
            info!(backend = "postgres", "student store ready");
            Arc::new(SeaOrmStudentRepository::with_clock(db, clock))
        }
    };
    Ok(repo)
}
