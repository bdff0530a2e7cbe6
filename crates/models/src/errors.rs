use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unique constraint violated: {0}")]
    Duplicate(String),
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
            return ModelError::Duplicate(msg);
        }
        match e {
            // update of a row that vanished underneath us
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => ModelError::NotFound,
            other => ModelError::Db(other.to_string()),
        }
    }
}
