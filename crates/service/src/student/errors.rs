use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    Empty,
    NotText,
    TooLong,
    InvalidGrade,
    InvalidDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

/// Every violation found in one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, rule: Rule, message: impl Into<String>) {
        self.0.push(FieldViolation { field, rule, message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.0.iter().any(|v| v.field == field && v.rule == rule)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Domain outcomes of student operations.
#[derive(Debug, Error)]
pub enum StudentError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("a student with email {0} already exists")]
    Conflict(String),
    #[error("student {0} not found")]
    NotFound(Uuid),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StudentError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StudentError::Validation(_) => 2001,
            StudentError::Conflict(_) => 2002,
            StudentError::NotFound(_) => 2003,
            StudentError::StorageUnavailable(_) => 2004,
        }
    }
}
