//! Student records: three-layer architecture (domain, repository, service).
//!
//! Raw JSON bags are turned into typed records by [`validate`], persisted through a
//! [`repository::StudentRepository`] and searched in memory by [`filter`].

pub mod clock;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod repository;
pub mod repo;
pub mod service;
pub mod validate;

pub use domain::{Grade, NewStudent, Student, StudentPayload};
pub use errors::StudentError;
pub use service::StudentService;
