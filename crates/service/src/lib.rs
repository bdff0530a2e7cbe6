//! Service layer providing business-oriented operations on student records.
//! - Separates business logic from data access.
//! - Reuses entity definitions from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod student;
