//! Shared plumbing for the student registry crates: logging setup,
//! runtime directory checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;
