//! Storage helpers for service layer
//!
//! File-backed persistence for stores that keep their state in memory.

pub mod json_snapshot;
