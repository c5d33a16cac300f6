//! Reading-log store
//!
//! Exposes the `Db` struct and its methods for keeping book records in a local SQLite database
//! through pre-defined queries.
pub mod queries;
pub mod types;
