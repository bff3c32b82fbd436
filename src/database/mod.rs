//! Database module
//!
//! This module handles the PostgreSQL connection pool and sessions

pub mod connection;

pub use connection::{get_pg_storage, DatabaseConfig, DatabasePool, PgStorage};
