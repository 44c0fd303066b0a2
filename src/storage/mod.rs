//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - friends(id, name UNIQUE)
//! - items(id, name, friend_id -> friends.id)
//!
//! [`SqliteStore`] is the only thing in the crate that talks to the database.
//! Every public operation is a single statement.

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};
