//! # Lendlog - who has my stuff?
//!
//! Keeps track of the items you lent to your friends.
//!
//! Lendlog provides:
//! - A SQLite-backed store of friends and the items they hold
//! - An interactive console session (`lendlog`)
//! - A JSON REST API over the same store (`lendlog-server`)
//!
//! Both front ends go through [`SqliteStore`], which is constructed once at
//! startup and handed to whoever needs it.

pub mod friend;
pub mod item;
pub mod storage;
pub mod console;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use friend::Friend;
pub use item::Item;
pub use storage::SqliteStore;
pub use console::Session;

/// Result type alias for Lendlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Lendlog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lookup by id or name matched no row
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid input; never reaches the store
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}
