//! SQLite storage implementation

use std::path::Path;
use std::time::Duration;
use parking_lot::Mutex;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::friend::{Friend, FriendId};
use crate::item::{Item, ItemId};
use super::schema;

/// How long a statement waits on a locked database file before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage for friends and the items lent to them.
///
/// The connection sits behind a mutex so one store can be shared between
/// request handlers; the lock is held for exactly one statement.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        tracing::debug!("Opened database {}", path.display());
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn: Mutex::new(conn) };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the tables if they are missing. Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Friend Operations ==========

    /// All friends, sorted by name
    pub fn list_friends(&self) -> Result<Vec<Friend>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM friends ORDER BY name")?;

        let friends = stmt
            .query_map([], Self::row_to_friend)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(friends)
    }

    /// Get a friend by id
    pub fn get_friend(&self, id: FriendId) -> Result<Friend> {
        self.conn
            .lock()
            .query_row(
                "SELECT id, name FROM friends WHERE id = ?1",
                [id],
                Self::row_to_friend,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("friend {}", id)))
    }

    /// Insert a friend and return the generated id.
    ///
    /// Fails with [`Error::Conflict`] when the name is already taken.
    pub fn create_friend(&self, name: &str) -> Result<FriendId> {
        if name.is_empty() {
            return Err(Error::Validation("Friend name is required".to_string()));
        }

        let inserted = self.conn.lock().query_row(
            "INSERT INTO friends (name) VALUES (?1) RETURNING id",
            [name],
            |row| row.get(0),
        );

        match inserted {
            Ok(id) => Ok(id),
            Err(e) if is_unique_violation(&e) => {
                Err(Error::Conflict(format!("friend '{}' already exists", name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a friend by id. Deleting a missing id is not an error, and the
    /// friend's items are left untouched.
    pub fn delete_friend(&self, id: FriendId) -> Result<()> {
        let removed = self.conn.lock().execute("DELETE FROM friends WHERE id = ?1", [id])?;
        tracing::debug!("delete friend {}: {} row(s)", id, removed);
        Ok(())
    }

    /// Check whether a friend row with this id exists
    pub fn friend_exists(&self, id: FriendId) -> Result<bool> {
        let exists = self.conn.lock().query_row(
            "SELECT EXISTS(SELECT 1 FROM friends WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Resolve a friend's id from their exact name
    pub fn find_friend_id_by_name(&self, name: &str) -> Result<FriendId> {
        self.conn
            .lock()
            .query_row("SELECT id FROM friends WHERE name = ?1", [name], |row| row.get(0))
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("friend '{}'", name)))
    }

    /// Count all friends
    pub fn count_friends(&self) -> Result<usize> {
        let count: i64 = self.conn.lock().query_row("SELECT COUNT(*) FROM friends", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_friend(row: &rusqlite::Row) -> rusqlite::Result<Friend> {
        Ok(Friend {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    // ========== Item Operations ==========

    /// Items held by one friend, oldest first
    pub fn list_items_for_friend(&self, friend_id: FriendId) -> Result<Vec<Item>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, friend_id FROM items WHERE friend_id = ?1 ORDER BY id"
        )?;

        let items = stmt
            .query_map([friend_id], Self::row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items)
    }

    /// Get an item by id
    pub fn get_item(&self, id: ItemId) -> Result<Item> {
        self.conn
            .lock()
            .query_row(
                "SELECT id, name, friend_id FROM items WHERE id = ?1",
                [id],
                Self::row_to_item,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))
    }

    /// Record an item as lent to a friend and return the generated id.
    ///
    /// The insert only happens if the friend exists at that moment; the
    /// existence check and the write are one statement.
    pub fn create_item(&self, name: &str, friend_id: FriendId) -> Result<ItemId> {
        if name.is_empty() {
            return Err(Error::Validation("Item name is required".to_string()));
        }

        self.conn
            .lock()
            .query_row(
                r#"
                INSERT INTO items (name, friend_id)
                SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM friends WHERE id = ?2)
                RETURNING id
                "#,
                params![name, friend_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::Validation("Friend does not exist".to_string()))
    }

    /// Delete an item by id. Deleting a missing id is not an error.
    pub fn delete_item(&self, id: ItemId) -> Result<()> {
        let removed = self.conn.lock().execute("DELETE FROM items WHERE id = ?1", [id])?;
        tracing::debug!("delete item {}: {} row(s)", id, removed);
        Ok(())
    }

    /// Resolve an item id by exact name among one friend's items.
    ///
    /// Item names are not unique; when several match, the first row SQLite
    /// hands back wins.
    pub fn find_item_id_by_name_and_friend(&self, name: &str, friend_id: FriendId) -> Result<ItemId> {
        self.conn
            .lock()
            .query_row(
                "SELECT id FROM items WHERE name = ?1 AND friend_id = ?2",
                params![name, friend_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("item '{}'", name)))
    }

    /// Count all items
    pub fn count_items(&self) -> Result<usize> {
        let count: i64 = self.conn.lock().query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
        Ok(Item {
            id: row.get(0)?,
            name: row.get(1)?,
            friend_id: row.get(2)?,
        })
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            friends: self.count_friends()?,
            items: self.count_items()?,
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub friends: usize,
    pub items: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} friend(s), {} item(s) lent", self.friends, self.items)
    }
}
