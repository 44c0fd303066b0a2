//! Database schema definitions

/// SQL to create the friends table
pub const CREATE_FRIENDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS friends (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the items table
///
/// The `REFERENCES` clause documents the relation only: foreign key
/// enforcement is left off, so deleting a friend leaves its items in place.
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    friend_id INTEGER REFERENCES friends(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_items_friend ON items(friend_id)",
];

/// All schema creation statements, tables first
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_FRIENDS_TABLE, CREATE_ITEMS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
