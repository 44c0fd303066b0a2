//! Friend - a named counterparty you lend things to

use serde::{Deserialize, Serialize};

/// Store-generated friend identifier
pub type FriendId = i64;

/// A friend as stored in the `friends` table.
///
/// Names are unique (case-sensitive). A friend is never renamed; it is
/// created once and eventually deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: FriendId,
    pub name: String,
}

impl Friend {
    pub fn new(id: FriendId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Request body for creating a friend.
///
/// Every field is optional on the wire; a missing `name` decodes as empty and
/// is rejected by validation, not by the decoder. A client-supplied `id` is
/// accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFriend {
    #[serde(default)]
    pub id: FriendId,
    #[serde(default)]
    pub name: String,
}

impl std::fmt::Display for Friend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
