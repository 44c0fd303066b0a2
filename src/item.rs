//! Item - something of yours a friend currently holds

use crate::friend::FriendId;
use serde::{Deserialize, Serialize};

/// Store-generated item identifier
pub type ItemId = i64;

/// An item as stored in the `items` table.
///
/// Item names are not unique, not even per friend. `friend_id` pointed at an
/// existing friend when the row was written; nothing keeps it valid after that
/// friend is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub friend_id: FriendId,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, friend_id: FriendId) -> Self {
        Self {
            id,
            name: name.into(),
            friend_id,
        }
    }
}

/// Request body for lending an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub friend_id: FriendId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_uses_camel_case_friend_id() {
        let item = Item::new(3, "Drill", 9);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "name": "Drill", "friendId": 9}));
    }

    #[test]
    fn test_new_item_defaults() {
        let body: NewItem = serde_json::from_str(r#"{"name":"Ladder"}"#).unwrap();
        assert_eq!(body.name, "Ladder");
        assert_eq!(body.friend_id, 0);
    }

    #[test]
    fn test_new_item_rejects_string_friend_id() {
        let body = serde_json::from_str::<NewItem>(r#"{"name":"Ladder","friendId":"1"}"#);
        assert!(body.is_err());
    }
}
