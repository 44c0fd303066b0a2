use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use crate::friend::{Friend, NewFriend};
use crate::item::{Item, NewItem};
use crate::server::AppState;
use crate::server::error::{store_error, ApiError};
use crate::storage::SqliteStore;
use crate::Error;
use std::sync::Arc;

type ApiResult<T> = Result<T, ApiError>;
type IdPath = Result<Path<String>, PathRejection>;

/// Path ids must be plain integers; anything else is a 400, never a 500.
/// That includes segments axum cannot percent-decode into a string.
fn parse_id(raw: IdPath, invalid: &'static str) -> ApiResult<i64> {
    let Path(raw) = raw.map_err(|e| {
        tracing::debug!("rejecting path id: {}", e);
        ApiError::bad_request(invalid)
    })?;
    raw.parse::<i64>().map_err(|_| ApiError::bad_request(invalid))
}

/// Decode a JSON body regardless of the declared content type.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("rejecting request body: {}", e);
        ApiError::bad_request("Invalid request payload")
    })
}

/// Run one store call on the blocking pool. SQLite may sit in its busy
/// timeout while another process holds the file lock.
async fn with_store<T, F>(state: &Arc<AppState>, op: F) -> ApiResult<crate::Result<T>>
where
    T: Send + 'static,
    F: FnOnce(&SqliteStore) -> crate::Result<T> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || op(&state.store))
        .await
        .map_err(|e| {
            tracing::error!("store task failed: {}", e);
            ApiError::internal("Internal server error")
        })
}

fn deleted() -> Json<Value> {
    Json(json!({"result": "success"}))
}

/// Answer for a known path hit with a method it does not serve
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

// ========== Friends ==========

pub async fn list_friends(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Friend>>> {
    let friends = with_store(&state, |store| store.list_friends())
        .await?
        .map_err(store_error("Error retrieving friends"))?;
    Ok(Json(friends))
}

pub async fn create_friend(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Friend>)> {
    let payload: NewFriend = decode_body(&body)?;
    if payload.name.is_empty() {
        return Err(ApiError::bad_request("Friend name is required"));
    }

    let name = payload.name.clone();
    let id = match with_store(&state, move |store| store.create_friend(&name)).await? {
        Ok(id) => id,
        Err(Error::Conflict(_)) => return Err(ApiError::conflict("Friend already exists")),
        Err(e) => return Err(ApiError::from_store(e, "Error creating friend")),
    };

    tracing::info!("Created friend {} ({})", id, payload.name);
    Ok((StatusCode::CREATED, Json(Friend::new(id, payload.name))))
}

pub async fn get_friend(
    State(state): State<Arc<AppState>>,
    id: IdPath,
) -> ApiResult<Json<Friend>> {
    let id = parse_id(id, "Invalid friend ID")?;
    match with_store(&state, move |store| store.get_friend(id)).await? {
        Ok(friend) => Ok(Json(friend)),
        Err(Error::NotFound(_)) => Err(ApiError::not_found("Friend not found")),
        Err(e) => Err(ApiError::from_store(e, "Error retrieving friend")),
    }
}

pub async fn delete_friend(
    State(state): State<Arc<AppState>>,
    id: IdPath,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "Invalid friend ID")?;
    with_store(&state, move |store| store.delete_friend(id))
        .await?
        .map_err(store_error("Error deleting friend"))?;
    tracing::info!("Deleted friend {}", id);
    Ok(deleted())
}

pub async fn list_friend_items(
    State(state): State<Arc<AppState>>,
    id: IdPath,
) -> ApiResult<Json<Vec<Item>>> {
    let id = parse_id(id, "Invalid friend ID")?;
    let items = with_store(&state, move |store| store.list_items_for_friend(id))
        .await?
        .map_err(store_error("Error retrieving items"))?;
    Ok(Json(items))
}

// ========== Items ==========

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let payload: NewItem = decode_body(&body)?;
    if payload.name.is_empty() {
        return Err(ApiError::bad_request("Item name is required"));
    }
    if payload.friend_id <= 0 {
        return Err(ApiError::bad_request("Friend ID is required"));
    }

    let friend_id = payload.friend_id;
    let exists = with_store(&state, move |store| store.friend_exists(friend_id))
        .await?
        .map_err(store_error("Error checking friend existence"))?;
    if !exists {
        return Err(ApiError::bad_request("Friend does not exist"));
    }

    // The friend can vanish between the check and the insert; the store
    // reports that as a validation error, which maps back to the same 400.
    let name = payload.name.clone();
    let id = with_store(&state, move |store| store.create_item(&name, friend_id))
        .await?
        .map_err(store_error("Error creating item"))?;

    tracing::info!("Lent item {} ({}) to friend {}", id, payload.name, friend_id);
    Ok((StatusCode::CREATED, Json(Item::new(id, payload.name, friend_id))))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    id: IdPath,
) -> ApiResult<Json<Item>> {
    let id = parse_id(id, "Invalid item ID")?;
    match with_store(&state, move |store| store.get_item(id)).await? {
        Ok(item) => Ok(Json(item)),
        Err(Error::NotFound(_)) => Err(ApiError::not_found("Item not found")),
        Err(e) => Err(ApiError::from_store(e, "Error retrieving item")),
    }
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    id: IdPath,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "Invalid item ID")?;
    with_store(&state, move |store| store.delete_item(id))
        .await?
        .map_err(store_error("Error deleting item"))?;
    tracing::info!("Deleted item {}", id);
    Ok(deleted())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> IdPath {
        Ok(Path(id.to_string()))
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(raw("42"), "bad").unwrap(), 42);
        assert_eq!(parse_id(raw("-1"), "bad").unwrap(), -1);
        let err = parse_id(raw("abc"), "Invalid friend ID").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid friend ID");
        assert!(parse_id(raw(""), "bad").is_err());
        assert!(parse_id(raw("1.5"), "bad").is_err());
    }

    #[test]
    fn test_decode_body_rejects_garbage() {
        let err = decode_body::<NewFriend>(&Bytes::from_static(b"{not json")).unwrap_err();
        assert_eq!(err.message, "Invalid request payload");
    }

    #[tokio::test]
    async fn test_with_store_runs_on_blocking_pool() {
        let state = AppState::new(SqliteStore::open_in_memory().unwrap());
        let id = with_store(&state, |store| store.create_friend("Alice"))
            .await
            .unwrap()
            .unwrap();
        assert!(state.store.friend_exists(id).unwrap());
    }
}
