//! HTTP front end - JSON REST API under `/api`

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use crate::storage::SqliteStore;

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorResponse};

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Server state
pub struct AppState {
    pub store: SqliteStore,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

/// Build the full router: API routes, static fallback, CORS and tracing.
/// A wrong method on an API path gets a JSON 405 rather than a static file.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/friends", get(routes::list_friends).post(routes::create_friend))
        .route("/api/friends/{id}", get(routes::get_friend).delete(routes::delete_friend))
        .route("/api/friends/{id}/items", get(routes::list_friend_items))
        .route("/api/items", axum::routing::post(routes::create_item))
        .route("/api/items/{id}", get(routes::get_item).delete(routes::delete_item))
        .method_not_allowed_fallback(routes::method_not_allowed)
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow any origin on every response and answer every `OPTIONS` request
/// directly with an empty 200.
async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    response
}

pub async fn start_server(port: u16, store: SqliteStore, static_dir: &Path) -> anyhow::Result<()> {
    let app = build_router(AppState::new(store), static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
