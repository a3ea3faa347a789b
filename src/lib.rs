//! Server library - exposes the main modules for the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export the main types to keep imports short
pub use self::core::{AppError, AppState, config};
pub use services::root;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/members", configure_member_routes())
        .nest("/items", configure_item_routes())
        .merge(configure_order_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Member routes: registration and member management
fn configure_member_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(list_members).post(register_member))
        .route("/{member_id}", get(get_member_by_id).patch(update_member))
}

/// Item routes: catalog management
fn configure_item_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{item_id}", get(get_item_by_id).patch(update_item))
}

/// Order routes: the write pair plus the four retrieval strategies
fn configure_order_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/{order_id}/cancel", post(cancel_order))
        .route("/api/v1/orders", get(orders_v1))
        .route("/api/v2/orders", get(orders_v2))
        .route("/api/v3/orders", get(orders_v3))
        .route("/api/v3.1/orders", get(orders_v3_page))
}
