//! Services module - HTTP handlers, one sub-module per resource

pub mod item;
pub mod member;
pub mod order;

// Re-exports to keep imports short
pub use item::{create_item, get_item_by_id, list_items, update_item};
pub use member::{get_member_by_id, list_members, register_member, update_member};
pub use order::{cancel_order, create_order, orders_v1, orders_v2, orders_v3, orders_v3_page};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
