//! Order services - placement, cancellation and the four retrieval
//! strategies
//!
//! The retrieval endpoints deliberately keep all four strategies side by
//! side, from the per-root loads of v1/v2 to the paginated
//! to-one-join-plus-batched-collection of v3.1. They all return the same
//! flat projection (v1 excepted, which returns the hydrated graph).

use crate::core::{AppError, AppState};
use crate::dtos::{CreateOrderDTO, OrderDTO, OrderSearch, PaginationQuery};
use crate::entities::{Order, OrderGraph};
use crate::repositories::Read;
use axum::extract::{Json, Path, Query, State};
use axum_macros::debug_handler;
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

/// Loads one order's associations individually: member, delivery, lines.
/// This is the per-root hydration the unoptimized endpoints pay once per
/// order (the N+1 shape the later versions exist to avoid).
async fn hydrate(state: &AppState, order: Order) -> Result<OrderGraph, AppError> {
    let member = state
        .member
        .read(&order.member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;
    let delivery = state
        .order
        .read_delivery(&order.delivery_id)
        .await?
        .ok_or_else(|| AppError::not_found("Delivery not found"))?;
    let order_items = state.order.find_lines_by_order_id(&order.order_id).await?;

    Ok(OrderGraph {
        order,
        member,
        delivery,
        order_items,
    })
}

/// Runs the per-root hydration over a whole result set.
async fn hydrate_all(
    state: &Arc<AppState>,
    orders: Vec<Order>,
) -> Result<Vec<OrderGraph>, AppError> {
    try_join_all(orders.into_iter().map(|order| {
        let state = state.clone();
        async move { hydrate(&state, order).await }
    }))
    .await
}

#[debug_handler]
#[instrument(skip(state, body), fields(member_id = %body.member_id, item_id = %body.item_id, count = %body.count))]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateOrderDTO>,
) -> Result<Json<OrderDTO>, AppError> {
    debug!("Placing order");
    body.validate()?;

    let member = state
        .member
        .read(&body.member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;
    let mut item = state
        .item
        .read(&body.item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    // load -> mutate -> save: the decrement happens on the loaded snapshot
    // and fails here, before anything is written
    item.remove_stock(body.count)?;

    let order = state.order.place(&member, &item, body.count).await?;

    info!(
        "Order {} placed by member {}",
        order.order_id, member.member_id
    );

    let graph = hydrate(&state, order).await?;
    Ok(Json(OrderDTO::from(&graph)))
}

#[instrument(skip(state), fields(order_id = %order_id))]
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderDTO>, AppError> {
    debug!("Canceling order");
    let mut order = state
        .order
        .read(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    // only valid from ORDER status; a second cancel fails here with no
    // further stock change
    order.cancel()?;
    state.order.cancel(&order).await?;

    info!("Order {} canceled", order_id);

    let graph = hydrate(&state, order).await?;
    Ok(Json(OrderDTO::from(&graph)))
}

/// Order retrieval v1: exposes the hydrated entity graph directly. Kept as
/// the cautionary baseline; every association costs one query per order.
#[instrument(skip(state))]
pub async fn orders_v1(
    State(state): State<Arc<AppState>>,
    Query(search): Query<OrderSearch>,
) -> Result<Json<Vec<OrderGraph>>, AppError> {
    debug!("Listing orders (v1, entity graph)");
    let orders = state.order.find_all_by_string(&search).await?;

    let graphs = hydrate_all(&state, orders).await?;

    info!("Loaded {} order graphs", graphs.len());
    Ok(Json(graphs))
}

/// Order retrieval v2: projects to the flat DTO, but still loads the graph
/// with one query per association per order.
#[instrument(skip(state))]
pub async fn orders_v2(
    State(state): State<Arc<AppState>>,
    Query(search): Query<OrderSearch>,
) -> Result<Json<Vec<OrderDTO>>, AppError> {
    debug!("Listing orders (v2, per-root loads)");
    let orders = state.order.find_all_by_string(&search).await?;

    let graphs = hydrate_all(&state, orders).await?;
    let orders_dto: Vec<OrderDTO> = graphs.iter().map(OrderDTO::from).collect();

    info!("Loaded {} orders", orders_dto.len());
    Ok(Json(orders_dto))
}

/// Order retrieval v3: one query joining the collection. No pagination.
#[instrument(skip(state))]
pub async fn orders_v3(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderDTO>>, AppError> {
    debug!("Listing orders (v3, collection join)");
    let graphs = state.order.find_all_with_item().await?;

    let orders_dto: Vec<OrderDTO> = graphs.iter().map(OrderDTO::from).collect();

    info!("Loaded {} orders", orders_dto.len());
    Ok(Json(orders_dto))
}

/// Order retrieval v3.1: paginated roots via the to-one join, lines via
/// the IN-batched collection loader. The strategy that scales.
#[debug_handler]
#[instrument(skip(state, pagination), fields(offset = pagination.offset(), limit = pagination.limit()))]
pub async fn orders_v3_page(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<OrderDTO>>, AppError> {
    debug!("Listing orders (v3.1, paged roots + batched lines)");
    // 1. page of roots, to-one joins only - pagination stays exact
    let mut graphs = state
        .order
        .find_all_with_member_delivery_paged(pagination.offset(), pagination.limit())
        .await?;

    // 2. lines for the whole page, one IN query per batch
    state.order.attach_order_items(&mut graphs).await?;

    let orders_dto: Vec<OrderDTO> = graphs.iter().map(OrderDTO::from).collect();

    info!("Loaded {} orders", orders_dto.len());
    Ok(Json(orders_dto))
}
