//! Item services - catalog management

use crate::core::{AppError, AppState};
use crate::dtos::{CreateItemDTO, ItemDTO, UpdateItemDTO};
use crate::repositories::{Create, Read, Update};
use axum::extract::{Json, Path, State};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateItemDTO>,
) -> Result<Json<ItemDTO>, AppError> {
    debug!("Creating item");
    body.validate()?;

    let item = state.item.create(&body).await?;

    info!("Item '{}' created", item.name);
    Ok(Json(ItemDTO::from(item)))
}

#[instrument(skip(state))]
pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ItemDTO>>, AppError> {
    let items = state.item.find_all().await?;

    let items_dto: Vec<ItemDTO> = items.into_iter().map(ItemDTO::from).collect();
    Ok(Json(items_dto))
}

#[instrument(skip(state), fields(item_id = %item_id))]
pub async fn get_item_by_id(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<Json<Option<ItemDTO>>, AppError> {
    debug!("Fetching item by ID");
    let item = state.item.read(&item_id).await?;
    if item.is_none() {
        warn!("Item not found");
    }

    Ok(Json(item.map(ItemDTO::from)))
}

#[instrument(skip(state, body), fields(item_id = %item_id))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(body): Json<UpdateItemDTO>,
) -> Result<Json<ItemDTO>, AppError> {
    debug!("Updating item");
    body.validate()?;

    let item = state.item.update(&item_id, &body).await?;

    info!("Item {} updated", item_id);
    Ok(Json(ItemDTO::from(item)))
}
