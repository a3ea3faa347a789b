//! Item DTOs

use crate::entities::{Item, ItemKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ItemDTO {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub stock_quantity: i64,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl From<Item> for ItemDTO {
    fn from(value: Item) -> Self {
        Self {
            item_id: value.item_id,
            name: value.name,
            price: value.price,
            stock_quantity: value.stock_quantity,
            kind: value.kind,
        }
    }
}

/// DTO for creating a new book item
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateItemDTO {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock_quantity: i64,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// DTO for partial item updates (only `Some(_)` fields are modified)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateItemDTO {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock_quantity: Option<i64>,
}
