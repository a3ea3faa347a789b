//! Order DTOs - the flat projection of the order graph
//!
//! The projection copies scalars only: member and item appear as their
//! names, the delivery as its address. No id of a related entity and no
//! entity reference ever leaves through this shape.

use crate::entities::{Address, OrderGraph, OrderLine, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderDTO {
    pub order_id: i64,
    /// The ordering member's name.
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    /// Shipping address of the order's delivery.
    pub address: Address,
    pub order_items: Vec<OrderItemDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderItemDTO {
    pub item_name: String,
    pub order_price: i64,
    pub count: i64,
}

impl From<&OrderLine> for OrderItemDTO {
    fn from(line: &OrderLine) -> Self {
        Self {
            item_name: line.item.name.clone(),
            order_price: line.order_item.order_price,
            count: line.order_item.count,
        }
    }
}

impl From<&OrderGraph> for OrderDTO {
    fn from(graph: &OrderGraph) -> Self {
        Self {
            order_id: graph.order.order_id,
            name: graph.member.name.clone(),
            order_date: graph.order.order_date,
            order_status: graph.order.order_status,
            address: graph.delivery.address.clone(),
            order_items: graph.order_items.iter().map(OrderItemDTO::from).collect(),
        }
    }
}

/// DTO for placing an order: one item, a count, on behalf of a member
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateOrderDTO {
    pub member_id: i64,
    pub item_id: i64,
    #[validate(range(min = 1, message = "count must be at least 1"))]
    pub count: i64,
}
