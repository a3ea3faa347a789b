//! Order entity and the hydrated order graph
//!
//! `Order` is the bare row; `OrderGraph` is the explicitly loaded shape the
//! retrieval endpoints work with (order + member + delivery + lines). There
//! is no lazy loading anywhere: a graph only contains what a repository
//! call has already resolved.

use super::{Delivery, Item, Member, OrderStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Raised when a cancellation is attempted on an order that is not in
/// `ORDER` status anymore.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("order {order_id} has already been canceled")]
pub struct AlreadyCanceled {
    pub order_id: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Order {
    pub order_id: i64,
    pub member_id: i64,
    pub delivery_id: i64,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
}

impl Order {
    /// Flips the status to `CANCEL`. Only valid once: a second call fails
    /// and leaves the order untouched. Stock restoration is persisted by
    /// the repository together with the status flip.
    pub fn cancel(&mut self) -> Result<(), AlreadyCanceled> {
        if self.order_status != OrderStatus::Order {
            return Err(AlreadyCanceled {
                order_id: self.order_id,
            });
        }
        self.order_status = OrderStatus::Cancel;
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub item_id: i64,
    /// Price snapshot taken when the order was placed; later item price
    /// changes never affect existing orders.
    pub order_price: i64,
    pub count: i64,
}

impl OrderItem {
    pub fn total_price(&self) -> i64 {
        self.order_price * self.count
    }
}

/// One resolved line of an order: the order item plus its item.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderLine {
    #[serde(flatten)]
    pub order_item: OrderItem,
    pub item: Item,
}

/// Fully resolved order: member and delivery always present, lines filled
/// in by the collection batch loader (or empty right after the root fetch).
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderGraph {
    #[serde(flatten)]
    pub order: Order,
    pub member: Member,
    pub delivery: Delivery,
    pub order_items: Vec<OrderLine>,
}

impl OrderGraph {
    /// Total order amount: sum of `order_price * count` over all lines.
    pub fn total_price(&self) -> i64 {
        self.order_items
            .iter()
            .map(|line| line.order_item.total_price())
            .sum()
    }
}
