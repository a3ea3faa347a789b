//! Delivery entity

use super::{Address, DeliveryStatus};
use serde::{Deserialize, Serialize};

/// Shipping record created together with an order. The address is a copy of
/// the member's address at order time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Delivery {
    pub delivery_id: i64,
    #[sqlx(flatten)]
    pub address: Address,
    pub delivery_status: DeliveryStatus,
}
