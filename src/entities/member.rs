//! Member entity

use super::Address;
use serde::{Deserialize, Serialize};

/// A registered member. Members never hold a live collection of their
/// orders; the inverse direction is a separate query on the order side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Member {
    pub member_id: i64,
    pub name: String,
    #[sqlx(flatten)]
    pub address: Address,
}
