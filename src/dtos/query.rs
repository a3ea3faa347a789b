//! Query DTOs - search filter and pagination parameters

use crate::entities::OrderStatus;
use serde::{Deserialize, Serialize};

/// Search filter for orders. Both fields are optional; both absent means
/// "match all".
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OrderSearch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub member_name: Option<String>,
}

impl OrderSearch {
    /// The member-name filter, with blank input treated as absent.
    pub fn member_name_filter(&self) -> Option<&str> {
        self.member_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Offset/limit pair for the paginated order endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PaginationQuery {
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PaginationQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Limit, defaulting to 100 and clamped to the 1000-row safety cap.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 1000)
    }
}
