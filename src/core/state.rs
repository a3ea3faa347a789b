//! Application State - shared state of the application
//!
//! Holds the repositories every route works through.

use crate::repositories::{ItemRepository, MemberRepository, OrderRepository};
use sqlx::SqlitePool;

/// Shared state handed to every route
pub struct AppState {
    /// Repository for member management
    pub member: MemberRepository,

    /// Repository for the item catalog
    pub item: ItemRepository,

    /// Repository for orders and the order fetch strategies
    pub order: OrderRepository,
}

impl AppState {
    /// Creates a new AppState, initializing every repository with the
    /// given connection pool.
    ///
    /// # Arguments
    /// * `pool` - shared SQLite connection pool
    /// * `batch_fetch_size` - `IN`-clause bound for the collection batch
    ///   loader
    pub fn new(pool: SqlitePool, batch_fetch_size: usize) -> Self {
        Self {
            member: MemberRepository::new(pool.clone()),
            item: ItemRepository::new(pool.clone()),
            order: OrderRepository::new(pool, batch_fetch_size),
        }
    }
}
