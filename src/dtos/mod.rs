//! DTOs module - Data Transfer Objects for the HTTP boundary
//!
//! Entities never cross the API boundary except through these shapes; the
//! order projection in particular copies scalar values only, so no entity
//! graph (and no cycle) can reach the serializer.

pub mod item;
pub mod member;
pub mod order;
pub mod query;

// Re-exports to keep imports short
pub use item::{CreateItemDTO, ItemDTO, UpdateItemDTO};
pub use member::{CreateMemberDTO, MemberDTO, UpdateMemberDTO};
pub use order::{CreateOrderDTO, OrderDTO, OrderItemDTO};
pub use query::{OrderSearch, PaginationQuery};
