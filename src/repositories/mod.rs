//! Repositories module - database access, one repository per aggregate
//!
//! All queries go through the runtime query API (`sqlx::query_as` and
//! `QueryBuilder`): the dynamic search and the `IN`-batch loader cannot be
//! expressed as static queries anyway, and keeping one style makes the
//! repository layer uniform.

pub mod item;
pub mod member;
pub mod order;
pub mod traits;

// Re-exports to keep imports short
pub use item::ItemRepository;
pub use member::MemberRepository;
pub use order::OrderRepository;
pub use traits::{Create, Read, Update};
