//! Entities module - Domain entities of the shop
//!
//! Every entity mirrors one table in the database. Associations are held as
//! plain ids; the hydrated read-side shapes (`OrderGraph`, `OrderLine`) are
//! built explicitly by the repositories, never lazily.

pub mod address;
pub mod delivery;
pub mod enums;
pub mod item;
pub mod member;
pub mod order;

// Re-exports to keep imports short
pub use address::Address;
pub use delivery::Delivery;
pub use enums::{DeliveryStatus, OrderStatus};
pub use item::{Item, ItemKind, NotEnoughStock};
pub use member::Member;
pub use order::{AlreadyCanceled, Order, OrderGraph, OrderItem, OrderLine};
