//! Records mirrored from the UaiFood REST API.
//!
//! These carry no lifecycle of their own; they are decoded from the wire,
//! rendered, and dropped.

pub mod item;
pub mod order;
pub mod user;

pub use item::{Category, Item, ItemFilters};
pub use order::{Client, LineItem, Order, OrderEdit, OrderItem, OrderStatus, PaymentMethod};
pub use user::{Address, Role, UpdateUserPayload, User, UsersFilter};
