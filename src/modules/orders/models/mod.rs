pub mod order;

pub use order::{normalize_rows, Order, OrderRow, OrderStatus, Platform};
