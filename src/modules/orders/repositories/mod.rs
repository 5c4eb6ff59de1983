pub mod order_repository;

pub use order_repository::{MySqlOrderRepository, OrderStore, OrderUpdate};
