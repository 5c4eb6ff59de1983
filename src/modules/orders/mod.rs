pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{Order, OrderRow, OrderStatus, Platform};
pub use repositories::{MySqlOrderRepository, OrderStore, OrderUpdate};
pub use services::OrderService;
