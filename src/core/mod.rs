pub mod error;
pub mod money;
pub mod timezone;

pub use error::{AppError, Result};
pub use money::{round_money, JsonAmount};
pub use timezone::ReportingTimezone;
