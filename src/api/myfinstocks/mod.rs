pub mod client;
pub mod models;

pub use client::MyFinStocksClient;
pub use models::{display_or_na, number_or_zero, ApiError, Summary};

#[cfg(test)]
pub use models::PriceValue;
