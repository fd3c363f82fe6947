pub mod config;
pub mod error;
pub mod perf;
pub mod provider;
pub mod sources;
pub mod sync;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::SyncError;
pub use types::{Marketplace, Order, OrderStatus, SyncTask};
