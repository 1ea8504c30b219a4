pub mod config;
pub mod error;
pub mod handle;
pub mod humanize;
pub mod observability;

pub use config::HandleConfig;
pub use error::HandleError;
pub use handle::{HandleClient, OperationResult};
