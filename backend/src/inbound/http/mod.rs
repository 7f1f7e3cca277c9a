//! HTTP inbound adapter exposing the order read and probe endpoints.

pub mod error;
pub mod health;
pub mod orders;
pub mod state;

pub use error::ApiResult;
