//! API layer - HTTP entry points.

mod dto;
pub mod error;
pub mod extract;
pub mod http;

pub use error::ApiError;
