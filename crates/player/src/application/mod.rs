//! Application layer: the typed client and what it needs.

mod client;
pub mod dashboard;
mod error;
mod session;

pub use client::LifeClient;
pub use error::ClientError;
pub use session::Session;
