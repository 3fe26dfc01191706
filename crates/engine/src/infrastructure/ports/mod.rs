//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::*;
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;
