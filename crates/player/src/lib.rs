//! Life System Player.
//!
//! A typed client for the engine's REST API plus a terminal dashboard.
//!
//! - `ports` - the object-safe HTTP boundary
//! - `infrastructure` - the reqwest adapter behind it
//! - `application` - typed client, session and errors
//! - `ui` - text rendering

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod ui;

pub use application::{ClientError, LifeClient, Session};
