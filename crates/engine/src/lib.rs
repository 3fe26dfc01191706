//! Life System Engine library.
//!
//! This crate contains all server-side code for the Life System.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over domain aggregates
//! - `infrastructure/` - Port traits and their SQLite, clock and security adapters
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
