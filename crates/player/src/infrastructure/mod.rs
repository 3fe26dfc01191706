//! Infrastructure adapters.

pub mod http_client;
