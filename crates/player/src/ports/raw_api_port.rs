//! Raw API Port - Object-safe HTTP boundary
//!
//! Bodies travel as `serde_json::Value` so the trait can live behind
//! `Arc<dyn RawApiPort>`. `LifeClient` adds the typed layer on top.
//!
//! Paths are relative to the versioned prefix and may carry a query string.
//! A `204 No Content` answer comes back as `Value::Null`.

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ClientError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RawApiPort: Send + Sync {
    async fn get_json(&self, path: &str, token: Option<String>) -> Result<Value, ClientError>;

    async fn post_json(
        &self,
        path: &str,
        token: Option<String>,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;

    async fn patch_json(
        &self,
        path: &str,
        token: Option<String>,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}
