//! Adapter contracts
//!
//! The two seams of the system: a store adapter that validates, translates,
//! and executes query configs against a concrete backend, and a framework
//! adapter that exposes a store over some transport. Concrete backends
//! implement these traits; there is no way to instantiate the contract
//! itself.

use async_trait::async_trait;

use crate::config::QueryConfig;
use crate::error::StoreError;
use crate::schema::ModelSchema;

/// A concrete data store that can execute validated query configs.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// The attribute whitelist queries are checked against.
    fn schema(&self) -> &ModelSchema;

    /// Validate, translate, and execute a query config, returning matching
    /// rows as JSON objects.
    async fn execute(&self, config: &QueryConfig) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// A transport layer serving a store adapter.
#[async_trait]
pub trait FrameworkAdapter {
    /// Bind to `port` and serve until shutdown.
    async fn start(self, port: u16) -> std::io::Result<()>;
}
