//! # aq-axum
//!
//! Axum framework adapter for AllQuery RS.
//!
//! This crate serves any [`aq_core::StoreAdapter`] over HTTP:
//!
//! - One GET route per adapter, path chosen by the caller
//! - The `q` query parameter carries the JSON query config
//! - Query rejections map to 400, store failures to 500
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use aq_axum::AxumAdapter;
//! use aq_core::FrameworkAdapter;
//!
//! let adapter = AxumAdapter::new(Arc::new(store), "/users");
//! adapter.start(3000).await?;
//! ```

pub mod adapter;
pub mod error;

// Re-exports
pub use adapter::AxumAdapter;
pub use error::{ApiError, ApiResult};
