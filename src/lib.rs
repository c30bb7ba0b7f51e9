//! ServiceNow Table API client for Rust
//!
//! This crate provides an async client for the ServiceNow REST Table API with
//! basic authentication and a configurable guard that keeps POST/PUT/DELETE
//! requests from being transmitted during read-only exploration.
//!
//! # Example
//!
//! ```no_run
//! use sn_client::{models::RecordsQuery, SNClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SNClient::builder("dev12345.service-now.com", "admin", "password")
//!         .with_push_changes(false)
//!         .build()?;
//!
//!     let query = RecordsQuery::new().with_query("active=true").with_limit(10);
//!     let incidents = client.get_table_records("incident", &query).await?;
//!     println!("{incidents}");
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;


pub use client::{
    Method, PushObserver, SNClient, SNClientBuilder, TracingPushObserver, PUSH_DISABLED_WARNING,
};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result, ServiceError, EMPTY_FIELD};

#[doc(hidden)]
pub mod prelude {
    pub use crate::client::{Method, SNClient};
    pub use crate::error::{Error, Result, ServiceError};
    pub use crate::models::{DisplayValue, RecordOptions, RecordsQuery};
}
