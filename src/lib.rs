//! `manapool-http` is an async client for the Manapool seller API.
//!
//! Every call goes through one pipeline: a shared token-bucket
//! [`RateLimiter`], bounded retries with exponential backoff on transport
//! failures and 5xx responses, and uniform decoding into typed results or a
//! [`ManapoolError`].
//!
//! ```no_run
//! # async fn run() -> manapool_http::Result<()> {
//! use manapool_http::{InventoryOptions, ManapoolClient};
//!
//! let client = ManapoolClient::from_env()?;
//! let account = client.get_seller_account().await?;
//! let page = client.get_seller_inventory(InventoryOptions::new(100, 0)).await?;
//! println!("{}: {} listings", account.username, page.pagination.total);
//! # Ok(())
//! # }
//! ```

mod account;
mod backoff;
mod client;
mod decode;
mod error;
mod inventory;
mod logger;
mod options;
mod orders;
mod prices;
mod rate_limit;
mod request;
mod timestamp;
mod types;
mod webhooks;

pub use backoff::{Backoff, Delays};
pub use client::{ClientBuilder, ManapoolClient, ACCESS_TOKEN_HEADER, EMAIL_HEADER};
pub use error::{ApiError, ManapoolError, NetworkError};
pub use inventory::{iterate_inventory, InventorySource};
#[cfg(feature = "tracing")]
pub use logger::TracingLogger;
pub use logger::{Logger, NoopLogger};
pub use options::{ClientOptions, DEFAULT_BASE_URL};
pub use rate_limit::{Cancelled, RateLimiter};
pub use request::ApiRequest;
pub use timestamp::Timestamp;
pub use types::*;

/// Re-exported so callers can bind a client without a direct dependency.
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, ManapoolError>;
