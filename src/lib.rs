//! Client library for the OpenCurrencyX exchange-rate API.
//!
//! [`OpenCurrencyX`] wraps five GET endpoints (status, currencies, rates,
//! convert, history). Each call is retried up to the configured number of
//! times and returns the service's JSON response untouched.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use opencurrencyx::{ClientConfig, OpenCurrencyX};
//!
//! let client = OpenCurrencyX::new(ClientConfig::default())?;
//! let quote = client.convert("USD", "EUR", 100.0).await?;
//! println!("{}", quote["result"]);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod commands;
pub mod error;
pub mod http;
pub mod runtime;

pub use client::{ClientConfig, DEFAULT_BASE_URL, OpenCurrencyX};
pub use error::ClientError;
