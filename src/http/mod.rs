//! HTTP transport and retry policy behind the currency client.

mod retry;
mod transport;

pub use retry::{DEFAULT_RETRIES, RetryPolicy};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{HttpTransport, Transport, USER_AGENT};
