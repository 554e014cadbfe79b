//! Shared HTTP client construction

use std::time::Duration;
use tracing::debug;

/// Build the client shared by every HTTP adapter.
///
/// The timeout bounds each whole request, connect included.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    debug!("Building HTTP client with {}s timeout", timeout.as_secs());
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("orchestra/", env!("CARGO_PKG_VERSION")))
        .build()
}
