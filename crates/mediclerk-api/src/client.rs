use std::time::Duration;

use crate::error::ApiError;

/// Shared HTTP client handed to every service.
pub type HttpClient = reqwest::Client;

/// Build the shared HTTP client. `timeout` of `None` keeps the transport
/// default.
pub fn build_client(timeout: Option<Duration>) -> Result<HttpClient, ApiError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        "mediclerk/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build().map_err(|e| ApiError::Config(e.to_string()))
}
