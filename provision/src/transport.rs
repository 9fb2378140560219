use crate::error::ProvisionResult;
use config::PlatformCredentials;
use reqwest::Client;
use std::time::Duration;

/// HTTP client for one platform endpoint.
///
/// Proxies are never used; certificate verification follows `tls_verify`.
pub fn build_http_client(credentials: &PlatformCredentials) -> ProvisionResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(credentials.timeout_seconds))
        .danger_accept_invalid_certs(!credentials.tls_verify)
        .no_proxy()
        .build()?;

    Ok(client)
}
