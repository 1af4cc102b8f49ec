//! One-shot operations against the device's provisioning portal.

use std::time::Duration;

use tracing::debug;

use crate::form::Credentials;
use crate::http::{self, HttpResponse};
use crate::Result;

/// The address the device assigns itself in AP mode.
pub const DEFAULT_HOST: &str = "192.168.4.1";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// POST the credentials to `http://host:port/` as a form body.
///
/// Exactly one attempt: no retries, no redirects, no TLS. Any transport or
/// parse failure surfaces as an error; a completed non-200 exchange does not.
pub async fn send_credentials(
    host: &str,
    port: u16,
    credentials: &Credentials,
    limit: Duration,
) -> Result<HttpResponse> {
    let body = credentials.to_form_body()?;
    debug!(ssid = %credentials.ssid, %host, port, "sending credentials");
    let request = http::build_request("POST", host, port, Some(&body));
    http::exchange(host, port, &request, limit).await
}

/// GET the portal's form page without posting anything. Useful to check
/// the AP is up and serving before handing it credentials.
pub async fn probe(host: &str, port: u16, limit: Duration) -> Result<HttpResponse> {
    debug!(%host, port, "probing portal");
    let request = http::build_request("GET", host, port, None);
    http::exchange(host, port, &request, limit).await
}
