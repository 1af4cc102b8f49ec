//! A deliberately small HTTP/1.1 client: one request, `Connection: close`,
//! read to EOF. The portal on the device speaks nothing fancier and this
//! keeps the whole exchange bounded by a single timeout per phase.

use std::borrow::Cow;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::{Error, Result};

/// A parsed portal response: status line plus whatever body followed.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as text, invalid bytes replaced rather than rejected.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Build a request for `/` on the given host. A `Some` body turns it into
/// a form POST; `None` is a plain GET. The `Host` header names the port
/// only when it differs from the default, as HTTP/1.1 clients do.
pub(crate) fn build_request(method: &str, host: &str, port: u16, body: Option<&str>) -> String {
    let mut request = if port == 80 {
        format!("{method} / HTTP/1.1\r\nHost: {host}\r\n")
    } else {
        format!("{method} / HTTP/1.1\r\nHost: {host}:{port}\r\n")
    };
    if let Some(body) = body {
        request.push_str("Content-Type: application/x-www-form-urlencoded\r\n");
        request.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    request.push_str("Connection: close\r\n\r\n");
    if let Some(body) = body {
        request.push_str(body);
    }
    request
}

/// Parse the raw bytes read off the socket into status, reason and body.
pub(crate) fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    if raw.is_empty() {
        return Err(Error::MalformedResponse(
            "connection closed before any response".into(),
        ));
    }

    let header_end = raw
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .ok_or_else(|| Error::MalformedResponse("missing header terminator".into()))?;

    let head = String::from_utf8_lossy(&raw[..header_end]);
    let status_line = head.lines().next().unwrap_or_default();

    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(Error::MalformedResponse(format!(
            "invalid status line: {status_line:?}"
        )));
    }

    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            Error::MalformedResponse(format!("invalid status code in {status_line:?}"))
        })?;
    let reason = parts.next().unwrap_or_default().to_string();

    Ok(HttpResponse {
        status,
        reason,
        body: raw[header_end + 4..].to_vec(),
    })
}

/// Perform a single exchange against `host:port`.
///
/// Connect, write and read are each bounded by `limit`. The stream is owned
/// by this function, so the connection is dropped on every exit path.
pub async fn exchange(
    host: &str,
    port: u16,
    request: &str,
    limit: Duration,
) -> Result<HttpResponse> {
    debug!(%host, port, "connecting");
    let mut stream = timeout(limit, TcpStream::connect((host, port)))
        .await
        .map_err(|_| Error::Timeout(limit))?
        .map_err(Error::Connect)?;

    timeout(limit, stream.write_all(request.as_bytes()))
        .await
        .map_err(|_| Error::Timeout(limit))??;

    // `Connection: close` was requested, so EOF delimits the response.
    let mut raw = Vec::new();
    timeout(limit, stream.read_to_end(&mut raw))
        .await
        .map_err(|_| Error::Timeout(limit))??;

    debug!(bytes = raw.len(), "response read");
    parse_response(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_request_carries_form_headers_and_body() {
        let request = build_request("POST", "192.168.4.1", 80, Some("ssid=a&pass=b"));
        assert!(request.starts_with("POST / HTTP/1.1\r\n"));
        assert!(request.contains("Host: 192.168.4.1\r\n"));
        assert!(request.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
        assert!(request.contains("Content-Length: 13\r\n"));
        assert!(request.contains("Connection: close\r\n"));
        assert!(request.ends_with("\r\n\r\nssid=a&pass=b"));
    }

    #[test]
    fn get_request_has_no_body_headers() {
        let request = build_request("GET", "192.168.4.1", 80, None);
        assert!(request.starts_with("GET / HTTP/1.1\r\n"));
        assert!(!request.contains("Content-Length"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn host_header_names_a_non_default_port() {
        let request = build_request("POST", "192.168.4.1", 8080, Some("ssid=a&pass="));
        assert!(request.contains("Host: 192.168.4.1:8080\r\n"));

        let default = build_request("POST", "192.168.4.1", 80, Some("ssid=a&pass="));
        assert!(default.contains("Host: 192.168.4.1\r\n"));
        assert!(!default.contains("Host: 192.168.4.1:80"));
    }

    #[test]
    fn parses_ok_response_with_body() {
        let response = parse_response(b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nhello").unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.reason, "OK");
        assert_eq!(response.body, b"hello");
        assert!(response.is_success());
    }

    #[test]
    fn parses_forbidden_response() {
        let response = parse_response(b"HTTP/1.1 403 Forbidden\r\n\r\n").unwrap();
        assert_eq!(response.status, 403);
        assert_eq!(response.reason, "Forbidden");
        assert!(response.body.is_empty());
        assert!(!response.is_success());
    }

    #[test]
    fn reason_phrase_may_be_absent() {
        let response = parse_response(b"HTTP/1.1 204\r\n\r\n").unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(response.reason, "");
    }

    #[test]
    fn rejects_non_http_bytes() {
        let err = parse_response(b"<html>definitely not http</html>\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn rejects_empty_response() {
        let err = parse_response(b"").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn body_text_replaces_invalid_utf8() {
        let response = parse_response(b"HTTP/1.1 200 OK\r\n\r\nok\xff!").unwrap();
        assert_eq!(response.body_text(), "ok\u{fffd}!");
    }
}
