//! Core library for the Wi-Fi credential sender.
//! This crate defines the form codec for the device's provisioning portal,
//! a minimal plain-HTTP/1.1 exchange over TCP, and the one-shot send/probe
//! operations the CLI wraps.

pub mod form;
pub mod http;
pub mod sender;

// Define a shared Error and Result type for the entire crate.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed HTTP response: {0}")]
    MalformedResponse(String),

    #[error("form encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;
