use serde::{Deserialize, Serialize};

/// Credentials for the network being provisioned, keyed the way the
/// device's portal parses them (`ssid` and `pass`).
///
/// The portal does not validate ssid non-emptiness and neither do we;
/// an empty password is legal (open networks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub ssid: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(ssid: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            pass: pass.into(),
        }
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> crate::Result<String> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}
