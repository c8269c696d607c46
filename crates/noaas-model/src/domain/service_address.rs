use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Externally reachable `host:port` of a provisioned service.
///
/// Constructed only from a complete scheduler binding: `new` refuses an empty
/// host or a zero port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAddress")]
pub struct ServiceAddress {
    host: String,
    port: u16,
}

impl ServiceAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Option<Self> {
        let host = host.into();
        if host.is_empty() || port == 0 {
            return None;
        }
        Some(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address rendered as an `http://` URL, as handed back to callers.
    pub fn url(&self) -> String {
        format!("http://{self}")
    }
}

#[derive(Deserialize)]
struct RawAddress {
    host: String,
    port: u16,
}

impl TryFrom<RawAddress> for ServiceAddress {
    type Error = ModelError;

    fn try_from(raw: RawAddress) -> Result<Self, Self::Error> {
        Self::new(raw.host.clone(), raw.port).ok_or(ModelError::IncompleteAddress {
            host: raw.host,
            port: raw.port,
        })
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
