use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NomadConfig {
    /// Base URL of the Nomad HTTP API.
    pub address: String,
    /// ACL token sent as `X-Nomad-Token`.
    pub token: Option<String>,
    pub namespace: Option<String>,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for NomadConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:4646".to_string(),
            token: None,
            namespace: None,
            timeout_ms: 10_000,
        }
    }
}
