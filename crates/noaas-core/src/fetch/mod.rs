//! Retrieval of the content a service will serve.

mod http;
pub use http::HttpFetcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;

/// Body of a successful fetch together with the status that was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPayload {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedPayload {
    /// Body as text. Valid UTF-8 is passed through unchanged; anything else is
    /// decoded lossily.
    pub fn into_text(self) -> String {
        match String::from_utf8(self.body) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

#[async_trait]
pub trait ContentFetcher: Send + Sync + 'static {
    /// Single GET of `url`; succeeds only on `200 OK`.
    async fn fetch(&self, url: &Url) -> Result<FetchedPayload, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}
