use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::fetch::{ContentFetcher, FetchConfig, FetchedPayload};

/// [`ContentFetcher`] over a shared `reqwest` client. No retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(cfg: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<FetchedPayload, FetchError> {
        let resp = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(bytes = body.len(), "fetched content");

        Ok(FetchedPayload {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}
