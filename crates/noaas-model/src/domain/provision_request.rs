use url::Url;

use crate::{ModelError, ServiceName};

/// A validated request to provision a service.
///
/// The only way to obtain one is [`ProvisionRequest::new`], so every value in
/// circulation has a non-empty name and an absolute `http`/`https` source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    name: ServiceName,
    source_url: Url,
    execute_as_script: bool,
}

impl ProvisionRequest {
    pub fn new(
        name: impl Into<ServiceName>,
        source_url: &str,
        execute_as_script: bool,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }

        let parsed = Url::parse(source_url).map_err(|e| ModelError::InvalidUrl {
            url: source_url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ModelError::UnsupportedScheme {
                    url: source_url.to_string(),
                    scheme: other.to_string(),
                });
            }
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ModelError::InvalidUrl {
                url: source_url.to_string(),
                reason: "missing host".into(),
            });
        }

        Ok(Self {
            name,
            source_url: parsed,
            execute_as_script,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    /// Whether the fetched content is run as a shell script before serving.
    pub fn execute_as_script(&self) -> bool {
        self.execute_as_script
    }
}
