use std::sync::Arc;

use async_trait::async_trait;
use noaas_core::Provisioner;
use noaas_model::{ProvisionRequest, ServiceAddress};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// [`ApiHandler`] that runs each provision on its own task.
///
/// The pipeline outlives the HTTP exchange: if the caller disconnects, the
/// submission and polling still run to completion. `shutdown` stops polling.
pub struct ProvisionerAdapter {
    provisioner: Arc<Provisioner>,
    shutdown: CancellationToken,
}

impl ProvisionerAdapter {
    pub fn new(provisioner: Arc<Provisioner>, shutdown: CancellationToken) -> Self {
        Self {
            provisioner,
            shutdown,
        }
    }
}

#[async_trait]
impl ApiHandler for ProvisionerAdapter {
    async fn provision(&self, request: ProvisionRequest) -> Result<ServiceAddress, ApiError> {
        let provisioner = Arc::clone(&self.provisioner);
        let shutdown = self.shutdown.clone();

        let task =
            tokio::spawn(async move { provisioner.provision(&request, &shutdown).await });

        match task.await {
            Ok(result) => result.map_err(ApiError::from),
            Err(e) => {
                error!(error = %e, "provisioning task aborted");
                Err(ApiError::Internal(e.to_string()))
            }
        }
    }
}
