use async_trait::async_trait;
use noaas_model::{ProvisionRequest, ServiceAddress};

use crate::error::ApiError;

/// Backend of the HTTP surface.
///
/// [`ProvisionerAdapter`](crate::ProvisionerAdapter) is the stock
/// implementation; tests and embedders can substitute their own.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Provision a service for an already validated request.
    async fn provision(&self, request: ProvisionRequest) -> Result<ServiceAddress, ApiError>;
}
