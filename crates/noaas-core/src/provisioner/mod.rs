use std::sync::Arc;

use noaas_exec::ScriptExecutor;
use noaas_model::{ProvisionRequest, ServiceAddress};
use noaas_nomad::SchedulerClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ProvisionError;
use crate::fetch::ContentFetcher;
use crate::job::{JobBuilder, JobTemplate};
use crate::resolver::{AllocationResolver, ResolverConfig};

/// Fetch, optionally execute, build a job, submit it and resolve its address.
///
/// Holds only shared, immutable collaborators; one instance serves any number
/// of concurrent provisions.
pub struct Provisioner {
    fetcher: Arc<dyn ContentFetcher>,
    executor: ScriptExecutor,
    builder: JobBuilder,
    scheduler: Arc<dyn SchedulerClient>,
    resolver: AllocationResolver,
}

impl Provisioner {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, scheduler: Arc<dyn SchedulerClient>) -> Self {
        Self {
            fetcher,
            executor: ScriptExecutor::default(),
            builder: JobBuilder::default(),
            resolver: AllocationResolver::new(scheduler.clone(), ResolverConfig::default()),
            scheduler,
        }
    }

    #[inline]
    pub fn with_executor(mut self, executor: ScriptExecutor) -> Self {
        self.executor = executor;
        self
    }

    #[inline]
    pub fn with_job_template(mut self, template: JobTemplate) -> Self {
        self.builder = JobBuilder::new(template);
        self
    }

    #[inline]
    pub fn with_resolver_config(mut self, cfg: ResolverConfig) -> Self {
        self.resolver = AllocationResolver::new(self.scheduler.clone(), cfg);
        self
    }

    /// Runs the pipeline for `request`, stopping at the first failing stage.
    ///
    /// Cancellation only interrupts address resolution; a job that was already
    /// submitted is left running.
    #[instrument(
        level = "info",
        skip(self, request, cancel),
        fields(name = %request.name(), script = request.execute_as_script())
    )]
    pub async fn provision(
        &self,
        request: &ProvisionRequest,
        cancel: &CancellationToken,
    ) -> Result<ServiceAddress, ProvisionError> {
        let result = self.run(request, cancel).await;
        if let Err(e) = &result {
            warn!(stage = e.stage(), error = %e, "provisioning failed");
        }
        result
    }

    async fn run(
        &self,
        request: &ProvisionRequest,
        cancel: &CancellationToken,
    ) -> Result<ServiceAddress, ProvisionError> {
        let payload = self.fetcher.fetch(request.source_url()).await?;
        debug!(bytes = payload.body.len(), "content fetched");

        let content = if request.execute_as_script() {
            self.executor.execute(&payload.body).await?
        } else {
            payload.into_text()
        };

        let job = self.builder.build(request.name(), &content);
        let submission = self.scheduler.submit(&job).await?;
        info!(
            job_id = %submission.job_id,
            eval_id = %submission.eval_id,
            "job submitted"
        );

        let addr = self.resolver.resolve(&submission.job_id, cancel).await?;
        info!(job_id = %submission.job_id, url = %addr.url(), "service provisioned");
        Ok(addr)
    }
}
