//! Turns a submitted job into a reachable `host:port`.

use std::sync::Arc;
use std::time::Duration;

use noaas_model::{AllocationSummary, JobId, ServiceAddress, WWW_PORT_LABEL};
use noaas_nomad::SchedulerClient;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::ResolveError;

/// Floor applied to `poll_interval_ms`.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Delay between scheduler queries, never below [`MIN_POLL_INTERVAL`].
    pub poll_interval_ms: u64,
    /// Upper bound for the whole resolution, both phases included.
    pub max_wait_ms: u64,
}

impl ResolverConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            max_wait_ms: 300_000,
        }
    }
}

/// Polls the scheduler until the job's first allocation has a complete `www`
/// binding.
///
/// Only "not yet visible" conditions are retried: an empty allocation list and
/// a binding without host or port. Scheduler errors end the resolution.
pub struct AllocationResolver {
    scheduler: Arc<dyn SchedulerClient>,
    cfg: ResolverConfig,
}

impl AllocationResolver {
    pub fn new(scheduler: Arc<dyn SchedulerClient>, cfg: ResolverConfig) -> Self {
        Self { scheduler, cfg }
    }

    #[instrument(level = "debug", skip(self, cancel), fields(job_id = %job_id))]
    pub async fn resolve(
        &self,
        job_id: &JobId,
        cancel: &CancellationToken,
    ) -> Result<ServiceAddress, ResolveError> {
        let deadline = Instant::now() + self.cfg.max_wait();

        let alloc = self.first_allocation(job_id, deadline, cancel).await?;
        info!(
            alloc_id = %alloc.id,
            node_id = %alloc.node_id,
            client_status = %alloc.client_status,
            "allocation placed"
        );

        loop {
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }

            let detail = self.scheduler.get_allocation(&alloc.id).await?;
            let Some(binding) = detail.port_binding(WWW_PORT_LABEL) else {
                return Err(ResolveError::NoBinding {
                    alloc_id: alloc.id,
                    label: WWW_PORT_LABEL,
                });
            };
            if let Some(addr) = binding.to_address() {
                info!(alloc_id = %alloc.id, address = %addr, "service address resolved");
                return Ok(addr);
            }

            debug!(
                alloc_id = %alloc.id,
                host = %binding.host,
                port = binding.port,
                client_status = %detail.client_status,
                "binding not complete yet"
            );
            self.pause(deadline, cancel).await?;
        }
    }

    async fn first_allocation(
        &self,
        job_id: &JobId,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<AllocationSummary, ResolveError> {
        loop {
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }

            let allocs = self.scheduler.list_allocations(job_id).await?;
            if let Some(first) = allocs.into_iter().next() {
                return Ok(first);
            }

            debug!("no allocations yet");
            self.pause(deadline, cancel).await?;
        }
    }

    /// Sleeps one poll interval, clipped to the deadline.
    async fn pause(&self, deadline: Instant, cancel: &CancellationToken) -> Result<(), ResolveError> {
        let now = Instant::now();
        if now >= deadline {
            return Err(ResolveError::Timeout(self.cfg.max_wait()));
        }
        let wait = self.cfg.poll_interval().min(deadline - now);

        tokio::select! {
            _ = cancel.cancelled() => Err(ResolveError::Cancelled),
            _ = tokio::time::sleep(wait) => Ok(()),
        }
    }
}
