use async_trait::async_trait;
use noaas_model::{AllocationDetail, AllocationId, AllocationSummary, EvalId, Job, JobId};

use crate::errors::SchedulerError;

/// Outcome of a job registration: the job id and the evaluation the scheduler
/// queued for it. Acceptance says nothing about placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: JobId,
    pub eval_id: EvalId,
}

/// Submission and allocation queries against the scheduler.
#[async_trait]
pub trait SchedulerClient: Send + Sync + 'static {
    /// Register `job`.
    async fn submit(&self, job: &Job) -> Result<Submission, SchedulerError>;

    /// Allocations currently known for `job_id`; empty until placement starts.
    async fn list_allocations(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<AllocationSummary>, SchedulerError>;

    /// Full allocation record including assigned network resources.
    async fn get_allocation(
        &self,
        alloc_id: &AllocationId,
    ) -> Result<AllocationDetail, SchedulerError>;
}
