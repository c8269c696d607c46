//! Scripted scheduler double.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use noaas_model::{
    AllocatedResources, AllocatedSharedResources, AllocationDetail, AllocationId,
    AllocationSummary, EvalId, Job, JobId, NetworkResource, Port,
};
use noaas_nomad::{SchedulerClient, SchedulerError, Submission};

/// Replays queued responses in order; the last one repeats forever.
#[derive(Default)]
pub(crate) struct FakeScheduler {
    listings: Mutex<VecDeque<Vec<AllocationSummary>>>,
    details: Mutex<VecDeque<AllocationDetail>>,
    reject: Option<u16>,

    pub(crate) submitted: Mutex<Vec<Job>>,
    pub(crate) requested_allocations: Mutex<Vec<String>>,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) detail_calls: AtomicUsize,
}

impl FakeScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `status`.
    pub(crate) fn rejecting(status: u16) -> Self {
        Self {
            reject: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn with_listings(self, listings: Vec<Vec<AllocationSummary>>) -> Self {
        *self.listings.lock().unwrap() = listings.into();
        self
    }

    pub(crate) fn with_details(self, details: Vec<AllocationDetail>) -> Self {
        *self.details.lock().unwrap() = details.into();
        self
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn rejection(&self, op: &'static str) -> Result<(), SchedulerError> {
        match self.reject {
            Some(status) => Err(SchedulerError::Status {
                op,
                status,
                body: "scripted failure".into(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SchedulerClient for FakeScheduler {
    async fn submit(&self, job: &Job) -> Result<Submission, SchedulerError> {
        self.rejection("job registration")?;
        self.submitted.lock().unwrap().push(job.clone());
        Ok(Submission {
            job_id: job.id.clone(),
            eval_id: EvalId::from(format!("eval-{}", job.id)),
        })
    }

    async fn list_allocations(
        &self,
        _job_id: &JobId,
    ) -> Result<Vec<AllocationSummary>, SchedulerError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.rejection("allocation listing")?;
        Ok(Self::next(&self.listings).unwrap_or_default())
    }

    async fn get_allocation(
        &self,
        alloc_id: &AllocationId,
    ) -> Result<AllocationDetail, SchedulerError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.rejection("allocation lookup")?;
        self.requested_allocations
            .lock()
            .unwrap()
            .push(alloc_id.to_string());
        Self::next(&self.details).ok_or(SchedulerError::Status {
            op: "allocation lookup",
            status: 404,
            body: "alloc not found".into(),
        })
    }
}

pub(crate) fn summary(id: &str, job_id: &str) -> AllocationSummary {
    AllocationSummary {
        id: AllocationId::from(id),
        job_id: JobId::from(job_id),
        node_id: "node-1".into(),
        client_status: "pending".into(),
    }
}

pub(crate) fn detail_with_www(id: &str, host: &str, port: u16) -> AllocationDetail {
    detail(id, "www", host, port)
}

pub(crate) fn detail_without_www(id: &str) -> AllocationDetail {
    detail(id, "admin", "10.0.0.5", 9000)
}

fn detail(id: &str, label: &str, host: &str, port: u16) -> AllocationDetail {
    AllocationDetail {
        id: AllocationId::from(id),
        node_id: "node-1".into(),
        client_status: "running".into(),
        allocated_resources: Some(AllocatedResources {
            shared: AllocatedSharedResources {
                networks: vec![NetworkResource {
                    ip: host.into(),
                    dynamic_ports: vec![Port {
                        label: label.into(),
                        value: port,
                    }],
                }],
                ports: vec![],
            },
        }),
    }
}
