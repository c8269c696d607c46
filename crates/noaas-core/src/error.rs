use std::time::Duration;

use noaas_exec::ExecError;
use noaas_model::AllocationId;
use noaas_nomad::SchedulerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("allocation {alloc_id} exposes no `{label}` port")]
    NoBinding {
        alloc_id: AllocationId,
        label: &'static str,
    },

    #[error("no address observed within {0:?}")]
    Timeout(Duration),

    #[error("cancelled while waiting for allocation")]
    Cancelled,
}

/// Failure of one provisioning run, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("execution: {0}")]
    Execution(#[from] ExecError),

    #[error("submission: {0}")]
    Submission(#[from] SchedulerError),

    #[error("resolution: {0}")]
    Resolution(#[from] ResolveError),
}

impl ProvisionError {
    pub fn stage(&self) -> &'static str {
        match self {
            ProvisionError::Fetch(_) => "fetch",
            ProvisionError::Execution(_) => "execution",
            ProvisionError::Submission(_) => "submission",
            ProvisionError::Resolution(_) => "resolution",
        }
    }
}
