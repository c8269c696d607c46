//! Declarative job description in the scheduler's (Nomad) JSON shape.
//!
//! Only the subset of the job specification that provisioning needs is modelled.
//! Field names follow the scheduler API (`PascalCase`, with a few acronyms).

mod task;
pub use task::{DockerConfig, Resources, Task, Template};

mod network;
pub use network::{NetworkResource, Port, Service};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::JobId;

/// Job type for long-running services.
pub const JOB_TYPE_SERVICE: &str = "service";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    #[serde(rename = "ID")]
    pub id: JobId,
    pub name: String,
    #[serde(rename = "Type")]
    pub job_type: String,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub datacenters: Vec<String>,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub meta: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub task_groups: Vec<TaskGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskGroup {
    pub name: String,
    pub count: u32,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub networks: Vec<NetworkResource>,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub services: Vec<Service>,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub tasks: Vec<Task>,
}
