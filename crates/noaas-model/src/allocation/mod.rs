//! Allocation state as reported by the scheduler.

use serde::{Deserialize, Serialize};

use crate::{AllocationId, JobId, NetworkResource, ServiceAddress};

/// Entry of a job's allocation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocationSummary {
    #[serde(rename = "ID")]
    pub id: AllocationId,
    #[serde(rename = "JobID")]
    pub job_id: JobId,
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    #[serde(default)]
    pub client_status: String,
}

/// Full allocation record, including the resources assigned at placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocationDetail {
    #[serde(rename = "ID")]
    pub id: AllocationId,
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    #[serde(default)]
    pub client_status: String,
    #[serde(default)]
    pub allocated_resources: Option<AllocatedResources>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocatedResources {
    #[serde(default)]
    pub shared: AllocatedSharedResources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocatedSharedResources {
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub networks: Vec<NetworkResource>,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub ports: Vec<AllocatedPortMapping>,
}

/// Group-level port mapping reported by newer schedulers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocatedPortMapping {
    pub label: String,
    #[serde(default)]
    pub value: u16,
    #[serde(rename = "HostIP", default)]
    pub host_ip: String,
}

/// Host and port the scheduler bound to a port label. Either part may still be
/// unset while placement is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    pub host: String,
    pub port: u16,
}

impl PortBinding {
    pub fn is_complete(&self) -> bool {
        !self.host.is_empty() && self.port > 0
    }

    /// `Some` only for a complete binding.
    pub fn to_address(&self) -> Option<ServiceAddress> {
        ServiceAddress::new(self.host.clone(), self.port)
    }
}

impl AllocationDetail {
    /// Binding for `label`, or `None` if the allocation declares no such port.
    ///
    /// Network dynamic ports are searched before group port mappings; the
    /// first complete binding wins, otherwise the first (incomplete) match is
    /// returned.
    pub fn port_binding(&self, label: &str) -> Option<PortBinding> {
        let shared = &self.allocated_resources.as_ref()?.shared;

        let from_networks = shared.networks.iter().flat_map(|network| {
            network
                .dynamic_ports
                .iter()
                .filter(move |port| port.label == label)
                .map(move |port| PortBinding {
                    host: network.ip.clone(),
                    port: port.value,
                })
        });
        let from_ports = shared
            .ports
            .iter()
            .filter(|mapping| mapping.label == label)
            .map(|mapping| PortBinding {
                host: mapping.host_ip.clone(),
                port: mapping.value,
            });

        let mut first = None;
        for binding in from_networks.chain(from_ports) {
            if binding.is_complete() {
                return Some(binding);
            }
            first.get_or_insert(binding);
        }
        first
    }
}
