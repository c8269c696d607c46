use serde::{Deserialize, Serialize};

/// Network request (in a job) or network assignment (in an allocation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkResource {
    #[serde(rename = "IP", default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub dynamic_ports: Vec<Port>,
}

impl NetworkResource {
    /// Network requesting a single scheduler-chosen port under `label`.
    pub fn dynamic(label: impl Into<String>) -> Self {
        Self {
            ip: String::new(),
            dynamic_ports: vec![Port {
                label: label.into(),
                value: 0,
            }],
        }
    }
}

/// A labeled port. `value` is zero until the scheduler assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Port {
    pub label: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub value: u16,
}

fn is_zero(v: &u16) -> bool {
    *v == 0
}

/// Service registration bound to a port label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub provider: String,
    pub port_label: String,
}
