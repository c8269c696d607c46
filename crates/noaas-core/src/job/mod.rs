//! Construction of the scheduler job that serves rendered content.

use std::collections::BTreeMap;

use noaas_model::{
    DockerConfig, JOB_TYPE_SERVICE, Job, JobId, NetworkResource, Resources, Service, Task,
    TaskGroup, Template, WWW_PORT_LABEL,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

const GROUP_NAME: &str = "servers";
const TASK_NAME: &str = "web";
const DRIVER: &str = "docker";
const SERVICE_PROVIDER: &str = "nomad";
const DOCROOT: &str = "/local";
const INDEX_PATH: &str = "local/index.html";

/// Container image and resources of the serving task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTemplate {
    pub image: String,
    pub cpu_mhz: u32,
    pub memory_mb: u32,
}

impl Default for JobTemplate {
    fn default() -> Self {
        Self {
            image: "busybox:1".to_string(),
            cpu_mhz: 50,
            memory_mb: 64,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobBuilder {
    template: JobTemplate,
}

impl JobBuilder {
    pub fn new(template: JobTemplate) -> Self {
        Self { template }
    }

    /// Job named `name` whose single task serves `content` as `index.html`.
    ///
    /// Every call yields a fresh job id. The content is embedded between
    /// delimiters unique to the job, so template syntax inside it is served
    /// literally.
    pub fn build(&self, name: &str, content: &str) -> Job {
        let id = Uuid::new_v4();
        let tag = Uuid::new_v4().simple();

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        let task = Task {
            name: TASK_NAME.to_string(),
            driver: DRIVER.to_string(),
            config: DockerConfig {
                image: self.template.image.clone(),
                command: Some("httpd".to_string()),
                args: vec![
                    "-v".to_string(),
                    "-f".to_string(),
                    "-p".to_string(),
                    format!("${{NOMAD_PORT_{WWW_PORT_LABEL}}}"),
                    "-h".to_string(),
                    DOCROOT.to_string(),
                ],
                ports: vec![WWW_PORT_LABEL.to_string()],
            },
            templates: vec![Template {
                embedded_tmpl: content.to_string(),
                dest_path: INDEX_PATH.to_string(),
                left_delim: Some(format!("{{{{noaas-{tag}")),
                right_delim: Some(format!("noaas-{tag}}}}}")),
            }],
            resources: Resources {
                cpu: self.template.cpu_mhz,
                memory_mb: self.template.memory_mb,
            },
        };

        Job {
            id: JobId::from(id.to_string()),
            name: name.to_string(),
            job_type: JOB_TYPE_SERVICE.to_string(),
            datacenters: vec!["*".to_string()],
            meta: BTreeMap::from([("CreatedAt".to_string(), created_at)]),
            task_groups: vec![TaskGroup {
                name: GROUP_NAME.to_string(),
                count: 1,
                networks: vec![NetworkResource::dynamic(WWW_PORT_LABEL)],
                services: vec![Service {
                    name: String::new(),
                    provider: SERVICE_PROVIDER.to_string(),
                    port_label: WWW_PORT_LABEL.to_string(),
                }],
                tasks: vec![task],
            }],
        }
    }
}
