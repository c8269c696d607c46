use std::time::Duration;

use async_trait::async_trait;
use noaas_model::{AllocationDetail, AllocationId, AllocationSummary, EvalId, Job, JobId};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use url::Url;

use crate::client::{SchedulerClient, Submission};
use crate::config::NomadConfig;
use crate::errors::SchedulerError;

const TOKEN_HEADER: &str = "X-Nomad-Token";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterJobRequest<'a> {
    job: &'a Job,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterJobResponse {
    #[serde(rename = "EvalID", default)]
    eval_id: String,
    #[serde(default)]
    job_modify_index: u64,
    #[serde(default)]
    warnings: String,
}

/// [`SchedulerClient`] backed by the Nomad HTTP API.
#[derive(Debug, Clone)]
pub struct NomadClient {
    http: Client,
    base: Url,
    token: Option<String>,
    namespace: Option<String>,
}

impl NomadClient {
    pub fn new(cfg: &NomadConfig) -> Result<Self, SchedulerError> {
        let invalid = |source| SchedulerError::InvalidAddress {
            address: cfg.address.clone(),
            source,
        };
        let base = Url::parse(&cfg.address).map_err(invalid)?;
        if base.cannot_be_a_base() {
            return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base,
            token: cfg.token.clone().filter(|t| !t.is_empty()),
            namespace: cfg.namespace.clone().filter(|n| !n.is_empty()),
        })
    }

    /// Appends `segments` to the base path (percent-encoding each one) and
    /// attaches the namespace, if any.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if let Some(ns) = &self.namespace {
            url.query_pairs_mut().append_pair("namespace", ns);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.header(TOKEN_HEADER, token.as_str()),
            None => req,
        }
    }

    async fn decode<T: DeserializeOwned>(
        op: &'static str,
        resp: Response,
    ) -> Result<T, SchedulerError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SchedulerError::Status {
                op,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl SchedulerClient for NomadClient {
    async fn submit(&self, job: &Job) -> Result<Submission, SchedulerError> {
        let url = self.endpoint(&["v1", "jobs"]);
        debug!(job_id = %job.id, name = %job.name, "registering job");

        let resp = self
            .request(Method::PUT, url)
            .json(&RegisterJobRequest { job })
            .send()
            .await?;
        let reg: RegisterJobResponse = Self::decode("job registration", resp).await?;

        if !reg.warnings.is_empty() {
            warn!(job_id = %job.id, warnings = %reg.warnings, "scheduler returned warnings");
        }
        debug!(
            job_id = %job.id,
            eval_id = %reg.eval_id,
            modify_index = reg.job_modify_index,
            "job registered"
        );

        Ok(Submission {
            job_id: job.id.clone(),
            eval_id: EvalId::from(reg.eval_id),
        })
    }

    async fn list_allocations(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<AllocationSummary>, SchedulerError> {
        let url = self.endpoint(&["v1", "job", job_id.as_str(), "allocations"]);
        let resp = self.request(Method::GET, url).send().await?;
        let allocs: Vec<AllocationSummary> = Self::decode("allocation listing", resp).await?;

        trace!(%job_id, count = allocs.len(), "listed allocations");
        Ok(allocs)
    }

    async fn get_allocation(
        &self,
        alloc_id: &AllocationId,
    ) -> Result<AllocationDetail, SchedulerError> {
        let url = self.endpoint(&["v1", "allocation", alloc_id.as_str()]);
        let resp = self.request(Method::GET, url).send().await?;
        let detail: AllocationDetail = Self::decode("allocation lookup", resp).await?;

        trace!(%alloc_id, status = %detail.client_status, "fetched allocation");
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, RawQuery};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use noaas_model::JOB_TYPE_SERVICE;
    use serde_json::{Value, json};

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(address: String) -> NomadClient {
        NomadClient::new(&NomadConfig {
            address,
            ..NomadConfig::default()
        })
        .unwrap()
    }

    fn job() -> Job {
        Job {
            id: JobId::from("job-1"),
            name: "hello".into(),
            job_type: JOB_TYPE_SERVICE.into(),
            datacenters: vec!["*".into()],
            meta: BTreeMap::new(),
            task_groups: vec![],
        }
    }

    type Seen = Arc<Mutex<Option<(HeaderMap, Option<String>, Value)>>>;

    #[tokio::test]
    async fn submit_wraps_job_and_sends_token_and_namespace() {
        let seen: Seen = Arc::default();
        let router = Router::new().route(
            "/v1/jobs",
            put({
                let seen = seen.clone();
                move |headers: HeaderMap, RawQuery(query): RawQuery, Json(body): Json<Value>| {
                    let seen = seen.clone();
                    async move {
                        *seen.lock().unwrap() = Some((headers, query, body));
                        Json(json!({"EvalID": "eval-1", "JobModifyIndex": 3, "Warnings": ""}))
                    }
                }
            }),
        );
        let base = serve(router).await;

        let client = NomadClient::new(&NomadConfig {
            address: base,
            token: Some("secret".into()),
            namespace: Some("web".into()),
            ..NomadConfig::default()
        })
        .unwrap();

        let submission = client.submit(&job()).await.unwrap();
        assert_eq!(submission.job_id.as_str(), "job-1");
        assert_eq!(submission.eval_id.as_str(), "eval-1");

        let (headers, query, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(headers.get(TOKEN_HEADER).unwrap(), "secret");
        assert_eq!(query.as_deref(), Some("namespace=web"));
        assert_eq!(body["Job"]["ID"], "job-1");
        assert_eq!(body["Job"]["Name"], "hello");
    }

    #[tokio::test]
    async fn submit_without_token_sends_no_header() {
        let seen: Seen = Arc::default();
        let router = Router::new().route(
            "/v1/jobs",
            put({
                let seen = seen.clone();
                move |headers: HeaderMap, RawQuery(query): RawQuery, Json(body): Json<Value>| {
                    let seen = seen.clone();
                    async move {
                        *seen.lock().unwrap() = Some((headers, query, body));
                        Json(json!({"EvalID": "eval-2"}))
                    }
                }
            }),
        );
        let client = client(serve(router).await);

        client.submit(&job()).await.unwrap();

        let (headers, query, _) = seen.lock().unwrap().take().unwrap();
        assert!(headers.get(TOKEN_HEADER).is_none());
        assert!(query.is_none());
    }

    #[tokio::test]
    async fn rejected_submission_carries_status_and_body() {
        let router = Router::new().route(
            "/v1/jobs",
            put(|| async { (StatusCode::FORBIDDEN, "Permission denied\n") }),
        );
        let client = client(serve(router).await);

        match client.submit(&job()).await {
            Err(SchedulerError::Status { op, status, body }) => {
                assert_eq!(op, "job registration");
                assert_eq!(status, 403);
                assert_eq!(body, "Permission denied");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lists_allocations_for_job() {
        let router = Router::new().route(
            "/v1/job/{id}/allocations",
            get(|Path(id): Path<String>| async move {
                Json(json!([
                    {"ID": "a-1", "JobID": id, "NodeID": "n-1", "ClientStatus": "pending"},
                    {"ID": "a-2", "JobID": id, "ClientStatus": "running"}
                ]))
            }),
        );
        let client = client(serve(router).await);

        let allocs = client.list_allocations(&JobId::from("job-1")).await.unwrap();
        assert_eq!(allocs.len(), 2);
        assert_eq!(allocs[0].id.as_str(), "a-1");
        assert_eq!(allocs[0].job_id.as_str(), "job-1");
        assert_eq!(allocs[1].client_status, "running");
    }

    #[tokio::test]
    async fn fetches_allocation_with_port_binding() {
        let router = Router::new().route(
            "/v1/allocation/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "ID": id,
                    "NodeID": "n-1",
                    "ClientStatus": "running",
                    "AllocatedResources": {
                        "Shared": {
                            "Networks": null,
                            "Ports": [{"Label": "www", "Value": 27890, "HostIP": "10.0.0.5"}]
                        }
                    }
                }))
            }),
        );
        let client = client(serve(router).await);

        let detail = client.get_allocation(&AllocationId::from("a-1")).await.unwrap();
        assert_eq!(detail.id.as_str(), "a-1");

        let addr = detail.port_binding("www").and_then(|b| b.to_address()).unwrap();
        assert_eq!(addr.url(), "http://10.0.0.5:27890");
    }

    #[tokio::test]
    async fn base_path_prefix_is_preserved() {
        let router = Router::new().route(
            "/proxy/v1/job/{id}/allocations",
            get(|| async { Json(json!([])) }),
        );
        let base = serve(router).await;
        let client = client(format!("{base}/proxy"));

        let allocs = client.list_allocations(&JobId::from("job-1")).await.unwrap();
        assert!(allocs.is_empty());
    }

    #[tokio::test]
    async fn unreachable_scheduler_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(format!("http://{addr}"));
        let err = client.submit(&job()).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Http(_)), "got {err:?}");
    }

    #[test]
    fn invalid_address_is_rejected() {
        let err = NomadClient::new(&NomadConfig {
            address: "not a url".into(),
            ..NomadConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidAddress { .. }));
        assert!(err.to_string().contains("not a url"));
    }
}
