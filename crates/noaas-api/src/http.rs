use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, put},
};
use noaas_model::ProvisionRequest;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::{debug, warn};

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Routes:
    /// - GET / - health
    /// - PUT /v1/services/{name} - provision a service
    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(health))
            .route("/v1/services/{name}", put(provision_service::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProvisionBody {
    url: String,
    #[serde(deserialize_with = "bool_or_string")]
    script: bool,
}

/// Body of every `/v1/services` response; exactly one field is non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub url: Option<String>,
    pub error: Option<String>,
}

impl ServiceResponse {
    pub fn success(url: String) -> Self {
        Self {
            url: Some(url),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            url: None,
            error: Some(error),
        }
    }
}

/// Accepts `true`/`false` as JSON booleans or as strings.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a boolean or the string \"true\" or \"false\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_any(Visitor)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
async fn health() -> &'static str {
    "OK"
}

/// PUT /v1/services/{name}
async fn provision_service<H>(
    State(handler): State<Arc<H>>,
    Path(name): Path<String>,
    body: Result<Json<ProvisionBody>, JsonRejection>,
) -> Result<Json<ServiceResponse>, ApiError>
where
    H: ApiHandler,
{
    let Json(body) = body.map_err(|rejection| {
        warn!(%name, error = %rejection.body_text(), "rejected request body");
        ApiError::InvalidRequest(rejection.body_text())
    })?;

    let request = ProvisionRequest::new(name, &body.url, body.script).inspect_err(|e| {
        warn!(error = %e, "rejected request");
    })?;
    debug!(name = %request.name(), url = %request.source_url(), "provision requested");

    let addr = handler.provision(request).await?;
    Ok(Json(ServiceResponse::success(addr.url())))
}
