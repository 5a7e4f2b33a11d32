//! HTTP read surface.
//!
//! `GET /api/v1/{resource}` and `GET /api/v1/{resource}/{id}` serve resolved
//! content for `?lang=`; `GET /health` reports the environment and cache
//! statistics.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_LANGUAGE, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::CacheStats;
use crate::config::Environment;
use crate::content::ResourceKind;
use crate::delivery::{ContentDelivery, Delivered, DeliveryError};

const X_CACHE: &str = "x-cache";

#[derive(Clone)]
pub struct AppState {
    pub delivery: Arc<ContentDelivery>,
    pub environment: Environment,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/:resource", get(get_resource))
        .route("/api/v1/:resource/:id", get(get_record))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    environment: Environment,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        environment: state.environment,
        cache: state.delivery.cache().stats(),
    })
}

async fn get_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Response, ApiError> {
    let resource = parse_resource(&resource)?;
    deliver(&state, resource, None, query.lang.as_deref())
}

async fn get_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Query(query): Query<LangQuery>,
) -> Result<Response, ApiError> {
    let resource = parse_resource(&resource)?;
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid id '{}'", id)))?;
    deliver(&state, resource, Some(id), query.lang.as_deref())
}

fn parse_resource(name: &str) -> Result<ResourceKind, ApiError> {
    name.parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown resource '{}'", name)))
}

fn deliver(
    state: &AppState,
    resource: ResourceKind,
    id: Option<i64>,
    lang: Option<&str>,
) -> Result<Response, ApiError> {
    let requested = lang.unwrap_or_else(|| state.delivery.registry().default_language().code());
    let delivered = state.delivery.fetch(resource, id, requested)?;
    json_response(delivered, state.environment)
}

fn json_response(delivered: Delivered, environment: Environment) -> Result<Response, ApiError> {
    let content_language = header_value(delivered.language.code())?;
    let cache_status = HeaderValue::from_static(delivered.status.as_str());

    let mut response = Response::new(Body::from(delivered.payload));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_LANGUAGE, content_language);
    headers.insert(HeaderName::from_static(X_CACHE), cache_status);

    if environment != Environment::Development {
        let max_age = format!("public, max-age={}", delivered.ttl.as_secs());
        headers.insert(CACHE_CONTROL, header_value(&max_age)?);
    }

    Ok(response)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| ApiError::Internal(e.to_string()))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::NotFound { .. } | DeliveryError::NotConfigured { .. } => {
                ApiError::NotFound(err.to_string())
            }
            DeliveryError::IdOnSingleton { .. } => ApiError::BadRequest(err.to_string()),
            DeliveryError::MissingDateRange { .. }
            | DeliveryError::Source(_)
            | DeliveryError::Serialize(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        if status.is_client_error() {
            warn!("Rejected request: {}", detail);
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}
