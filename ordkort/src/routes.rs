//! Function routes
//!
//! JSON endpoints under `/functions/v1`, shaped like serverless functions:
//! a JSON body in, `{ ok: true, ... }` or `{ error }` out, permissive CORS
//! on every response.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::pipeline::{DailyContentPipeline, GenerationRequest};
use crate::store::{StoreProvider, Stores};
use crate::weekly::generate_weekly_test;

pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DailyContentPipeline>,
    pub stores: StoreProvider,
}

impl AppState {
    pub fn new(pipeline: DailyContentPipeline, stores: StoreProvider) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            stores,
        }
    }

    fn stores_for(&self, headers: &HeaderMap) -> Stores {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        self.stores.for_caller(authorization)
    }
}

/// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/functions/v1/onCreateDailyWord", post(create_daily_word))
        .route("/functions/v1/weeklyTestGenerator", post(weekly_test_generator))
        .route("/functions/v1/approveDailyWord", post(approve_daily_word))
        .route("/functions/v1/submitTaskResult", post(submit_task_result))
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Answer preflight requests and add CORS headers to every response.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        let mut preflight = StatusCode::OK.into_response();
        preflight.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        preflight
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound("Not Found".to_string())
}

/// Parse a JSON body. Malformed JSON is an internal error, reported as-is.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, GatewayError> {
    Ok(serde_json::from_slice(body)?)
}

/// Present and non-blank.
fn field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_uuid(raw: &str, name: &str) -> Result<Uuid, GatewayError> {
    Uuid::parse_str(raw).map_err(|_| GatewayError::Validation(format!("Invalid {}", name)))
}

// === Health ===

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub mode: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        mode: state.stores.mode(),
    })
}

// === Daily content ===

#[derive(Debug, Deserialize)]
pub struct CreateDailyWordBody {
    pub classroom_id: Option<String>,
    pub norwegian: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub demo: Option<bool>,
}

impl CreateDailyWordBody {
    /// Validate into a pipeline request. Missing fields are checked before
    /// any field is parsed.
    pub fn into_request(self) -> Result<GenerationRequest, GatewayError> {
        let (Some(classroom_id), Some(word), Some(date)) =
            (field(self.classroom_id), field(self.norwegian), field(self.date))
        else {
            return Err(GatewayError::Validation("Missing fields".to_string()));
        };

        let date = lesson::parse_date(&date)
            .map_err(|_| GatewayError::Validation("Invalid date".to_string()))?;

        Ok(GenerationRequest {
            classroom_id: parse_uuid(&classroom_id, "classroom_id")?,
            date,
            word,
            theme: field(self.theme),
            demo: self.demo.unwrap_or(false),
        })
    }
}

/// POST /functions/v1/onCreateDailyWord
pub async fn create_daily_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let request = parse_body::<CreateDailyWordBody>(&body)?.into_request()?;
    let stores = state.stores_for(&headers);

    let outcome = state.pipeline.run(&stores, &request).await?;

    Ok(Json(json!({ "ok": true, "dailyword_id": outcome.content_id })))
}

// === Weekly test ===

#[derive(Debug, Deserialize)]
pub struct WeeklyTestBody {
    pub classroom_id: Option<String>,
}

/// POST /functions/v1/weeklyTestGenerator
pub async fn weekly_test_generator(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let body: WeeklyTestBody = parse_body(&body)?;
    let classroom_id = field(body.classroom_id)
        .ok_or_else(|| GatewayError::Validation("classroom_id required".to_string()))?;
    let classroom_id = parse_uuid(&classroom_id, "classroom_id")?;

    let stores = state.stores_for(&headers);
    let today = chrono::Utc::now().date_naive();
    generate_weekly_test(stores.records.as_ref(), classroom_id, today).await?;

    Ok(Json(json!({ "ok": true })))
}

// === Approval ===

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub dailyword_id: Option<String>,
}

/// POST /functions/v1/approveDailyWord
pub async fn approve_daily_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let body: ApproveBody = parse_body(&body)?;
    let id = field(body.dailyword_id)
        .ok_or_else(|| GatewayError::Validation("dailyword_id required".to_string()))?;
    let id = parse_uuid(&id, "dailyword_id")?;

    let stores = state.stores_for(&headers);
    if !stores.records.approve_content_item(id).await? {
        return Err(GatewayError::NotFound("Daily word not found".to_string()));
    }

    info!(content_id = %id, "Daily word approved");
    Ok(Json(json!({ "ok": true })))
}

// === Task results ===

#[derive(Debug, Deserialize)]
pub struct SubmitTaskResultBody {
    pub task_id: Option<String>,
    pub learner_id: Option<String>,
    #[serde(default)]
    pub response: Value,
}

/// POST /functions/v1/submitTaskResult
pub async fn submit_task_result(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let body: SubmitTaskResultBody = parse_body(&body)?;
    let (Some(task_id), Some(learner_id)) = (field(body.task_id), field(body.learner_id)) else {
        return Err(GatewayError::Validation(
            "task_id and learner_id required".to_string(),
        ));
    };
    let task_id = parse_uuid(&task_id, "task_id")?;
    let learner_id = parse_uuid(&learner_id, "learner_id")?;

    let stores = state.stores_for(&headers);
    let task = stores
        .records
        .task(task_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Task not found".to_string()))?;

    let score = lesson::score(task.kind, &task.answer, &body.response);
    stores
        .records
        .insert_task_result(&lesson::TaskResult {
            task_id,
            learner_id,
            response: body.response,
            score,
        })
        .await?;

    info!(%task_id, %learner_id, score, "Task result recorded");
    Ok(Json(json!({ "ok": true, "score": score })))
}
