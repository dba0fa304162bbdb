use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use plandraft_core::{Flags, TypedPlan, plan_json_schema};
use plandraft_generate::{GeneratePlanRequest, PlanOutcome, generate_plan};
use plandraft_validate::{ValidationReport, validate_plan, validate_typed};

use crate::CliError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ValidatePlanRequest {
    /// Raw plan document; kept as a value so graph-rule violations (not
    /// parse errors) are reported for unknown link types.
    plan: serde_json::Value,
    #[serde(default)]
    flags: Flags,
    /// Also run the JSON-Schema structural pass.
    #[serde(default)]
    schema_check: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn build_router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/generate-plan", post(generate_plan_endpoint))
        .route("/validate-plan", post(validate_plan_endpoint))
        .layer(CorsLayer::permissive())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(addr: &str) -> Result<(), CliError> {
    let app = build_router();
    let addr: SocketAddr = addr.parse()?;
    tracing::info!("plandraft serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("plandraft serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {err}");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_plan_endpoint(Json(request): Json<GeneratePlanRequest>) -> Response {
    match generate_plan(&request) {
        PlanOutcome::Plan(plan) => {
            tracing::info!(objectives = plan.objectives.len(), "plan generated");
            Json(plan).into_response()
        }
        PlanOutcome::Questions(questions) => {
            tracing::debug!(
                count = questions.clarifying_questions.len(),
                "clarifying questions returned"
            );
            Json(questions).into_response()
        }
        PlanOutcome::Rejected(rejection) => {
            tracing::warn!(errors = rejection.errors.len(), "generated plan rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(rejection)).into_response()
        }
    }
}

async fn validate_plan_endpoint(
    Json(request): Json<ValidatePlanRequest>,
) -> Result<Response, AppError> {
    let report = if request.schema_check {
        let schema = serde_json::to_value(plan_json_schema())
            .map_err(|err| AppError::internal(err.to_string()))?;
        match validate_plan(&request.plan, &schema, &request.flags) {
            Ok(_) => ValidationReport::from_errors(Vec::new()),
            Err(report) => report,
        }
    } else {
        // Plain deserialization, no shape pre-check: empty collections must
        // surface as batched validator errors, not a parse failure.
        let plan: TypedPlan = serde_json::from_value(request.plan.clone())
            .map_err(|err| AppError::bad_request(err.to_string()))?;
        validate_typed(&plan, &request.flags)
    };

    let status = if report.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(report)).into_response())
}
