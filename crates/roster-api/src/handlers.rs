//! REST API handlers.
//!
//! Work items are processed to completion before the response is sent.
//! A course whose reads fail still answers 200: its status line carries
//! the error, the same as in batch output.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use roster_core::{BatchPayload, WorkItem};
use roster_sync::run_batch;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ItemStatus {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct BatchStatus {
    pub statuses: Vec<String>,
    /// `statuses` joined by newlines.
    pub status: String,
}

/// POST /api/v1/reconcile
pub async fn reconcile(
    State(state): State<ApiState>,
    Json(item): Json<WorkItem>,
) -> impl IntoResponse {
    info!(course = %item.course_id, "reconcile requested");
    let mut rng = StdRng::from_entropy();
    let status = state.reconciler.run_item(&item, &mut rng).await;
    ApiResponse::ok(ItemStatus { status })
}

/// POST /api/v1/batch
pub async fn batch(
    State(state): State<ApiState>,
    Json(payload): Json<BatchPayload>,
) -> impl IntoResponse {
    info!(items = payload.data.len(), "batch requested");
    let mut rng = StdRng::from_entropy();
    let outcome = run_batch(&state.reconciler, &payload.data, &mut rng).await;
    let status = outcome.text();
    ApiResponse::ok(BatchStatus {
        statuses: outcome.statuses,
        status,
    })
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
