//! roster-api — REST API for roster balancing.
//!
//! Exposes the reconciliation driver over HTTP so a scheduler or an
//! operator can submit work items without the CLI.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/v1/reconcile` | Reconcile one work item |
//! | POST | `/api/v1/batch` | Reconcile `{ "data": [...] }` in order |
//! | GET | `/healthz` | Liveness probe |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use roster_client::RosterGateway;
use roster_sync::Reconciler;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub reconciler: Reconciler,
}

/// Build the complete API router.
pub fn build_router(gateway: Arc<dyn RosterGateway>) -> Router {
    let api_state = ApiState {
        reconciler: Reconciler::new(gateway),
    };

    let api_routes = Router::new()
        .route("/reconcile", post(handlers::reconcile))
        .route("/batch", post(handlers::batch))
        .with_state(api_state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}
