//! Defines routes for the bottle resource and health probes.
//!
//! ## Structure
//! - **Health endpoints** (no authentication)
//!   - `GET    /healthz` — liveness
//!   - `GET    /readyz`  — database readiness
//!
//! - **Bottle endpoints** (caller resolved from the bearer token)
//!   - `POST   /api/bottles`       — create bottle
//!   - `GET    /api/bottles`       — list caller's bottles, newest first
//!   - `GET    /api/bottles/stats` — dashboard counters (other methods: 404)
//!   - `PUT    /api/bottles/{id}`  — partial update
//!   - `DELETE /api/bottles/{id}`  — hard delete

use crate::{
    handlers::{
        bottle_handlers::{
            bottle_not_found, cellar_stats, create_bottle, delete_bottle, list_bottles,
            update_bottle,
        },
        health_handlers::{healthz, readyz},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, put},
};

/// Build and return the router for all cellar routes.
///
/// The router carries shared state (`AppState`); handlers pull the pieces
/// they need through `FromRef`.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Bottle routes
        .route("/api/bottles", get(list_bottles).post(create_bottle))
        // `stats` shadows `{id}`; other methods answer like any unknown id
        .route("/api/bottles/stats", get(cellar_stats).fallback(bottle_not_found))
        .route("/api/bottles/{id}", put(update_bottle).delete(delete_bottle))
}

/// Router with state attached, ready to serve.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}
