//! HTTP handlers for the bottle resource.
//! Every handler resolves the caller through `AuthUser` first and delegates
//! validation and ownership to `BottleService`. Failures are logged once,
//! at the level matching their outcome, when they become an `AppError`.

use crate::{
    auth::AuthUser,
    errors::AppError,
    extract::JsonBody,
    models::{
        bottle::{Bottle, BottlePatch, NewBottle},
        stats::CellarStats,
    },
    services::bottle_service::BottleService,
};
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

/// POST `/api/bottles` — add a bottle for the caller.
pub async fn create_bottle(
    State(service): State<BottleService>,
    AuthUser(user): AuthUser,
    JsonBody(body): JsonBody<NewBottle>,
) -> Result<Json<Bottle>, AppError> {
    info!("POST /api/bottles - user {}", user);
    let bottle = service.create(&user, body).await?;
    Ok(Json(bottle))
}

/// GET `/api/bottles` — the caller's bottles, newest first.
pub async fn list_bottles(
    State(service): State<BottleService>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Bottle>>, AppError> {
    info!("GET /api/bottles - user {}", user);
    let bottles = service.list(&user).await?;
    Ok(Json(bottles))
}

/// GET `/api/bottles/stats` — dashboard counters over the caller's bottles.
pub async fn cellar_stats(
    State(service): State<BottleService>,
    AuthUser(user): AuthUser,
) -> Result<Json<CellarStats>, AppError> {
    info!("GET /api/bottles/stats - user {}", user);
    let bottles = service.list(&user).await?;
    Ok(Json(CellarStats::from_bottles(&bottles)))
}

/// PUT `/api/bottles/{id}` — patch the supplied fields.
pub async fn update_bottle(
    State(service): State<BottleService>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<BottlePatch>,
) -> Result<Json<Bottle>, AppError> {
    info!("PUT /api/bottles/{} - user {}", id, user);
    let bottle = service.update(&id, &user, patch).await?;
    Ok(Json(bottle))
}

/// DELETE `/api/bottles/{id}` — remove the bottle and echo its last state.
pub async fn delete_bottle(
    State(service): State<BottleService>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Bottle>, AppError> {
    info!("DELETE /api/bottles/{} - user {}", id, user);
    let bottle = service.delete(&id, &user).await?;
    Ok(Json(bottle))
}

/// Other methods on `/api/bottles/stats`: `stats` is not a bottle id.
pub async fn bottle_not_found() -> AppError {
    AppError::not_found("Bottle not found")
}
