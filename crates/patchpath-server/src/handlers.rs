//! REST API handlers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::WithRejection;
use patchpath_core::{PatchId, PathResult, TitleId, VersionId};
use patchpath_store::{DownloadId, NewPatch, NewTitle, NewVersion};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::ServerState;

type AppState = State<Arc<ServerState>>;

// Extractors whose rejections are reported as `ApiError`
type IdPath = WithRejection<Path<u32>, ApiError>;
type JsonBody<T> = WithRejection<Json<T>, ApiError>;
type QueryParams<T> = WithRejection<Query<T>, ApiError>;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}

// ── Titles ──────────────────────────────────────────────

pub async fn list_titles(State(state): AppState) -> impl IntoResponse {
    Json(state.store.titles().await)
}

pub async fn get_title(
    State(state): AppState,
    WithRejection(Path(id), _): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .store
        .title_detail(TitleId(id))
        .await
        .ok_or_else(|| ApiError::NotFound("Title not found".to_string()))?;
    Ok(Json(detail))
}

pub async fn create_title(
    State(state): AppState,
    WithRejection(Json(new), _): JsonBody<NewTitle>,
) -> Result<impl IntoResponse, ApiError> {
    let title = state.store.add_title(new).await.map_err(ApiError::rejected)?;
    Ok((StatusCode::CREATED, Json(title)))
}

// ── Versions ────────────────────────────────────────────

pub async fn list_versions(
    State(state): AppState,
    WithRejection(Path(title), _): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.versions(TitleId(title)).await?))
}

pub async fn latest_version(
    State(state): AppState,
    WithRejection(Path(title), _): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.latest_version(TitleId(title)).await?))
}

pub async fn create_version(
    State(state): AppState,
    WithRejection(Path(title), _): IdPath,
    WithRejection(Json(new), _): JsonBody<NewVersion>,
) -> Result<impl IntoResponse, ApiError> {
    let version = state.store.add_version(TitleId(title), new).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

// ── Optimal path ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimalPathQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Cheapest patch sequence between two version labels.
///
/// 200 with the result when a path is found, 404 with the same JSON shape
/// (`found: false` plus the error) otherwise.
pub async fn optimal_path(
    State(state): AppState,
    WithRejection(Path(title), _): IdPath,
    WithRejection(Query(query), _): QueryParams<OptimalPathQuery>,
) -> Result<Response, ApiError> {
    let from = required(query.from, "'from' version is required")?;
    let to = required(query.to, "'to' version is required")?;

    let result = state.resolver.resolve(TitleId(title), &from, &to).await?;
    let status = match result {
        PathResult::Found(_) => StatusCode::OK,
        PathResult::NotFound(_) => StatusCode::NOT_FOUND,
    };
    Ok((status, Json(result)).into_response())
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

// ── Patches ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PatchQuery {
    pub from: u32,
    pub to: u32,
}

/// The direct patch between two version ids.
pub async fn find_patch(
    State(state): AppState,
    WithRejection(Query(query), _): QueryParams<PatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = state
        .store
        .patch_between(VersionId(query.from), VersionId(query.to))
        .await?;
    Ok(Json(patch))
}

pub async fn get_patch(
    State(state): AppState,
    WithRejection(Path(id), _): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.patch(PatchId(id)).await?))
}

pub async fn create_patch(
    State(state): AppState,
    WithRejection(Json(new), _): JsonBody<NewPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = state.store.add_patch(new).await.map_err(ApiError::rejected)?;
    Ok((StatusCode::CREATED, Json(patch)))
}

/// Start a download of a patch and record it against the client address.
pub async fn download_patch(
    State(state): AppState,
    WithRejection(Path(id), _): IdPath,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<impl IntoResponse, ApiError> {
    let client = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let info = state.store.start_download(PatchId(id), &client).await?;
    Ok(Json(info))
}

// ── Downloads ───────────────────────────────────────────

pub async fn download_stats(State(state): AppState) -> impl IntoResponse {
    Json(state.store.download_stats().await)
}

pub async fn complete_download(
    State(state): AppState,
    WithRejection(Path(id), _): IdPath,
) -> Result<StatusCode, ApiError> {
    state.store.complete_download(DownloadId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn fail_download(
    State(state): AppState,
    WithRejection(Path(id), _): IdPath,
) -> Result<StatusCode, ApiError> {
    state.store.fail_download(DownloadId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
