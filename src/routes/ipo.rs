use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::db::ipo_queries;
use crate::errors::AppError;
use crate::models::ipo::IpoListParams;
use crate::models::{IngestReport, IpoListing};
use crate::services::ipo_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ipos))
        .route("/refresh", post(refresh_ipos))
        .route("/:id", get(get_ipo))
}

#[derive(Debug, Serialize)]
struct IpoListResponse {
    success: bool,
    count: usize,
    data: Vec<IpoListing>,
}

#[derive(Debug, Serialize)]
struct IpoDetailResponse {
    success: bool,
    data: IpoListing,
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    success: bool,
    #[serde(flatten)]
    report: IngestReport,
}

async fn list_ipos(
    State(state): State<AppState>,
    Query(params): Query<IpoListParams>,
) -> Result<Json<IpoListResponse>, AppError> {
    let upcoming = params.upcoming.unwrap_or(true);
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    let data = ipo_queries::list(&state.pool, upcoming, limit).await?;

    Ok(Json(IpoListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

async fn get_ipo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IpoDetailResponse>, AppError> {
    let data = ipo_queries::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("IPO not found".into()))?;

    Ok(Json(IpoDetailResponse { success: true, data }))
}

/// On-demand run of the same pipeline the 6-hourly job uses.
async fn refresh_ipos(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    info!("POST /api/ipo/refresh - Running IPO ingestion pipeline");

    let report = ipo_service::run_ingest(&state.pool, &state.sources).await?;

    Ok(Json(RefreshResponse { success: true, report }))
}
