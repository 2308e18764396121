use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::AdminAuth;
use crate::db::content_queries;
use crate::errors::AppError;
use crate::models::site_content::UpdateSiteContentRequest;
use crate::models::SiteContent;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_site_content))
        .route("/", put(update_site_content))
}

#[derive(Debug, Serialize)]
struct ContentResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    content: SiteContent,
}

async fn get_site_content(
    State(state): State<AppState>,
) -> Result<Json<ContentResponse>, AppError> {
    let content = content_queries::get_or_create(&state.pool).await?;
    Ok(Json(ContentResponse {
        success: true,
        message: None,
        content,
    }))
}

async fn update_site_content(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Json(req): Json<UpdateSiteContentRequest>,
) -> Result<Json<ContentResponse>, AppError> {
    let content = content_queries::update(&state.pool, &req).await?;
    Ok(Json(ContentResponse {
        success: true,
        message: Some("Site content updated successfully".into()),
        content,
    }))
}
