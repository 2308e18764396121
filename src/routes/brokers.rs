use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::db::broker_queries;
use crate::errors::AppError;
use crate::models::broker::{CreateBrokerRequest, UpdateBrokerRequest};
use crate::models::Broker;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Public catalog
        .route("/", get(list_brokers))
        .route("/:id", get(get_broker))
        // Admin management
        .route("/admin/all", get(list_brokers_admin))
        .route("/", post(create_broker))
        .route("/:id", put(update_broker))
        .route("/:id", delete(delete_broker))
}

#[derive(Debug, Serialize)]
struct BrokerListResponse {
    success: bool,
    brokers: Vec<Broker>,
}

#[derive(Debug, Serialize)]
struct BrokerResponse {
    success: bool,
    message: String,
    broker: Broker,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

// ==============================================================================
// Public Handlers
// ==============================================================================

async fn list_brokers(
    State(state): State<AppState>,
) -> Result<Json<BrokerListResponse>, AppError> {
    let brokers = broker_queries::list_active(&state.pool).await?;
    Ok(Json(BrokerListResponse { success: true, brokers }))
}

async fn get_broker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Broker>, AppError> {
    broker_queries::find_active_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Broker not found".into()))
}

// ==============================================================================
// Admin Handlers
// ==============================================================================

async fn list_brokers_admin(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<BrokerListResponse>, AppError> {
    let brokers = broker_queries::list_all(&state.pool).await?;
    Ok(Json(BrokerListResponse { success: true, brokers }))
}

async fn create_broker(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateBrokerRequest>,
) -> Result<(StatusCode, Json<BrokerResponse>), AppError> {
    req.validate()?;

    let broker = broker_queries::insert_broker(&state.pool, &req).await?;

    info!("🏦 Broker '{}' created by {}", broker.name, admin.username);

    Ok((
        StatusCode::CREATED,
        Json(BrokerResponse {
            success: true,
            message: "Broker created successfully".into(),
            broker,
        }),
    ))
}

async fn update_broker(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBrokerRequest>,
) -> Result<Json<BrokerResponse>, AppError> {
    req.validate()?;

    let broker = broker_queries::update_broker(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Broker not found".into()))?;

    Ok(Json(BrokerResponse {
        success: true,
        message: "Broker updated successfully".into(),
        broker,
    }))
}

async fn delete_broker(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !broker_queries::delete_broker(&state.pool, id).await? {
        return Err(AppError::NotFound("Broker not found".into()));
    }

    info!("🗑️ Broker {} deleted by {}", id, admin.username);

    Ok(Json(MessageResponse {
        success: true,
        message: "Broker deleted successfully".into(),
    }))
}
