use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::db::{broker_queries, lead_queries};
use crate::errors::AppError;
use crate::models::lead::RegisterLeadRequest;
use crate::models::{Lead, LeadStatus};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_lead))
        .route("/", get(list_leads))
}

#[derive(Debug, Serialize)]
struct LeadRegisteredData {
    user_id: Uuid,
    lead_status: LeadStatus,
    broker_url: String,
}

#[derive(Debug, Serialize)]
struct LeadRegisteredResponse {
    success: bool,
    message: String,
    data: LeadRegisteredData,
}

#[derive(Debug, Serialize)]
struct LeadListResponse {
    success: bool,
    leads: Vec<Lead>,
}

/// Capture a lead and forward it to the partner onboarding API. A
/// partner failure is recorded on the lead but still reads as success to
/// the end user; an executive follows up manually.
async fn register_lead(
    State(state): State<AppState>,
    Json(req): Json<RegisterLeadRequest>,
) -> Result<Json<LeadRegisteredResponse>, AppError> {
    req.validate()?;

    let broker = broker_queries::find_by_id(&state.pool, req.broker_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Broker not found".into()))?;

    if lead_queries::exists_by_email_or_mobile(&state.pool, &req.email, &req.mobile).await? {
        return Err(AppError::Validation(
            "User with this email or mobile already exists".into(),
        ));
    }

    let lead = lead_queries::insert_lead(&state.pool, &req, &broker.name).await?;

    let (status, partner_response, message) = match state
        .partner
        .register_lead(&lead.name, &lead.email, &lead.mobile)
        .await
    {
        Ok(body) => (
            LeadStatus::Registered,
            body,
            "Lead registered successfully".to_string(),
        ),
        Err(failure) => (
            LeadStatus::Failed,
            failure,
            "User details saved. Our executive will contact you for further process.".to_string(),
        ),
    };

    lead_queries::update_partner_outcome(&state.pool, lead.id, status, Some(&partner_response))
        .await?;

    info!("📋 Lead {} captured with status {}", lead.id, status.as_str());

    Ok(Json(LeadRegisteredResponse {
        success: true,
        message,
        data: LeadRegisteredData {
            user_id: lead.id,
            lead_status: status,
            broker_url: broker.broker_url,
        },
    }))
}

async fn list_leads(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<LeadListResponse>, AppError> {
    let leads = lead_queries::list_all(&state.pool).await?;
    Ok(Json(LeadListResponse { success: true, leads }))
}
