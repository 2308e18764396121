use sqlx::PgPool;
use uuid::Uuid;

use crate::models::lead::RegisterLeadRequest;
use crate::models::{Lead, LeadStatus};

// ==============================================================================
// Lead Queries
// ==============================================================================

pub async fn exists_by_email_or_mobile(
    pool: &PgPool,
    email: &str,
    mobile: &str,
) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM leads WHERE email = $1 OR mobile = $2",
    )
    .bind(email.trim().to_lowercase())
    .bind(mobile)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn insert_lead(
    pool: &PgPool,
    req: &RegisterLeadRequest,
    broker_name: &str,
) -> Result<Lead, sqlx::Error> {
    sqlx::query_as::<_, Lead>(
        r#"
        INSERT INTO leads (name, email, mobile, account_type, broker_id, broker_name, lead_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(req.name.trim())
    .bind(req.email.trim().to_lowercase())
    .bind(&req.mobile)
    .bind(&req.account_type)
    .bind(req.broker_id)
    .bind(broker_name)
    .bind(LeadStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

pub async fn update_partner_outcome(
    pool: &PgPool,
    id: Uuid,
    status: LeadStatus,
    partner_response: Option<&serde_json::Value>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE leads
        SET lead_status = $2, partner_response = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(partner_response)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}
