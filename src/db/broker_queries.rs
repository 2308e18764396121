use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::broker::{CreateBrokerRequest, UpdateBrokerRequest};
use crate::models::Broker;

// ==============================================================================
// Broker CRUD Operations
// ==============================================================================

pub async fn list_active(pool: &PgPool) -> Result<Vec<Broker>, sqlx::Error> {
    sqlx::query_as::<_, Broker>(
        r#"
        SELECT * FROM brokers
        WHERE is_active = TRUE
        ORDER BY rating DESC, reviews DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Broker>, sqlx::Error> {
    sqlx::query_as::<_, Broker>("SELECT * FROM brokers ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_active_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Broker>, sqlx::Error> {
    sqlx::query_as::<_, Broker>(
        "SELECT * FROM brokers WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Broker>, sqlx::Error> {
    sqlx::query_as::<_, Broker>("SELECT * FROM brokers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM brokers")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn insert_broker(
    pool: &PgPool,
    req: &CreateBrokerRequest,
) -> Result<Broker, sqlx::Error> {
    sqlx::query_as::<_, Broker>(
        r#"
        INSERT INTO brokers (
            name, description, full_description, rating, reviews, brokerage,
            features, pros, cons, charges, markets, security, execution_speed,
            founded, customers, broker_url, logo, brokerage_details, margins,
            brokerage_plans, is_active
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
            $14, $15, $16, $17, $18, $19, $20, $21
        )
        RETURNING *
        "#,
    )
    .bind(req.name.trim())
    .bind(req.description.trim())
    .bind(req.full_description.clone().unwrap_or_default())
    .bind(req.rating)
    .bind(req.reviews.unwrap_or(0))
    .bind(&req.brokerage)
    .bind(&req.features)
    .bind(req.pros.clone().unwrap_or_default())
    .bind(req.cons.clone().unwrap_or_default())
    .bind(Json(req.charges.clone().unwrap_or_default()))
    .bind(
        req.markets
            .clone()
            .unwrap_or_else(|| vec!["NSE".to_string(), "BSE".to_string()]),
    )
    .bind(
        req.security
            .clone()
            .unwrap_or_else(|| "SEBI Regulated, Bank-Grade".to_string()),
    )
    .bind(
        req.execution_speed
            .clone()
            .unwrap_or_else(|| "Sub-second Order Placement".to_string()),
    )
    .bind(req.founded.clone().unwrap_or_default())
    .bind(req.customers.clone().unwrap_or_default())
    .bind(req.broker_url.clone().unwrap_or_default())
    .bind(req.logo.clone().unwrap_or_default())
    .bind(Json(req.brokerage_details.clone().unwrap_or_default()))
    .bind(Json(req.margins.clone().unwrap_or_default()))
    .bind(Json(req.brokerage_plans.clone().unwrap_or_default()))
    .bind(req.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await
}

pub async fn update_broker(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateBrokerRequest,
) -> Result<Option<Broker>, sqlx::Error> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE brokers SET ");

    let mut separated = query_builder.separated(", ");
    let mut has_updates = false;

    if let Some(name) = &req.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name.trim().to_string());
        has_updates = true;
    }
    if let Some(description) = &req.description {
        separated.push("description = ");
        separated.push_bind_unseparated(description.trim().to_string());
        has_updates = true;
    }
    if let Some(full_description) = &req.full_description {
        separated.push("full_description = ");
        separated.push_bind_unseparated(full_description.clone());
        has_updates = true;
    }
    if let Some(rating) = req.rating {
        separated.push("rating = ");
        separated.push_bind_unseparated(rating);
        has_updates = true;
    }
    if let Some(reviews) = req.reviews {
        separated.push("reviews = ");
        separated.push_bind_unseparated(reviews);
        has_updates = true;
    }
    if let Some(brokerage) = &req.brokerage {
        separated.push("brokerage = ");
        separated.push_bind_unseparated(brokerage.clone());
        has_updates = true;
    }
    if let Some(features) = &req.features {
        separated.push("features = ");
        separated.push_bind_unseparated(features.clone());
        has_updates = true;
    }
    if let Some(pros) = &req.pros {
        separated.push("pros = ");
        separated.push_bind_unseparated(pros.clone());
        has_updates = true;
    }
    if let Some(cons) = &req.cons {
        separated.push("cons = ");
        separated.push_bind_unseparated(cons.clone());
        has_updates = true;
    }
    if let Some(charges) = &req.charges {
        separated.push("charges = ");
        separated.push_bind_unseparated(Json(charges.clone()));
        has_updates = true;
    }
    if let Some(markets) = &req.markets {
        separated.push("markets = ");
        separated.push_bind_unseparated(markets.clone());
        has_updates = true;
    }
    if let Some(security) = &req.security {
        separated.push("security = ");
        separated.push_bind_unseparated(security.clone());
        has_updates = true;
    }
    if let Some(execution_speed) = &req.execution_speed {
        separated.push("execution_speed = ");
        separated.push_bind_unseparated(execution_speed.clone());
        has_updates = true;
    }
    if let Some(founded) = &req.founded {
        separated.push("founded = ");
        separated.push_bind_unseparated(founded.clone());
        has_updates = true;
    }
    if let Some(customers) = &req.customers {
        separated.push("customers = ");
        separated.push_bind_unseparated(customers.clone());
        has_updates = true;
    }
    if let Some(broker_url) = &req.broker_url {
        separated.push("broker_url = ");
        separated.push_bind_unseparated(broker_url.clone());
        has_updates = true;
    }
    if let Some(logo) = &req.logo {
        separated.push("logo = ");
        separated.push_bind_unseparated(logo.clone());
        has_updates = true;
    }
    if let Some(brokerage_details) = &req.brokerage_details {
        separated.push("brokerage_details = ");
        separated.push_bind_unseparated(Json(brokerage_details.clone()));
        has_updates = true;
    }
    if let Some(margins) = &req.margins {
        separated.push("margins = ");
        separated.push_bind_unseparated(Json(margins.clone()));
        has_updates = true;
    }
    if let Some(brokerage_plans) = &req.brokerage_plans {
        separated.push("brokerage_plans = ");
        separated.push_bind_unseparated(Json(brokerage_plans.clone()));
        has_updates = true;
    }
    if let Some(is_active) = req.is_active {
        separated.push("is_active = ");
        separated.push_bind_unseparated(is_active);
        has_updates = true;
    }

    if !has_updates {
        return find_by_id(pool, id).await;
    }

    query_builder.push(", updated_at = NOW() WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING *");

    query_builder
        .build_query_as::<Broker>()
        .fetch_optional(pool)
        .await
}

pub async fn delete_broker(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM brokers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
