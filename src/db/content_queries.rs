use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::site_content::{default_trust_signals, Hero, UpdateSiteContentRequest};
use crate::models::SiteContent;

// ==============================================================================
// Site Content Queries (single logical row)
// ==============================================================================

pub async fn fetch(pool: &PgPool) -> Result<Option<SiteContent>, sqlx::Error> {
    sqlx::query_as::<_, SiteContent>(
        "SELECT * FROM site_content ORDER BY updated_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
}

pub async fn insert_default(pool: &PgPool) -> Result<SiteContent, sqlx::Error> {
    sqlx::query_as::<_, SiteContent>(
        r#"
        INSERT INTO site_content (brand_name, hero, trust_signals, cta_title, cta_subtitle)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind("BrokerHub")
    .bind(Json(Hero::default()))
    .bind(Json(default_trust_signals()))
    .bind("Ready to start your investment journey?")
    .bind("Join thousands of investors who trust our platform to find the best brokers.")
    .fetch_one(pool)
    .await
}

pub async fn get_or_create(pool: &PgPool) -> Result<SiteContent, sqlx::Error> {
    match fetch(pool).await? {
        Some(content) => Ok(content),
        None => insert_default(pool).await,
    }
}

/// Partial overwrite: absent fields keep their stored value.
pub async fn update(
    pool: &PgPool,
    req: &UpdateSiteContentRequest,
) -> Result<SiteContent, sqlx::Error> {
    let current = get_or_create(pool).await?;

    sqlx::query_as::<_, SiteContent>(
        r#"
        UPDATE site_content
        SET brand_name = $2,
            hero = $3,
            trust_signals = $4,
            cta_title = $5,
            cta_subtitle = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(req.brand_name.clone().unwrap_or(current.brand_name))
    .bind(Json(req.hero.clone().unwrap_or(current.hero.0)))
    .bind(Json(
        req.trust_signals.clone().unwrap_or(current.trust_signals.0),
    ))
    .bind(req.cta_title.clone().unwrap_or(current.cta_title))
    .bind(req.cta_subtitle.clone().unwrap_or(current.cta_subtitle))
    .fetch_one(pool)
    .await
}
