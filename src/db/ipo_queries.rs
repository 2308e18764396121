use sqlx::PgPool;
use uuid::Uuid;

use crate::external::ipo_source::ScrapedIpo;
use crate::models::IpoListing;

// ==============================================================================
// IPO Listing Queries
// ==============================================================================
//
// (company, source) is the uniqueness key; a DB unique index backs it so
// concurrent pipeline runs cannot slip in duplicates.

pub async fn find_by_company_and_source(
    pool: &PgPool,
    company: &str,
    source: &str,
) -> Result<Option<IpoListing>, sqlx::Error> {
    sqlx::query_as::<_, IpoListing>(
        "SELECT * FROM ipo_listings WHERE company = $1 AND source = $2",
    )
    .bind(company)
    .bind(source)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<IpoListing>, sqlx::Error> {
    sqlx::query_as::<_, IpoListing>("SELECT * FROM ipo_listings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &PgPool,
    upcoming_only: bool,
    limit: i64,
) -> Result<Vec<IpoListing>, sqlx::Error> {
    let query = if upcoming_only {
        r#"
        SELECT * FROM ipo_listings
        WHERE COALESCE(ipo_date, open_date, listing_date) IS NOT NULL
        ORDER BY COALESCE(ipo_date, open_date, listing_date) ASC, company ASC
        LIMIT $1
        "#
    } else {
        r#"
        SELECT * FROM ipo_listings
        ORDER BY COALESCE(ipo_date, open_date, listing_date) ASC NULLS LAST, company ASC
        LIMIT $1
        "#
    };

    sqlx::query_as::<_, IpoListing>(query)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn insert_listing(pool: &PgPool, record: &ScrapedIpo) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ipo_listings (
            company, symbol, exchange, open_date, close_date, listing_date,
            ipo_date, issue_price, price_range, lot_size, issue_size, shares,
            est_volume, status, gmp, source, source_url
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(&record.company)
    .bind(&record.symbol)
    .bind(&record.exchange)
    .bind(&record.open_date)
    .bind(&record.close_date)
    .bind(&record.listing_date)
    .bind(&record.ipo_date)
    .bind(&record.issue_price)
    .bind(&record.price_range)
    .bind(&record.lot_size)
    .bind(&record.issue_size)
    .bind(&record.shares)
    .bind(&record.est_volume)
    .bind(&record.status)
    .bind(&record.gmp)
    .bind(record.source)
    .bind(&record.source_url)
    .execute(pool)
    .await?;
    Ok(())
}

/// Re-ingestion overwrites every scraped field of the existing row.
pub async fn update_listing(
    pool: &PgPool,
    id: Uuid,
    record: &ScrapedIpo,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE ipo_listings
        SET symbol = $2, exchange = $3, open_date = $4, close_date = $5,
            listing_date = $6, ipo_date = $7, issue_price = $8, price_range = $9,
            lot_size = $10, issue_size = $11, shares = $12, est_volume = $13,
            status = $14, gmp = $15, source_url = $16, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&record.symbol)
    .bind(&record.exchange)
    .bind(&record.open_date)
    .bind(&record.close_date)
    .bind(&record.listing_date)
    .bind(&record.ipo_date)
    .bind(&record.issue_price)
    .bind(&record.price_range)
    .bind(&record.lot_size)
    .bind(&record.issue_size)
    .bind(&record.shares)
    .bind(&record.est_volume)
    .bind(&record.status)
    .bind(&record.gmp)
    .bind(&record.source_url)
    .execute(pool)
    .await?;
    Ok(())
}
