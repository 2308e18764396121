use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored IPO listing. Written only by the ingestion pipeline and
/// read-only to the rest of the system. Price and size fields are kept
/// as the opaque strings the sources publish; nothing downstream does
/// arithmetic on them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IpoListing {
    pub id: Uuid,
    pub company: String,
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub open_date: Option<String>,
    pub close_date: Option<String>,
    pub listing_date: Option<String>,
    pub ipo_date: Option<String>,
    pub issue_price: Option<String>,
    pub price_range: Option<String>,
    pub lot_size: Option<String>,
    pub issue_size: Option<String>,
    pub shares: Option<String>,
    pub est_volume: Option<String>,
    pub status: Option<String>,
    pub gmp: Option<String>,
    pub source: String,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IpoListParams {
    pub upcoming: Option<bool>,
    pub limit: Option<i64>,
}

/// Outcome of one pipeline run: how many rows the sources yielded, and
/// how the post-dedup upserts split between inserts and updates.
#[derive(Debug, Default, Clone, Serialize)]
pub struct IngestReport {
    pub scraped: usize,
    pub inserted: usize,
    pub updated: usize,
}
