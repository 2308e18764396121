use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db::ipo_queries;
use crate::errors::AppError;
use crate::external::ipo_source::{IpoSource, ScrapedIpo};
use crate::models::IngestReport;

// ==============================================================================
// IPO Ingestion Pipeline
// ==============================================================================
//
// One idempotent entry point shared by the on-demand refresh endpoint and
// the 6-hourly scheduled job. Source failures are contained; storage
// failures abort the remainder of the run.

pub async fn run_ingest(
    pool: &PgPool,
    sources: &[Arc<dyn IpoSource>],
) -> Result<IngestReport, AppError> {
    let scraped = collect_listings(sources).await;
    let total_scraped = scraped.len();

    let records = dedup_records(scraped);
    info!(
        "📈 IPO ingest: {} scraped, {} unique after dedup",
        total_scraped,
        records.len()
    );

    let mut report = IngestReport {
        scraped: total_scraped,
        ..Default::default()
    };

    for record in &records {
        match ipo_queries::find_by_company_and_source(pool, &record.company, record.source)
            .await?
        {
            Some(existing) => {
                ipo_queries::update_listing(pool, existing.id, record).await?;
                report.updated += 1;
            }
            None => {
                ipo_queries::insert_listing(pool, record).await?;
                report.inserted += 1;
            }
        }
    }

    info!(
        "✅ IPO ingest done: scraped={}, inserted={}, updated={}",
        report.scraped, report.inserted, report.updated
    );

    Ok(report)
}

/// Fetch every source concurrently and merge the results. A source that
/// errors contributes nothing and is only logged; the other sources'
/// records are unaffected.
pub async fn collect_listings(sources: &[Arc<dyn IpoSource>]) -> Vec<ScrapedIpo> {
    let fetches = sources.iter().map(|source| {
        let source = source.clone();
        async move { (source.name(), source.fetch_listings().await) }
    });

    let mut merged = Vec::new();
    for (name, result) in join_all(fetches).await {
        match result {
            Ok(records) => {
                info!("[{}] scraped {} listings", name, records.len());
                merged.extend(records);
            }
            Err(e) => {
                warn!("[{}] scrape failed, contributing zero records: {}", name, e);
            }
        }
    }
    merged
}

/// Within-run dedup on the normalized company key; first occurrence wins.
pub fn dedup_records(records: Vec<ScrapedIpo>) -> Vec<ScrapedIpo> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ipo_source::SourceError;
    use async_trait::async_trait;

    struct StaticSource {
        name: &'static str,
        companies: Vec<&'static str>,
    }

    #[async_trait]
    impl IpoSource for StaticSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_listings(&self) -> Result<Vec<ScrapedIpo>, SourceError> {
            Ok(self
                .companies
                .iter()
                .map(|company| ScrapedIpo {
                    company: (*company).to_string(),
                    source: self.name,
                    ..Default::default()
                })
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl IpoSource for FailingSource {
        fn name(&self) -> &'static str {
            "Broken"
        }

        async fn fetch_listings(&self) -> Result<Vec<ScrapedIpo>, SourceError> {
            Err(SourceError::Network("connection timed out".into()))
        }
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let sources: Vec<Arc<dyn IpoSource>> = vec![
            Arc::new(StaticSource {
                name: "Good",
                companies: vec!["Acme Robotics", "Beta Foods"],
            }),
            Arc::new(FailingSource),
        ];

        let merged = collect_listings(&sources).await;
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|r| r.source == "Good"));
    }

    #[tokio::test]
    async fn test_all_sources_merge() {
        let sources: Vec<Arc<dyn IpoSource>> = vec![
            Arc::new(StaticSource { name: "A", companies: vec!["One"] }),
            Arc::new(StaticSource { name: "B", companies: vec!["Two", "Three"] }),
        ];

        let merged = collect_listings(&sources).await;
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let records = vec![
            ScrapedIpo {
                company: "Swiggy IPO".into(),
                source: "Chittorgarh",
                ..Default::default()
            },
            ScrapedIpo {
                company: "SWIGGY   IPO".into(),
                source: "Investorgain",
                ..Default::default()
            },
            ScrapedIpo {
                company: "Other Ltd".into(),
                source: "Investorgain",
                ..Default::default()
            },
        ];

        let deduped = dedup_records(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].company, "Swiggy IPO");
        assert_eq!(deduped[0].source, "Chittorgarh");
        assert_eq!(deduped[1].company, "Other Ltd");
    }
}
