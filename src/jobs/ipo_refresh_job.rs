use tracing::info;

use crate::errors::AppError;
use crate::services::ipo_service;
use crate::services::job_scheduler_service::{JobContext, JobResult};

/// Scheduled trigger for the IPO ingestion pipeline. Same fetch/parse/
/// normalize/upsert path as the on-demand refresh endpoint; only the
/// caller differs.
pub async fn refresh_ipo_listings(ctx: JobContext) -> Result<JobResult, AppError> {
    info!("📈 Refreshing IPO listings from all sources...");

    let report = ipo_service::run_ingest(ctx.pool.as_ref(), &ctx.sources).await?;

    Ok(JobResult {
        items_processed: (report.inserted + report.updated) as i32,
        items_failed: 0,
    })
}
