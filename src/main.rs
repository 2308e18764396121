mod app;
mod auth;
mod db;
mod errors;
mod external;
mod jobs;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::external::chittorgarh::ChittorgarhSource;
use crate::external::investorgain::InvestorgainSource;
use crate::external::ipo_source::IpoSource;
use crate::external::renaissance::RenaissanceSource;
use crate::services::job_scheduler_service::JobSchedulerService;
use crate::services::lead_service::PartnerClient;
use crate::services::seeder;
use crate::state::AppState;

/// Per-source bound on external fetches; exceeding it counts as that
/// source failing for the run.
const SCRAPE_TIMEOUT_SECS: u64 = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")?;

    // Initialize logging FIRST
    logging::init_logging(logging::LoggingConfig::from_env())?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    // One explicitly constructed client shared by all scraping sources
    let scrape_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(SCRAPE_TIMEOUT_SECS))
        .build()?;

    let sources: Arc<Vec<Arc<dyn IpoSource>>> = Arc::new(vec![
        Arc::new(RenaissanceSource::new(scrape_client.clone())),
        Arc::new(ChittorgarhSource::new(scrape_client.clone())),
        Arc::new(InvestorgainSource::new(scrape_client)),
    ]);

    let seed_on_startup = std::env::var("SEED_ON_STARTUP")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);
    if seed_on_startup {
        if let Err(e) = seeder::seed_if_empty(&pool).await {
            tracing::error!("Seeding failed: {}", e);
        }
    }

    let mut scheduler =
        JobSchedulerService::new(Arc::new(pool.clone()), sources.clone()).await?;
    scheduler.start().await?;

    let state = AppState {
        pool,
        sources,
        partner: Arc::new(PartnerClient::from_env()),
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 BrokerHub backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
