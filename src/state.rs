use sqlx::PgPool;
use std::sync::Arc;

use crate::external::ipo_source::IpoSource;
use crate::services::lead_service::PartnerClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sources: Arc<Vec<Arc<dyn IpoSource>>>,
    pub partner: Arc<PartnerClient>,
}
