use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{admin, brokers, content, education, health, ipo, leads};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/api/health", health::router())
        .nest("/api/brokers", brokers::router())
        .nest("/api/admin", admin::router())
        .nest("/api/content", content::router())
        .nest("/api/leads", leads::router())
        .nest("/api/education", education::router())
        .nest("/api/ipo", ipo::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
