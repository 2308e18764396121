use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub badge: String,
    pub title: String,
    pub title_highlight: String,
    pub subtitle: String,
    pub primary_cta: String,
    pub secondary_cta: String,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            badge: "India's Most Trusted".to_string(),
            title: "Compare & Choose the Best".to_string(),
            title_highlight: "Stock Brokers".to_string(),
            subtitle: "Find the perfect broker for your investment journey. Compare brokerage, \
                       features, and ratings to make an informed decision."
                .to_string(),
            primary_cta: "Compare Brokers".to_string(),
            secondary_cta: "Learn More".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustSignal {
    pub number: String,
    pub label: String,
}

pub fn default_trust_signals() -> Vec<TrustSignal> {
    vec![
        TrustSignal { number: "50+".into(), label: "Verified Brokers".into() },
        TrustSignal { number: "1M+".into(), label: "Happy Investors".into() },
        TrustSignal { number: "₹100Cr+".into(), label: "Investments Facilitated".into() },
        TrustSignal { number: "4.8★".into(), label: "Average Rating".into() },
    ]
}

/// Landing-page copy. A single logical row; fetched with
/// read-or-create-default semantics.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteContent {
    pub id: Uuid,
    pub brand_name: String,
    pub hero: Json<Hero>,
    pub trust_signals: Json<Vec<TrustSignal>>,
    pub cta_title: String,
    pub cta_subtitle: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSiteContentRequest {
    pub brand_name: Option<String>,
    pub hero: Option<Hero>,
    pub trust_signals: Option<Vec<TrustSignal>>,
    pub cta_title: Option<String>,
    pub cta_subtitle: Option<String>,
}
