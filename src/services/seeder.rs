use sqlx::PgPool;
use tracing::info;

use crate::db::{broker_queries, content_queries};
use crate::errors::AppError;
use crate::models::broker::{Charge, CreateBrokerRequest};

// ==============================================================================
// Seeder
// ==============================================================================
//
// Gives a fresh deployment something to render: a couple of brokers and
// the default site content. Runs only against empty tables.

pub async fn seed_if_empty(pool: &PgPool) -> Result<(), AppError> {
    if broker_queries::count_all(pool).await? == 0 {
        info!("🌱 Seeding sample brokers...");
        for broker in sample_brokers() {
            broker_queries::insert_broker(pool, &broker).await?;
        }
    }

    // Creates the default row if none exists yet
    content_queries::get_or_create(pool).await?;

    info!("🌱 Seed check complete");
    Ok(())
}

fn sample_brokers() -> Vec<CreateBrokerRequest> {
    vec![
        CreateBrokerRequest {
            name: "Zerodha".into(),
            description: "India's largest discount broker with zero brokerage on equity delivery trades.".into(),
            full_description: Some(
                "Zerodha is India's largest discount broker offering zero brokerage on equity \
                 delivery trades. Known for its innovative trading platforms and educational \
                 initiatives."
                    .into(),
            ),
            rating: 4.8,
            reviews: Some(125_000),
            brokerage: "₹0 for delivery, ₹20 for intraday".into(),
            features: vec![
                "Zero brokerage on delivery".into(),
                "Advanced trading platforms".into(),
                "Educational resources".into(),
                "Mobile app trading".into(),
            ],
            pros: Some(vec![
                "Zero brokerage on equity delivery".into(),
                "Excellent trading platforms".into(),
                "Transparent pricing".into(),
            ]),
            cons: Some(vec![
                "No advisory services".into(),
                "Charges for call & trade".into(),
            ]),
            charges: Some(vec![
                Charge { charge_type: "Equity Delivery".into(), amount: "₹0".into() },
                Charge { charge_type: "Equity Intraday".into(), amount: "₹20 or 0.03%".into() },
                Charge { charge_type: "Account Opening".into(), amount: "₹200".into() },
            ]),
            markets: Some(vec!["NSE".into(), "BSE".into(), "MCX".into()]),
            security: None,
            execution_speed: None,
            founded: Some("2010".into()),
            customers: Some("6+ Million".into()),
            broker_url: Some("https://zerodha.com".into()),
            logo: None,
            brokerage_details: None,
            margins: None,
            brokerage_plans: None,
            is_active: Some(true),
        },
        CreateBrokerRequest {
            name: "Upstox".into(),
            description: "Tech-first discount broker backed by marquee investors with flat-fee pricing.".into(),
            full_description: None,
            rating: 4.5,
            reviews: Some(48_000),
            brokerage: "₹20 per order across segments".into(),
            features: vec![
                "Flat ₹20 pricing".into(),
                "Fast account opening".into(),
                "Charting tools".into(),
            ],
            pros: Some(vec!["Simple pricing".into(), "Good mobile app".into()]),
            cons: Some(vec!["Platform downtime on expiry days".into()]),
            charges: Some(vec![
                Charge { charge_type: "Equity Delivery".into(), amount: "₹20 or 2.5%".into() },
                Charge { charge_type: "Equity Intraday".into(), amount: "₹20 or 0.05%".into() },
            ]),
            markets: None,
            security: None,
            execution_speed: None,
            founded: Some("2011".into()),
            customers: Some("1+ Crore".into()),
            broker_url: Some("https://upstox.com".into()),
            logo: None,
            brokerage_details: None,
            margins: None,
            brokerage_plans: None,
            is_active: Some(true),
        },
    ]
}
