use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

// ==============================================================================
// Broker Models
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentCharges {
    #[serde(default)]
    pub turnover: String,
    #[serde(default)]
    pub stt: String,
    #[serde(default)]
    pub sebi_charges: String,
    #[serde(default)]
    pub brokerage: String,
    #[serde(default)]
    pub exchange_fee: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokerageDetails {
    #[serde(default)]
    pub intraday: SegmentCharges,
    #[serde(default)]
    pub delivery: SegmentCharges,
    #[serde(default)]
    pub fo: SegmentCharges,
    #[serde(default)]
    pub equity_futures: String,
    #[serde(default)]
    pub equity_options: String,
    #[serde(default)]
    pub currency_futures: String,
    #[serde(default)]
    pub currency_options: String,
    #[serde(default)]
    pub commodity_futures: String,
    #[serde(default)]
    pub commodity_options: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub equity_delivery: String,
    #[serde(default)]
    pub equity_intraday: String,
    #[serde(default)]
    pub equity_futures: String,
    #[serde(default)]
    pub equity_options: String,
    #[serde(default)]
    pub currency_futures: String,
    #[serde(default)]
    pub currency_options: String,
    #[serde(default)]
    pub commodity_futures: String,
    #[serde(default)]
    pub commodity_options: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    #[serde(rename = "type")]
    pub charge_type: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanCharges {
    #[serde(default)]
    pub account_opening: String,
    #[serde(default)]
    pub account_maintenance: String,
    #[serde(default)]
    pub call_and_trade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokeragePlan {
    pub plan_name: String,
    #[serde(default)]
    pub charges: PlanCharges,
    #[serde(default)]
    pub brokerage_details: BrokerageDetails,
    #[serde(default)]
    pub margins: Margins,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Broker {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub full_description: String,
    pub rating: f64,
    pub reviews: i32,
    pub brokerage: String,
    pub features: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub charges: Json<Vec<Charge>>,
    pub markets: Vec<String>,
    pub security: String,
    pub execution_speed: String,
    pub founded: String,
    pub customers: String,
    pub broker_url: String,
    pub logo: String,
    pub brokerage_details: Json<BrokerageDetails>,
    pub margins: Json<Margins>,
    pub brokerage_plans: Json<Vec<BrokeragePlan>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==============================================================================
// Request DTOs
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrokerRequest {
    pub name: String,
    pub description: String,
    pub full_description: Option<String>,
    pub rating: f64,
    pub reviews: Option<i32>,
    pub brokerage: String,
    pub features: Vec<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
    pub charges: Option<Vec<Charge>>,
    pub markets: Option<Vec<String>>,
    pub security: Option<String>,
    pub execution_speed: Option<String>,
    pub founded: Option<String>,
    pub customers: Option<String>,
    pub broker_url: Option<String>,
    pub logo: Option<String>,
    pub brokerage_details: Option<BrokerageDetails>,
    pub margins: Option<Margins>,
    pub brokerage_plans: Option<Vec<BrokeragePlan>>,
    pub is_active: Option<bool>,
}

impl CreateBrokerRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.name.trim();
        if name.len() < 2 || name.len() > 100 {
            return Err(AppError::Validation(
                "Broker name must be between 2 and 100 characters".into(),
            ));
        }
        let description = self.description.trim();
        if description.len() < 10 || description.len() > 500 {
            return Err(AppError::Validation(
                "Description must be between 10 and 500 characters".into(),
            ));
        }
        if !(1.0..=5.0).contains(&self.rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }
        if self.brokerage.trim().is_empty() {
            return Err(AppError::Validation(
                "Brokerage information is required".into(),
            ));
        }
        if self.features.is_empty() {
            return Err(AppError::Validation("At least one feature is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBrokerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i32>,
    pub brokerage: Option<String>,
    pub features: Option<Vec<String>>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
    pub charges: Option<Vec<Charge>>,
    pub markets: Option<Vec<String>>,
    pub security: Option<String>,
    pub execution_speed: Option<String>,
    pub founded: Option<String>,
    pub customers: Option<String>,
    pub broker_url: Option<String>,
    pub logo: Option<String>,
    pub brokerage_details: Option<BrokerageDetails>,
    pub margins: Option<Margins>,
    pub brokerage_plans: Option<Vec<BrokeragePlan>>,
    pub is_active: Option<bool>,
}

impl UpdateBrokerRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            let name = name.trim();
            if name.len() < 2 || name.len() > 100 {
                return Err(AppError::Validation(
                    "Broker name must be between 2 and 100 characters".into(),
                ));
            }
        }
        if let Some(rating) = self.rating {
            if !(1.0..=5.0).contains(&rating) {
                return Err(AppError::Validation("Rating must be between 1 and 5".into()));
            }
        }
        Ok(())
    }
}
