use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

pub const ACCOUNT_TYPES: &[&str] = &[
    "Individual",
    "NRI",
    "HUF",
    "Partnership Firm",
    "LLP",
    "Private Ltd",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Pending,
    Registered,
    Failed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Registered => "registered",
            LeadStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub account_type: String,
    pub broker_id: Uuid,
    pub broker_name: String,
    pub lead_status: String,
    pub partner_response: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterLeadRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub account_type: String,
    pub broker_id: Uuid,
}

impl RegisterLeadRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        if self.mobile.len() != 10 || !self.mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation("Mobile number must be 10 digits".into()));
        }
        if !crate::auth::is_valid_email(&self.email) {
            return Err(AppError::Validation("Invalid email format".into()));
        }
        if !ACCOUNT_TYPES.contains(&self.account_type.as_str()) {
            return Err(AppError::Validation(format!(
                "Account type must be one of: {}",
                ACCOUNT_TYPES.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterLeadRequest {
        RegisterLeadRequest {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            mobile: "9876543210".into(),
            account_type: "Individual".into(),
            broker_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_valid_lead_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_short_mobile_rejected() {
        let mut req = request();
        req.mobile = "98765".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_account_type_rejected() {
        let mut req = request();
        req.account_type = "Trust".into();
        assert!(req.validate().is_err());
    }
}
