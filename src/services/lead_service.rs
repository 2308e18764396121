use serde_json::json;
use tracing::{error, info, warn};

// ==============================================================================
// Partner Lead Forwarding
// ==============================================================================
//
// Captured leads are pushed to a partner onboarding API. The endpoint and
// partner code are config-driven; the integration is best-effort and a
// partner failure never fails the user-facing request.

pub struct PartnerClient {
    client: reqwest::Client,
    url: Option<String>,
    partner_code: String,
}

pub const PARTNER_TIMEOUT_SECS: u64 = 10;

impl PartnerClient {
    pub fn from_env() -> Self {
        let url = std::env::var("PARTNER_LEAD_URL").ok().filter(|u| !u.is_empty());
        if url.is_none() {
            warn!("PARTNER_LEAD_URL not set - leads will be kept locally only");
        }

        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(PARTNER_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            url,
            partner_code: std::env::var("PARTNER_CODE").unwrap_or_default(),
        }
    }

    /// Forward a lead. Ok carries the partner's JSON body; Err carries
    /// whatever we know about the failure, already shaped for storage in
    /// the lead's `partner_response` column.
    pub async fn register_lead(
        &self,
        name: &str,
        email: &str,
        mobile: &str,
    ) -> Result<serde_json::Value, serde_json::Value> {
        let Some(url) = &self.url else {
            return Err(json!({ "error": "partner endpoint not configured" }));
        };

        let payload = json!({
            "name": name,
            "mobile": mobile,
            "email": email,
            "partner": self.partner_code,
        });

        let resp = match self.client.post(url).json(&payload).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("Partner API request failed: {}", e);
                return Err(json!({ "error": e.to_string() }));
            }
        };

        let status = resp.status();
        let body: serde_json::Value = resp.json().await.unwrap_or_else(|_| json!(null));

        if status.is_success() {
            info!("✅ Lead forwarded to partner API ({})", status);
            Ok(body)
        } else {
            error!("Partner API returned {}: {}", status, body);
            Err(json!({ "status": status.as_u16(), "body": body }))
        }
    }

}
