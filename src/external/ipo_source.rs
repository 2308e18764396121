use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

use crate::external::html::clean_text;

pub const SCRAPE_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120 Safari/537.36";

/// One parsed row from an external IPO calendar, in the shared shape all
/// sources normalize into. Price/size fields stay opaque strings.
#[derive(Debug, Clone, Default)]
pub struct ScrapedIpo {
    pub company: String,
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub open_date: Option<String>,
    pub close_date: Option<String>,
    pub listing_date: Option<String>,
    pub ipo_date: Option<String>,
    pub issue_price: Option<String>,
    pub price_range: Option<String>,
    pub lot_size: Option<String>,
    pub issue_size: Option<String>,
    pub shares: Option<String>,
    pub est_volume: Option<String>,
    pub status: Option<String>,
    pub gmp: Option<String>,
    pub source: &'static str,
    pub source_url: String,
}

impl ScrapedIpo {
    /// Company name lower-cased with everything outside [a-z0-9]
    /// stripped; the within-run dedup key.
    pub fn dedup_key(&self) -> String {
        self.company
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

/// One scraping origin. Each implementation owns its table heuristic so
/// adding a source never touches shared dedup/upsert logic.
#[async_trait]
pub trait IpoSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_listings(&self) -> Result<Vec<ScrapedIpo>, SourceError>;
}

// ==============================================================================
// Shared row utilities
// ==============================================================================

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static LONG_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]{3,9})\s+(\d{1,2}),\s+(\d{4})").unwrap());

/// Parse either an ISO `YYYY-MM-DD` literal or a `"Mon D, YYYY"` form.
/// Anything else is None; a bad date never fails a row.
pub fn parse_date_any(s: &str) -> Option<String> {
    let s = clean_text(s);
    if s.is_empty() {
        return None;
    }

    if ISO_DATE_RE.is_match(&s) {
        return Some(s);
    }

    let caps = LONG_DATE_RE.captures(&s)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    Some(format!("{}-{:02}-{:02}", &caps[3], month, day))
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

/// Upper-cased ticker stripped to [A-Z0-9.-]; empty results become None.
pub fn normalize_symbol(s: &str) -> Option<String> {
    let symbol: String = clean_text(s)
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

/// Zip header names onto row cells, falling back to positional `col_N`
/// keys where the header row is shorter than the data row.
pub fn row_by_header(headers: &[String], cells: &[String]) -> HashMap<String, String> {
    cells
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let key = headers
                .get(idx)
                .map(|h| h.to_lowercase())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| format!("col_{}", idx));
            (key, value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_iso_passthrough() {
        assert_eq!(parse_date_any("2026-01-15"), Some("2026-01-15".to_string()));
    }

    #[test]
    fn test_parse_date_long_form() {
        assert_eq!(parse_date_any("Jan 15, 2026"), Some("2026-01-15".to_string()));
        assert_eq!(
            parse_date_any("September 3, 2025"),
            Some("2025-09-03".to_string())
        );
        assert_eq!(parse_date_any("Sept 9, 2025"), Some("2025-09-09".to_string()));
    }

    #[test]
    fn test_parse_date_garbage_is_none() {
        assert_eq!(parse_date_any("TBA"), None);
        assert_eq!(parse_date_any(""), None);
        assert_eq!(parse_date_any("15/01/2026"), None);
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" acme "), Some("ACME".to_string()));
        assert_eq!(normalize_symbol("BRK.B*"), Some("BRK.B".to_string()));
        assert_eq!(normalize_symbol("--"), Some("--".to_string()));
        assert_eq!(normalize_symbol("  "), None);
        assert_eq!(normalize_symbol("₹"), None);
    }

    #[test]
    fn test_dedup_key_normalization() {
        let a = ScrapedIpo { company: "Swiggy IPO".into(), ..Default::default() };
        let b = ScrapedIpo { company: "SWIGGY   IPO".into(), ..Default::default() };
        let c = ScrapedIpo { company: "Swiggy (IPO)".into(), ..Default::default() };
        assert_eq!(a.dedup_key(), "swiggyipo");
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_eq!(a.dedup_key(), c.dedup_key());
    }

    #[test]
    fn test_row_by_header_positional_fallback() {
        let headers = vec!["Company".to_string()];
        let cells = vec!["Acme".to_string(), "NYSE".to_string()];
        let row = row_by_header(&headers, &cells);
        assert_eq!(row.get("company").map(String::as_str), Some("Acme"));
        assert_eq!(row.get("col_1").map(String::as_str), Some("NYSE"));
    }
}
