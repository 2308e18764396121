use async_trait::async_trait;

use crate::external::html::{clean_text, extract_tables};
use crate::external::ipo_source::{
    parse_date_any, IpoSource, ScrapedIpo, SourceError, SCRAPE_USER_AGENT,
};

const LIST_URL: &str = "https://www.chittorgarh.com/ipo/ipo_list_2026.asp";
const SOURCE_NAME: &str = "Chittorgarh";

/// Indian IPO list. No usable headers on this page, so columns are
/// taken positionally from any table row wide enough to be a listing.
pub struct ChittorgarhSource {
    client: reqwest::Client,
}

impl ChittorgarhSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IpoSource for ChittorgarhSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_listings(&self) -> Result<Vec<ScrapedIpo>, SourceError> {
        let resp = self
            .client
            .get(LIST_URL)
            .header(reqwest::header::USER_AGENT, SCRAPE_USER_AGENT)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SourceError::BadResponse(format!(
                "unexpected status {}",
                resp.status()
            )));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(parse_listing(&html))
    }
}

/// Columns: company, open date, close date, issue price, lot size,
/// issue size, listing date, status. Narrower rows are ignored.
pub fn parse_listing(html: &str) -> Vec<ScrapedIpo> {
    let mut records = Vec::new();

    for table in extract_tables(html) {
        for cells in &table.rows {
            if cells.len() < 8 {
                continue;
            }

            let company = clean_text(&cells[0]);
            if company.is_empty() {
                continue;
            }

            let issue_price = non_empty(&cells[3]);
            let issue_size = non_empty(&cells[5]);
            let status = non_empty(&cells[7]).or_else(|| Some("Upcoming".to_string()));

            records.push(ScrapedIpo {
                company,
                exchange: Some("NSE/BSE".to_string()),
                open_date: parse_date_any(&cells[1]),
                close_date: parse_date_any(&cells[2]),
                listing_date: parse_date_any(&cells[6]),
                issue_price: issue_price.clone(),
                price_range: issue_price,
                lot_size: non_empty(&cells[4]),
                issue_size: issue_size.clone(),
                est_volume: issue_size,
                status,
                source: SOURCE_NAME,
                source_url: LIST_URL.to_string(),
                ..Default::default()
            });
        }
    }

    records
}

fn non_empty(cell: &str) -> Option<String> {
    let value = clean_text(cell);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <table class="table">
          <tbody>
            <tr>
              <td>Bharat Foods</td><td>2026-02-10</td><td>2026-02-12</td>
              <td>₹95 - ₹100</td><td>150</td><td>₹500 Cr</td>
              <td>Feb 18, 2026</td><td>Open</td>
            </tr>
            <tr>
              <td>Too</td><td>Narrow</td><td>Row</td>
            </tr>
          </tbody>
        </table>
    "#;

    #[test]
    fn test_positional_parse() {
        let records = parse_listing(FIXTURE);
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.company, "Bharat Foods");
        assert_eq!(rec.exchange.as_deref(), Some("NSE/BSE"));
        assert_eq!(rec.open_date.as_deref(), Some("2026-02-10"));
        assert_eq!(rec.close_date.as_deref(), Some("2026-02-12"));
        assert_eq!(rec.listing_date.as_deref(), Some("2026-02-18"));
        assert_eq!(rec.issue_price.as_deref(), Some("₹95 - ₹100"));
        assert_eq!(rec.price_range, rec.issue_price);
        assert_eq!(rec.lot_size.as_deref(), Some("150"));
        assert_eq!(rec.est_volume.as_deref(), Some("₹500 Cr"));
        assert_eq!(rec.status.as_deref(), Some("Open"));
    }

    #[test]
    fn test_blank_status_defaults_to_upcoming() {
        let html = "<table><tr>\
            <td>NoStatus Ltd</td><td>TBA</td><td>TBA</td>\
            <td>₹10</td><td>100</td><td>₹1 Cr</td><td>TBA</td><td></td>\
            </tr></table>";
        let records = parse_listing(html);
        assert_eq!(records[0].status.as_deref(), Some("Upcoming"));
        assert_eq!(records[0].open_date, None);
    }
}
