use async_trait::async_trait;

use crate::external::html::{clean_text, extract_tables};
use crate::external::ipo_source::{
    parse_date_any, IpoSource, ScrapedIpo, SourceError, SCRAPE_USER_AGENT,
};

const GMP_URL: &str = "https://www.investorgain.com/report/live-ipo-gmp/331/";
const SOURCE_NAME: &str = "Investorgain";

/// Live grey-market-premium report. Positional columns; the repeated
/// in-body header row is recognized by its "IPO Name" label.
pub struct InvestorgainSource {
    client: reqwest::Client,
}

impl InvestorgainSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IpoSource for InvestorgainSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_listings(&self) -> Result<Vec<ScrapedIpo>, SourceError> {
        let resp = self
            .client
            .get(GMP_URL)
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

        Ok(parse_report(&html))
    }
}

/// Columns: company, price range, open date, close date, lot size, GMP.
/// A dash GMP means the premium is not quoted yet.
pub fn parse_report(html: &str) -> Vec<ScrapedIpo> {
    let mut records = Vec::new();

    for table in extract_tables(html) {
        for cells in &table.rows {
            if cells.len() < 6 {
                continue;
            }

            let company = clean_text(&cells[0]);
            if company.is_empty() || company.contains("IPO Name") {
                continue;
            }

            let price_range = non_empty(&cells[1]);
            let gmp = non_empty(&cells[5]).filter(|v| v != "-");

            records.push(ScrapedIpo {
                company,
                exchange: Some("NSE/BSE".to_string()),
                open_date: parse_date_any(&cells[2]),
                close_date: parse_date_any(&cells[3]),
                issue_price: price_range.clone(),
                price_range,
                lot_size: non_empty(&cells[4]),
                status: Some("Open".to_string()),
                gmp,
                source: SOURCE_NAME,
                source_url: GMP_URL.to_string(),
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
        <table>
          <tr>
            <td>IPO Name</td><td>Price</td><td>Open</td><td>Close</td><td>Lot</td><td>GMP</td>
          </tr>
          <tr>
            <td>Swiggy IPO</td><td>₹371 - ₹390</td><td>2026-03-01</td>
            <td>2026-03-03</td><td>38</td><td>₹25</td>
          </tr>
          <tr>
            <td>Quiet Foods</td><td>₹100</td><td>2026-03-05</td>
            <td>2026-03-07</td><td>150</td><td>-</td>
          </tr>
        </table>
    "#;

    #[test]
    fn test_parses_rows_and_skips_label_row() {
        let records = parse_report(FIXTURE);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].company, "Swiggy IPO");
        assert_eq!(records[0].gmp.as_deref(), Some("₹25"));
        assert_eq!(records[0].open_date.as_deref(), Some("2026-03-01"));
        assert_eq!(records[0].status.as_deref(), Some("Open"));
    }

    #[test]
    fn test_dash_gmp_becomes_none() {
        let records = parse_report(FIXTURE);
        assert_eq!(records[1].company, "Quiet Foods");
        assert_eq!(records[1].gmp, None);
    }
}
