use async_trait::async_trait;

use crate::external::html::{clean_text, extract_tables, HtmlTable};
use crate::external::ipo_source::{
    normalize_symbol, parse_date_any, row_by_header, IpoSource, ScrapedIpo, SourceError,
    SCRAPE_USER_AGENT,
};

const CALENDAR_URL: &str = "https://www.renaissancecapital.com/IPO-Center/Calendar";
const SOURCE_NAME: &str = "RenaissanceCapital";

/// World IPO calendar. The page carries several tables; the one we want
/// is identified by a "company"/"issuer" header keyword, and cells are
/// mapped by header name rather than position.
pub struct RenaissanceSource {
    client: reqwest::Client,
}

impl RenaissanceSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IpoSource for RenaissanceSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_listings(&self) -> Result<Vec<ScrapedIpo>, SourceError> {
        let resp = self
            .client
            .get(CALENDAR_URL)
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

        Ok(parse_calendar(&html))
    }
}

/// Pull rows out of the first table whose headers mention a company
/// column. A page without one parses to an empty list.
pub fn parse_calendar(html: &str) -> Vec<ScrapedIpo> {
    let Some(table) = find_calendar_table(extract_tables(html)) else {
        return Vec::new();
    };

    let mut records = Vec::new();

    for cells in &table.rows {
        let row = row_by_header(&table.headers, cells);

        let company = row
            .get("company")
            .or_else(|| row.get("issuer"))
            .cloned()
            .or_else(|| cells.first().cloned())
            .map(|c| clean_text(&c))
            .unwrap_or_default();
        if company.is_empty() {
            continue;
        }

        let ipo_date = row
            .get("date")
            .and_then(|v| parse_date_any(v))
            .or_else(|| row.get("ipo date").and_then(|v| parse_date_any(v)))
            .or_else(|| row.get("pricing date").and_then(|v| parse_date_any(v)));

        let price_range = row
            .get("price")
            .or_else(|| row.get("price range"))
            .cloned()
            .filter(|v| !v.is_empty());

        let est_volume = row
            .get("deal size")
            .or_else(|| row.get("amount"))
            .or_else(|| row.get("market cap"))
            .cloned()
            .filter(|v| !v.is_empty());

        records.push(ScrapedIpo {
            company,
            symbol: row.get("symbol").and_then(|v| normalize_symbol(v)),
            exchange: row.get("exchange").map(|v| clean_text(v)).filter(|v| !v.is_empty()),
            ipo_date,
            price_range,
            shares: row.get("shares").cloned().filter(|v| !v.is_empty()),
            est_volume,
            source: SOURCE_NAME,
            source_url: CALENDAR_URL.to_string(),
            ..Default::default()
        });
    }

    records
}

fn find_calendar_table(tables: Vec<HtmlTable>) -> Option<HtmlTable> {
    tables.into_iter().find(|table| {
        let joined = table
            .headers
            .iter()
            .map(|h| h.to_lowercase())
            .collect::<Vec<_>>()
            .join("|");
        joined.contains("company") || joined.contains("issuer")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <table><tr><th>Nav</th></tr><tr><td>not a calendar</td></tr></table>
        <table>
          <thead>
            <tr>
              <th>Company</th><th>Symbol</th><th>Exchange</th>
              <th>Price Range</th><th>Shares</th><th>Deal Size</th><th>Date</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <td>Acme Robotics</td><td>acme*</td><td>NASDAQ</td>
              <td>$14 - $16</td><td>10,000,000</td><td>$150M</td><td>Jan 15, 2026</td>
            </tr>
            <tr>
              <td></td><td>GHOST</td><td>NYSE</td>
              <td>$5</td><td>1</td><td>$1M</td><td>Jan 16, 2026</td>
            </tr>
          </tbody>
        </table>
    "#;

    #[test]
    fn test_parses_header_keyword_table() {
        let records = parse_calendar(FIXTURE);
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.company, "Acme Robotics");
        assert_eq!(rec.symbol.as_deref(), Some("ACME"));
        assert_eq!(rec.exchange.as_deref(), Some("NASDAQ"));
        assert_eq!(rec.ipo_date.as_deref(), Some("2026-01-15"));
        assert_eq!(rec.price_range.as_deref(), Some("$14 - $16"));
        assert_eq!(rec.est_volume.as_deref(), Some("$150M"));
        assert_eq!(rec.source, "RenaissanceCapital");
    }

    #[test]
    fn test_page_without_calendar_table_is_empty() {
        let records = parse_calendar("<table><tr><th>Menu</th></tr></table>");
        assert!(records.is_empty());
    }
}
