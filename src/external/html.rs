use regex::Regex;
use std::sync::LazyLock;

// Best-effort table extraction over raw HTML. The target markup is not
// under our control, so this trades exactness for resilience: a page
// that stops matching yields zero tables, never an error.

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table[^>]*>(.*?)</table>").unwrap());
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap());
static HEADER_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<th[^>]*>(.*?)</th>").unwrap());
static DATA_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").unwrap());

#[derive(Debug, Clone)]
pub struct HtmlTable {
    /// Text of every `<th>` in the table, in document order.
    pub headers: Vec<String>,
    /// One entry per `<tr>` that contains at least one `<td>`.
    pub rows: Vec<Vec<String>>,
}

pub fn extract_tables(html: &str) -> Vec<HtmlTable> {
    TABLE_RE
        .captures_iter(html)
        .map(|table| {
            let body = table.get(1).map_or("", |m| m.as_str());

            let headers = HEADER_CELL_RE
                .captures_iter(body)
                .map(|cell| cell_text(cell.get(1).map_or("", |m| m.as_str())))
                .collect();

            let rows = ROW_RE
                .captures_iter(body)
                .filter_map(|row| {
                    let row_body = row.get(1).map_or("", |m| m.as_str());
                    let cells: Vec<String> = DATA_CELL_RE
                        .captures_iter(row_body)
                        .map(|cell| cell_text(cell.get(1).map_or("", |m| m.as_str())))
                        .collect();
                    if cells.is_empty() {
                        None
                    } else {
                        Some(cells)
                    }
                })
                .collect();

            HtmlTable { headers, rows }
        })
        .collect()
}

fn cell_text(fragment: &str) -> String {
    clean_text(&decode_entities(&TAG_RE.replace_all(fragment, " ")))
}

/// Collapse whitespace runs and trim.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Only the entities that actually show up in these tables.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_runs() {
        assert_eq!(clean_text("  Swiggy \n\t IPO  "), "Swiggy IPO");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_extract_simple_table() {
        let html = r#"
            <html><body>
            <table class="table">
              <thead><tr><th>Company</th><th> Symbol </th></tr></thead>
              <tbody>
                <tr><td><a href="/x">Acme &amp; Co</a></td><td>ACME</td></tr>
                <tr><td>Beta Ltd</td><td>BETA</td></tr>
              </tbody>
            </table>
            </body></html>
        "#;

        let tables = extract_tables(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Company", "Symbol"]);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[0], vec!["Acme & Co", "ACME"]);
    }

    #[test]
    fn test_header_rows_without_td_are_skipped() {
        let html = "<table><tr><th>Name</th></tr><tr><td>Only Row</td></tr></table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0].rows, vec![vec!["Only Row".to_string()]]);
    }

    #[test]
    fn test_garbage_html_yields_no_tables() {
        assert!(extract_tables("<div>no tables here</div>").is_empty());
    }
}
