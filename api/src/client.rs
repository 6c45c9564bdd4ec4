use crate::gviz::GvizResponse;
use crate::{DEFAULT_SHEET_URL, LABEL_COLUMN, ParticipantList};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// The gviz endpoint wraps its JSON in a JSONP-style call:
/// `/*O_o*/\ngoogle.visualization.Query.setResponse(` ... `);`
pub const WRAPPER_PREFIX: &str = "/*O_o*/\ngoogle.visualization.Query.setResponse(";
pub const WRAPPER_SUFFIX: &str = ");";

/// Participant feed client backed by a public spreadsheet export.
#[derive(Debug, Clone)]
pub struct SheetFeed {
    client: Client,
    url: String,
    timeout: Option<Duration>,
}

impl Default for SheetFeed {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Body(reqwest::Error, String),
    Json(serde_json::Error),
    Malformed(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Body(e, url) => write!(f, "Could not read body from {url}: {e}"),
            ApiError::Json(e) => write!(f, "Parse error: {e}"),
            ApiError::Malformed(msg) => write!(f, "Malformed feed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl SheetFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("luckydraw/0.1 (terminal lucky draw wheel)")
                .build()
                .unwrap_or_default(),
            url: url.into(),
            timeout: None,
        }
    }

    /// Bound the request. Without a timeout a stalled feed leaves the caller
    /// waiting indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the participant list. Single attempt, no retry.
    pub async fn fetch_participants(&self) -> ApiResult<ParticipantList> {
        let body = self.get_text(&self.url).await?;
        parse_feed(&body)
    }

    async fn get_text(&self, url: &str) -> ApiResult<String> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?;

        response
            .text()
            .await
            .map_err(|e| ApiError::Body(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Parsing: gviz text → ParticipantList
// ---------------------------------------------------------------------------

/// Strip the fixed-length JSONP wrapper. Only the lengths are checked, the
/// wrapper text itself is not compared.
pub fn strip_wrapper(text: &str) -> ApiResult<&str> {
    let start = WRAPPER_PREFIX.len();
    let end = text
        .len()
        .checked_sub(WRAPPER_SUFFIX.len())
        .filter(|end| *end >= start)
        .ok_or_else(|| {
            ApiError::Malformed(format!("response too short ({} bytes)", text.len()))
        })?;
    text.get(start..end)
        .ok_or_else(|| ApiError::Malformed("wrapper does not end on a character boundary".into()))
}

/// Parse a full gviz response body into the ordered participant labels.
/// Rows with a missing or null label cell are dropped.
pub fn parse_feed(text: &str) -> ApiResult<ParticipantList> {
    let json = strip_wrapper(text)?;
    let raw: GvizResponse = serde_json::from_str(json).map_err(ApiError::Json)?;
    Ok(raw
        .table
        .rows
        .iter()
        .filter_map(|row| row.value(LABEL_COLUMN))
        .map(value_to_label)
        .collect())
}

/// Render a cell value the way a browser's `String(v)` would for the kinds of
/// values a spreadsheet emits.
fn value_to_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(number_to_label).unwrap_or_else(|| n.to_string())
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `Number.prototype.toString()`: plain decimal for exponents in
/// `-7 < e < 21`, otherwise exponent notation with an explicit sign.
fn number_to_label(v: f64) -> String {
    if v == 0.0 {
        // -0 prints as "0"
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }

    // Shortest round-trip digits, e.g. "1.2345e3".
    let sci = format!("{:e}", v.abs());
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return v.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return v.to_string();
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(-n as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if n - 1 < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{first}e{sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (n - 1).abs())
        }
    };

    if v < 0.0 { format!("-{body}") } else { body }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(json: &str) -> String {
        format!("{WRAPPER_PREFIX}{json}{WRAPPER_SUFFIX}")
    }

    const SAMPLE_TABLE: &str = r#"{"version":"0.6","reqId":"0","status":"ok","table":{
        "cols":[{"id":"A","label":"Timestamp","type":"datetime"},{"id":"B","label":"Phone","type":"number"}],
        "rows":[
            {"c":[{"v":"Date(2025,0,1)"},{"v":12345678.0,"f":"12345678"}]},
            {"c":[{"v":"Date(2025,0,1)"},null]},
            {"c":[{"v":"Date(2025,0,2)"},{"v":"A-77"}]},
            {"c":[{"v":"Date(2025,0,2)"},{"v":null}]},
            {"c":[{"v":"Date(2025,0,3)"}]},
            {"c":[null,{"v":42}]}
        ]}}"#;

    #[test]
    fn wrapper_prefix_is_47_chars() {
        assert_eq!(WRAPPER_PREFIX.len(), 47);
        assert_eq!(WRAPPER_SUFFIX.len(), 2);
    }

    #[test]
    fn strip_wrapper_returns_inner_json() {
        let text = wrap(r#"{"table":{"rows":[]}}"#);
        assert_eq!(strip_wrapper(&text).unwrap(), r#"{"table":{"rows":[]}}"#);
    }

    #[test]
    fn strip_wrapper_rejects_short_bodies() {
        assert!(matches!(strip_wrapper(""), Err(ApiError::Malformed(_))));
        assert!(matches!(strip_wrapper("not a feed"), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn parse_feed_extracts_label_column_and_drops_missing_cells() {
        let list = parse_feed(&wrap(SAMPLE_TABLE)).unwrap();
        assert_eq!(list.as_slice(), &["12345678", "A-77", "42"]);
    }

    #[test]
    fn parse_feed_with_no_rows_is_empty() {
        let list = parse_feed(&wrap(r#"{"table":{"rows":[]}}"#)).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn parse_feed_rejects_invalid_json() {
        let err = parse_feed(&wrap("{\"table\": [")).unwrap_err();
        assert!(matches!(err, ApiError::Json(_)), "got {err}");
    }

    #[test]
    fn parse_feed_rejects_missing_table() {
        assert!(parse_feed(&wrap(r#"{"status":"error"}"#)).is_err());
    }

    #[test]
    fn numbers_are_labelled_like_browser_strings() {
        assert_eq!(number_to_label(12345678.0), "12345678");
        assert_eq!(number_to_label(-0.0), "0");
        assert_eq!(number_to_label(1.5), "1.5");
        assert_eq!(number_to_label(-2.5), "-2.5");
        assert_eq!(number_to_label(123.456), "123.456");
        assert_eq!(value_to_label(&serde_json::json!(true)), "true");
        assert_eq!(value_to_label(&serde_json::json!(9876543210u64)), "9876543210");
    }

    #[test]
    fn numbers_switch_to_exponent_notation_at_browser_thresholds() {
        assert_eq!(number_to_label(0.000001), "0.000001");
        assert_eq!(number_to_label(1e-7), "1e-7");
        assert_eq!(number_to_label(1.5e-7), "1.5e-7");
        assert_eq!(number_to_label(1e20), "100000000000000000000");
        assert_eq!(number_to_label(1e21), "1e+21");
        assert_eq!(number_to_label(-1.25e300), "-1.25e+300");
    }

    #[test]
    fn row_without_cells_fails_the_whole_feed() {
        let json = r#"{"table":{"rows":[{"c":[null,{"v":"A"}]},{}]}}"#;
        assert!(matches!(parse_feed(&wrap(json)), Err(ApiError::Json(_))));

        let json = r#"{"table":{"rows":[{"c":[null,{"v":"A"}]},{"c":null}]}}"#;
        assert!(parse_feed(&wrap(json)).is_err());
    }

    #[test]
    fn table_without_rows_fails_the_whole_feed() {
        assert!(parse_feed(&wrap(r#"{"table":{}}"#)).is_err());
    }

    #[tokio::test]
    async fn fetch_participants_reads_feed_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/gviz/tq")
            .with_status(200)
            .with_header("content-type", "text/javascript")
            .with_body(wrap(SAMPLE_TABLE))
            .create_async()
            .await;

        let feed = SheetFeed::new(format!("{}/gviz/tq", server.url()));
        let list = feed.fetch_participants().await.unwrap();

        mock.assert_async().await;
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(1), Some("A-77"));
    }

    #[tokio::test]
    async fn fetch_participants_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gviz/tq")
            .with_status(500)
            .create_async()
            .await;

        let feed = SheetFeed::new(format!("{}/gviz/tq", server.url()));
        let err = feed.fetch_participants().await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "got {err}");
    }

    #[tokio::test]
    async fn fetch_participants_rejects_unwrapped_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gviz/tq")
            .with_status(200)
            .with_body("<html>sign in</html>")
            .create_async()
            .await;

        let feed = SheetFeed::new(format!("{}/gviz/tq", server.url()));
        assert!(feed.fetch_participants().await.is_err());
    }
}
