use std::sync::Arc;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::data_source::{MarketData, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{
    DailyBar, ListingRow, NewsItem, QuoteTable, SeriesOutcome, Symbol, SymbolOverview, TimeSeries,
    TradingDate,
};

/// Public Alpha Vantage query endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage adapter. Every operation is a single GET against the
/// query endpoint; nothing is cached between calls.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl AlphaVantageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, function: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}?function={}", self.base_url, function);
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url.push_str("&apikey=");
        url.push_str(&urlencoding::encode(&self.api_key));
        url
    }

    async fn fetch(&self, function: &str, params: &[(&str, &str)]) -> Result<String, SourceError> {
        if self.api_key.trim().is_empty() {
            return Err(SourceError::invalid_request("alphavantage api key is empty"));
        }

        let request =
            HttpRequest::get(self.endpoint(function, params)).with_timeout_ms(self.timeout_ms);
        debug!("alphavantage GET {}", request.redacted_url());

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!(
                    "alphavantage transport error: {}",
                    error.message()
                ))
            } else {
                SourceError::invalid_request(format!(
                    "alphavantage transport error: {}",
                    error.message()
                ))
            }
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage {function} returned status {}",
                response.status
            )));
        }

        Ok(response.body)
    }
}

impl MarketData for AlphaVantageAdapter {
    fn listing_status(&self) -> SourceFuture<'_, Vec<ListingRow>> {
        Box::pin(async move {
            let body = self.fetch("LISTING_STATUS", &[("datatype", "csv")]).await?;
            if let Some(notice) = ProviderNotice::detect(&body) {
                return Err(notice.into_error("LISTING_STATUS"));
            }
            parse_listing_csv(&body)
        })
    }

    fn daily_adjusted<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, SeriesOutcome> {
        Box::pin(async move {
            let body = self
                .fetch(
                    "TIME_SERIES_DAILY_ADJUSTED",
                    &[("symbol", symbol.as_str()), ("datatype", "csv")],
                )
                .await?;
            parse_daily_csv(symbol, &body)
        })
    }

    fn global_quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, QuoteTable> {
        Box::pin(async move {
            let body = self
                .fetch(
                    "GLOBAL_QUOTE",
                    &[("symbol", symbol.as_str()), ("datatype", "csv")],
                )
                .await?;
            if let Some(notice) = ProviderNotice::detect(&body) {
                return Err(notice.into_error("GLOBAL_QUOTE"));
            }
            parse_quote_csv(&body)
        })
    }

    fn news_sentiment<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Vec<NewsItem>> {
        Box::pin(async move {
            let body = self
                .fetch("NEWS_SENTIMENT", &[("tickers", symbol.as_str())])
                .await?;
            parse_news_json(&body)
        })
    }

    fn symbol_overview<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> SourceFuture<'a, Option<SymbolOverview>> {
        Box::pin(async move {
            let body = self
                .fetch("OVERVIEW", &[("symbol", symbol.as_str())])
                .await?;
            if let Some(notice) = ProviderNotice::detect(&body) {
                return Err(notice.into_error("OVERVIEW"));
            }
            parse_overview_json(&body)
        })
    }
}

/// Informational JSON body Alpha Vantage sends instead of data.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProviderNotice {
    /// `Note` / `Information`: rate limits, premium endpoints, demo key.
    Limit(String),
    /// `Error Message`: unknown function or symbol.
    Error(String),
}

impl ProviderNotice {
    fn detect(body: &str) -> Option<Self> {
        let trimmed = body.trim_start();
        if !trimmed.starts_with('{') {
            return None;
        }

        let value: Value = serde_json::from_str(trimmed).ok()?;
        let object = value.as_object()?;
        if let Some(message) = object.get("Error Message").and_then(Value::as_str) {
            return Some(Self::Error(message.to_owned()));
        }
        ["Note", "Information"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(|message| Self::Limit(message.to_owned()))
    }

    fn message(&self) -> &str {
        match self {
            Self::Limit(message) | Self::Error(message) => message,
        }
    }

    fn into_error(self, function: &str) -> SourceError {
        match self {
            Self::Limit(message) => {
                SourceError::rate_limited(format!("alphavantage {function}: {message}"))
            }
            Self::Error(message) => {
                SourceError::invalid_request(format!("alphavantage {function}: {message}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingCsvRow {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(rename = "assetType", default)]
    asset_type: Option<String>,
    status: String,
}

fn parse_listing_csv(body: &str) -> Result<Vec<ListingRow>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    reader
        .deserialize::<ListingCsvRow>()
        .map(|row| {
            let row = row.map_err(|e| {
                SourceError::malformed(format!("failed to parse listing status csv: {e}"))
            })?;
            Ok(ListingRow {
                symbol: row.symbol,
                name: row.name,
                exchange: row.exchange.filter(|value| !value.is_empty()),
                asset_type: row.asset_type.filter(|value| !value.is_empty()),
                status: row.status,
            })
        })
        .collect()
}

fn parse_daily_csv(symbol: &Symbol, body: &str) -> Result<SeriesOutcome, SourceError> {
    if let Some(notice) = ProviderNotice::detect(body) {
        warn!(
            "no time series for {symbol}: alphavantage said: {}",
            notice.message()
        );
        return Ok(SeriesOutcome::NoData);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::malformed(format!("failed to read time series header: {e}")))?
        .clone();
    let column = |name: &str| headers.iter().position(|header| header == name);

    let Some(timestamp) = column("timestamp") else {
        warn!("no time series for {symbol}: response has no timestamp column");
        return Ok(SeriesOutcome::NoData);
    };

    let required = |name: &str| {
        column(name).ok_or_else(|| {
            SourceError::malformed(format!("time series for {symbol} has no '{name}' column"))
        })
    };
    let open = required("open")?;
    let high = required("high")?;
    let low = required("low")?;
    let close = required("close")?;
    let adjusted_close = column("adjusted_close");

    let mut bars = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            SourceError::malformed(format!("failed to parse time series csv: {e}"))
        })?;
        let cell = |index: usize| record.get(index).unwrap_or_default();
        let price = |index: usize, name: &str| {
            cell(index).parse::<f64>().map_err(|_| {
                SourceError::malformed(format!(
                    "time series row {} has invalid {name} '{}'",
                    line + 1,
                    cell(index)
                ))
            })
        };

        let date = TradingDate::parse(cell(timestamp))
            .map_err(|e| SourceError::malformed(format!("time series row {}: {e}", line + 1)))?;

        bars.push(DailyBar {
            date,
            open: price(open, "open")?,
            high: price(high, "high")?,
            low: price(low, "low")?,
            close: price(close, "close")?,
            adjusted_close: adjusted_close.and_then(|index| cell(index).parse::<f64>().ok()),
        });
    }

    Ok(SeriesOutcome::Series(TimeSeries::new(symbol.clone(), bars)))
}

fn parse_quote_csv(body: &str) -> Result<QuoteTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(body.as_bytes());

    let columns = reader
        .headers()
        .map_err(|e| SourceError::malformed(format!("failed to read quote header: {e}")))?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if columns.iter().all(String::is_empty) {
        return Err(SourceError::malformed("quote response is empty"));
    }

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_owned).collect::<Vec<_>>())
                .map_err(|e| SourceError::malformed(format!("failed to parse quote csv: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuoteTable { columns, rows })
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    feed: Vec<NewsFeedItem>,
}

#[derive(Debug, Deserialize)]
struct NewsFeedItem {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

fn parse_news_json(body: &str) -> Result<Vec<NewsItem>, SourceError> {
    if let Some(notice) = ProviderNotice::detect(body) {
        warn!("alphavantage NEWS_SENTIMENT said: {}", notice.message());
    }

    let response: NewsResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse news feed: {e}")))?;

    Ok(response
        .feed
        .into_iter()
        .map(|item| NewsItem {
            title: item.title,
            url: item.url,
            source: item.source,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct OverviewResponse {
    #[serde(rename = "Symbol", default)]
    symbol: Option<String>,
    #[serde(rename = "Name", default)]
    name: Option<String>,
}

fn parse_overview_json(body: &str) -> Result<Option<SymbolOverview>, SourceError> {
    let response: OverviewResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse overview: {e}")))?;

    Ok(response.symbol.map(|symbol| SymbolOverview {
        symbol,
        name: response.name.filter(|name| !name.trim().is_empty()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    const DAILY_CSV: &str = "timestamp,open,high,low,close,adjusted_close,volume,dividend_amount,split_coefficient\n\
2024-01-03,161.0,162.5,160.1,161.9,160.2,4000,0.0000,1.0\n\
2024-01-02,160.0,161.7,159.3,160.5,158.8,3500,0.0000,1.0\n";

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn answering(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("valid symbol")
    }

    #[tokio::test]
    async fn daily_request_carries_function_symbol_key_and_format() {
        let client = Arc::new(RecordingHttpClient::answering(Ok(HttpResponse::ok(DAILY_CSV))));
        let adapter = AlphaVantageAdapter::new(client.clone(), "alpha-key")
            .with_base_url("https://av.test/query");

        adapter
            .daily_adjusted(&symbol("IBM"))
            .await
            .expect("series should parse");

        assert_eq!(
            client.recorded_urls(),
            vec![String::from(
                "https://av.test/query?function=TIME_SERIES_DAILY_ADJUSTED&symbol=IBM&datatype=csv&apikey=alpha-key"
            )]
        );
    }

    #[tokio::test]
    async fn news_request_filters_by_ticker() {
        let client = Arc::new(RecordingHttpClient::answering(Ok(HttpResponse::ok(
            r#"{"feed": []}"#,
        ))));
        let adapter = AlphaVantageAdapter::new(client.clone(), "k");

        let news = adapter.news_sentiment(&symbol("MSFT")).await.expect("news");
        assert!(news.is_empty());
        assert!(client.recorded_urls()[0].contains("function=NEWS_SENTIMENT&tickers=MSFT&apikey=k"));
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let client = Arc::new(RecordingHttpClient::answering(Ok(HttpResponse {
            status: 503,
            body: String::new(),
        })));
        let adapter = AlphaVantageAdapter::new(client, "k");

        let error = adapter
            .global_quote(&symbol("IBM"))
            .await
            .expect_err("503 should fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn transport_errors_keep_retryability() {
        let client = Arc::new(RecordingHttpClient::answering(Err(HttpError::new(
            "connection reset",
        ))));
        let adapter = AlphaVantageAdapter::new(client, "k");

        let error = adapter.listing_status().await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn empty_api_key_is_rejected_before_any_request() {
        let client = Arc::new(RecordingHttpClient::answering(Ok(HttpResponse::ok(""))));
        let adapter = AlphaVantageAdapter::new(client.clone(), "  ");

        let error = adapter.listing_status().await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(client.recorded_urls().is_empty());
    }

    #[test]
    fn daily_csv_is_sorted_ascending() {
        let outcome = parse_daily_csv(&symbol("IBM"), DAILY_CSV).expect("valid csv");
        let SeriesOutcome::Series(series) = outcome else {
            panic!("expected a series");
        };

        let dates = series
            .bars
            .iter()
            .map(|bar| bar.date.format_iso())
            .collect::<Vec<_>>();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03"]);
        assert_eq!(series.bars[0].adjusted_close, Some(158.8));
    }

    #[test]
    fn daily_without_timestamp_column_is_no_data() {
        let notice = r#"{"Information": "This is a premium endpoint."}"#;
        assert_eq!(
            parse_daily_csv(&symbol("IBM"), notice).expect("not an error"),
            SeriesOutcome::NoData
        );
        assert_eq!(
            parse_daily_csv(&symbol("IBM"), "").expect("not an error"),
            SeriesOutcome::NoData
        );
    }

    #[test]
    fn daily_without_adjusted_close_still_parses() {
        let body = "timestamp,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,10\n";
        let SeriesOutcome::Series(series) =
            parse_daily_csv(&symbol("IBM"), body).expect("valid csv")
        else {
            panic!("expected a series");
        };
        assert_eq!(series.bars[0].adjusted_close, None);
    }

    #[test]
    fn daily_with_missing_price_column_is_malformed() {
        let body = "timestamp,open,high,low\n2024-01-02,1,2,0.5\n";
        let error = parse_daily_csv(&symbol("IBM"), body).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
        assert!(error.message().contains("'close'"));
    }

    #[test]
    fn quote_csv_is_kept_verbatim() {
        let body = "symbol,open,high,low,price,volume,latestDay,previousClose,change,changePercent\n\
IBM,161.0000,162.5000,160.1000,161.9000,4000,2024-01-03,160.5000,1.4000,0.8723%\n";
        let table = parse_quote_csv(body).expect("valid quote");

        assert_eq!(table.columns.len(), 10);
        assert_eq!(table.columns[4], "price");
        assert_eq!(table.first_value("changePercent"), Some("0.8723%"));
    }

    #[test]
    fn empty_quote_body_is_malformed() {
        let error = parse_quote_csv("").expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[test]
    fn quote_notice_is_rate_limited() {
        let notice = ProviderNotice::detect(
            r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
        )
        .expect("notice");
        assert_eq!(
            notice.into_error("GLOBAL_QUOTE").kind(),
            SourceErrorKind::RateLimited
        );
    }

    #[test]
    fn csv_bodies_are_not_notices() {
        assert_eq!(ProviderNotice::detect(DAILY_CSV), None);
    }

    #[test]
    fn listing_rows_keep_status_and_optional_columns() {
        let body = "symbol,name,exchange,assetType,ipoDate,delistingDate,status\n\
A,Agilent Technologies Inc,NYSE,Stock,1999-11-18,null,Active\n\
AAA,,NYSE ARCA,ETF,2020-09-09,null,Delisted\n";
        let rows = parse_listing_csv(body).expect("valid listing");

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_active());
        assert_eq!(rows[0].asset_type.as_deref(), Some("Stock"));
        assert!(!rows[1].is_active());
        assert_eq!(rows[1].name, "");
    }

    #[test]
    fn news_titles_are_extracted_in_order() {
        let body = r#"{"items": "2", "feed": [
            {"title": "First", "url": "https://news.test/1", "source": "Wire"},
            {"title": "Second"}
        ]}"#;
        let news = parse_news_json(body).expect("valid news");

        assert_eq!(
            news.iter().map(|item| item.title.as_str()).collect::<Vec<_>>(),
            vec!["First", "Second"]
        );
        assert_eq!(news[0].source.as_deref(), Some("Wire"));
    }

    #[test]
    fn news_without_feed_is_empty() {
        let news = parse_news_json(r#"{"Information": "Invalid inputs."}"#).expect("no feed");
        assert!(news.is_empty());
    }

    #[test]
    fn invalid_news_json_is_malformed() {
        let error = parse_news_json("title\nnope").expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[test]
    fn unknown_symbol_overview_is_none() {
        assert_eq!(parse_overview_json("{}").expect("empty object"), None);

        let overview = parse_overview_json(r#"{"Symbol": "IBM", "Name": "International Business Machines"}"#)
            .expect("valid overview")
            .expect("known symbol");
        assert_eq!(overview.symbol, "IBM");
        assert_eq!(overview.name.as_deref(), Some("International Business Machines"));
    }
}
