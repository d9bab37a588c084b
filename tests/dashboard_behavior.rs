//! Behavior-driven tests for the selection → fetch → transform pipeline.
//!
//! These tests verify WHAT the dashboard shows for a selection and which
//! provider calls a selection costs.

use std::sync::Arc;

use tickerboard_core::{
    ChartField, DashboardError, HttpResponse, NewsPanel, QuotePanel, SourceErrorKind,
    NO_DATA_MESSAGE, NO_NEWS_MESSAGE,
};
use tickerboard_tests::*;

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn selecting_a_symbol_renders_chart_quote_and_news() {
    // Given: A listing catalog and a provider with data for IBM
    let client = Arc::new(FixtureHttpClient::new().with_defaults());
    let dashboard = listing_dashboard(&client).await;

    // When: IBM is selected
    let view = dashboard.render(&symbol("IBM")).await.expect("view");

    // Then: The chart is titled with the company name and has four lines
    assert_eq!(
        view.figure.title.as_deref(),
        Some("International Business Machines Corp")
    );
    let names = view
        .figure
        .series
        .iter()
        .map(|series| series.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Open", "High", "Low", "Close"]);

    // And: Dates run oldest to newest even though the feed is newest first
    assert_eq!(
        view.figure.series[3].x,
        vec!["2024-01-02", "2024-01-03", "2024-01-04"]
    );
    assert_eq!(view.figure.series[3].y, vec![160.5, 161.9, 162.8]);

    // And: The quote table keeps the provider's columns and cells verbatim
    match &view.quote {
        QuotePanel::Table(table) => {
            assert_eq!(table.columns[0], "symbol");
            assert_eq!(table.first_value("price"), Some("162.8000"));
            assert_eq!(table.first_value("changePercent"), Some("0.5559%"));
        }
        other => panic!("unexpected quote panel: {other:?}"),
    }

    // And: Headlines are listed in feed order
    match &view.news {
        NewsPanel::Headlines { items } => {
            let titles = items.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
            assert_eq!(
                titles,
                vec!["IBM expands AI partnership", "Mainframe sales beat estimates"]
            );
        }
        other => panic!("unexpected news panel: {other:?}"),
    }
}

#[tokio::test]
async fn selection_issues_series_quote_and_news_calls_in_order() {
    let client = Arc::new(FixtureHttpClient::new().with_defaults());
    let dashboard = listing_dashboard(&client).await;

    dashboard.render(&symbol("MSFT")).await.expect("view");

    let requests = client.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].contains("function=LISTING_STATUS&"));
    assert!(requests[1].contains("function=TIME_SERIES_DAILY_ADJUSTED&symbol=MSFT&datatype=csv"));
    assert!(requests[2].contains("function=GLOBAL_QUOTE&symbol=MSFT&datatype=csv"));
    assert!(requests[3].contains("function=NEWS_SENTIMENT&tickers=MSFT"));
}

#[tokio::test]
async fn configured_chart_fields_choose_the_lines() {
    let client = Arc::new(FixtureHttpClient::new().with_defaults());
    let dashboard = listing_dashboard(&client)
        .await
        .with_chart_fields(vec![ChartField::Close, ChartField::AdjustedClose]);

    let view = dashboard.render(&symbol("IBM")).await.expect("view");

    let names = view
        .figure
        .series
        .iter()
        .map(|series| series.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Close", "Adjusted Close"]);
    assert_eq!(view.figure.series[1].y, vec![158.8, 160.2, 161.0]);
}

// =============================================================================
// No caching
// =============================================================================

#[tokio::test]
async fn selecting_the_same_symbol_twice_fetches_twice() {
    // Given: A dashboard over the fixture provider
    let client = Arc::new(FixtureHttpClient::new().with_defaults());
    let dashboard = listing_dashboard(&client).await;

    // When: IBM is selected twice
    let first = dashboard.render(&symbol("IBM")).await.expect("first view");
    let second = dashboard.render(&symbol("IBM")).await.expect("second view");

    // Then: Both views are identical and every call was repeated
    assert_eq!(first, second);
    assert_eq!(client.count("TIME_SERIES_DAILY_ADJUSTED"), 2);
    assert_eq!(client.count("GLOBAL_QUOTE"), 2);
    assert_eq!(client.count("NEWS_SENTIMENT"), 2);
    assert_eq!(client.count("LISTING_STATUS"), 1);
}

// =============================================================================
// Placeholders
// =============================================================================

#[tokio::test]
async fn missing_time_series_shows_placeholder_and_skips_other_calls() {
    // Given: The time series endpoint answers with a premium notice
    let client = Arc::new(
        FixtureHttpClient::new()
            .answer(&["function=TIME_SERIES_DAILY_ADJUSTED"], PREMIUM_INFORMATION)
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    // When: IBM is selected
    let view = dashboard.render(&symbol("IBM")).await.expect("placeholder view");

    // Then: The chart is empty, the quote area carries the message, no news
    assert!(view.figure.series.is_empty());
    assert_eq!(view.figure.title, None);
    assert_eq!(
        view.quote,
        QuotePanel::Message {
            text: NO_DATA_MESSAGE.to_owned()
        }
    );
    assert_eq!(view.news, NewsPanel::Empty);

    // And: Neither the quote nor the news endpoint was called
    assert_eq!(client.count("GLOBAL_QUOTE"), 0);
    assert_eq!(client.count("NEWS_SENTIMENT"), 0);
}

#[tokio::test]
async fn empty_time_series_body_is_treated_as_no_data() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .answer(&["function=TIME_SERIES_DAILY_ADJUSTED"], "")
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    let view = dashboard.render(&symbol("AAPL")).await.expect("placeholder view");

    assert_eq!(view, tickerboard_core::DashboardView::no_data(symbol("AAPL")));
}

#[tokio::test]
async fn empty_news_feed_shows_no_news_message() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .answer(&["function=NEWS_SENTIMENT"], EMPTY_NEWS_JSON)
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    let view = dashboard.render(&symbol("IBM")).await.expect("view");

    assert_eq!(
        view.news,
        NewsPanel::Message {
            text: NO_NEWS_MESSAGE.to_owned()
        }
    );
    assert!(matches!(view.quote, QuotePanel::Table(_)));
}

#[tokio::test]
async fn news_notice_degrades_to_no_news_message() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .answer(&["function=NEWS_SENTIMENT"], RATE_LIMIT_NOTE)
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    let view = dashboard.render(&symbol("IBM")).await.expect("view");

    assert_eq!(
        view.news,
        NewsPanel::Message {
            text: NO_NEWS_MESSAGE.to_owned()
        }
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn quote_rate_limit_fails_the_selection_before_news() {
    // Given: The quote endpoint is rate limited
    let client = Arc::new(
        FixtureHttpClient::new()
            .answer(&["function=GLOBAL_QUOTE"], RATE_LIMIT_NOTE)
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    // When: IBM is selected
    let error = dashboard
        .render(&symbol("IBM"))
        .await
        .expect_err("rate limited quote must fail");

    // Then: A rate-limited quote error is reported and news is never fetched
    assert!(matches!(error, DashboardError::Quote(_)));
    assert_eq!(
        error.source_error().map(|source| source.kind()),
        Some(SourceErrorKind::RateLimited)
    );
    assert_eq!(client.count("NEWS_SENTIMENT"), 0);
}

#[tokio::test]
async fn time_series_server_error_is_unavailable() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .respond(
                &["function=TIME_SERIES_DAILY_ADJUSTED"],
                Ok(HttpResponse {
                    status: 503,
                    body: String::from("Service Unavailable"),
                }),
            )
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    let error = dashboard
        .render(&symbol("IBM"))
        .await
        .expect_err("server error must fail");

    assert!(matches!(error, DashboardError::Series(_)));
    assert_eq!(
        error.source_error().map(|source| source.kind()),
        Some(SourceErrorKind::Unavailable)
    );
}

#[tokio::test]
async fn malformed_time_series_is_reported() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .answer(
                &["function=TIME_SERIES_DAILY_ADJUSTED"],
                "timestamp,open,high,low,close\n2024-01-02,abc,1,1,1\n",
            )
            .with_defaults(),
    );
    let dashboard = listing_dashboard(&client).await;

    let error = dashboard
        .render(&symbol("IBM"))
        .await
        .expect_err("bad price must fail");

    assert_eq!(
        error.source_error().map(|source| source.kind()),
        Some(SourceErrorKind::Malformed)
    );
}

#[tokio::test]
async fn symbols_outside_the_catalog_are_rejected_without_provider_calls() {
    let client = Arc::new(FixtureHttpClient::new().with_defaults());
    let dashboard = listing_dashboard(&client).await;

    let error = dashboard
        .render(&symbol("TSLA"))
        .await
        .expect_err("unknown symbol must fail");

    assert!(matches!(error, DashboardError::UnknownSymbol(_)));
    assert_eq!(client.requests().len(), 1);
}
