use serde::Serialize;
use tickerboard_core::{DashboardView, NewsPanel, QuotePanel, SymbolCatalog, SymbolSource};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct CatalogDocument<'a> {
    source: SymbolSource,
    default: Option<&'a str>,
    options: Vec<CatalogOption<'a>>,
}

#[derive(Debug, Serialize)]
struct CatalogOption<'a> {
    symbol: &'a str,
    name: &'a str,
}

pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

pub fn render_catalog(
    source: SymbolSource,
    catalog: &SymbolCatalog,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, CliError> {
    let default = catalog.default_symbol().map(|symbol| symbol.as_str());
    match format {
        OutputFormat::Json => render_json(
            &CatalogDocument {
                source,
                default,
                options: catalog
                    .entries()
                    .iter()
                    .map(|entry| CatalogOption {
                        symbol: entry.symbol.as_str(),
                        name: entry.name.as_str(),
                    })
                    .collect(),
            },
            pretty,
        ),
        OutputFormat::Table => {
            let rows = catalog
                .entries()
                .iter()
                .map(|entry| {
                    let marker = if Some(entry.symbol.as_str()) == default { "*" } else { "" };
                    vec![
                        marker.to_owned(),
                        entry.symbol.to_string(),
                        entry.name.clone(),
                    ]
                })
                .collect::<Vec<_>>();
            Ok(table(&["", "SYMBOL", "NAME"], &rows))
        }
    }
}

pub fn render_candidates(
    candidates: &[String],
    format: OutputFormat,
    pretty: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => render_json(candidates, pretty),
        OutputFormat::Table => {
            let rows = candidates
                .iter()
                .map(|candidate| vec![candidate.clone()])
                .collect::<Vec<_>>();
            Ok(table(&["CANDIDATE"], &rows))
        }
    }
}

pub fn render_view(view: &DashboardView, format: OutputFormat, pretty: bool) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => render_json(view, pretty),
        OutputFormat::Table => Ok(view_table(view)),
    }
}

fn view_table(view: &DashboardView) -> String {
    let mut out = String::new();
    let title = view.figure.title.as_deref().unwrap_or(view.symbol.as_str());
    out.push_str(&format!("{title} ({})\n\n", view.symbol));

    if !view.figure.series.is_empty() {
        let rows = view
            .figure
            .series
            .iter()
            .map(|series| {
                let first = series.x.first().cloned().unwrap_or_default();
                let last = series.x.last().cloned().unwrap_or_default();
                let latest = series
                    .y
                    .last()
                    .map(|value| format!("{value:.2}"))
                    .unwrap_or_default();
                vec![
                    series.name.clone(),
                    series.x.len().to_string(),
                    format!("{first} .. {last}"),
                    latest,
                ]
            })
            .collect::<Vec<_>>();
        out.push_str(&table(&["LINE", "POINTS", "RANGE", "LATEST"], &rows));
        out.push('\n');
    }

    match &view.quote {
        QuotePanel::Table(quote) => {
            let headers = quote.columns.iter().map(String::as_str).collect::<Vec<_>>();
            out.push_str(&table(&headers, &quote.rows));
        }
        QuotePanel::Message { text } => {
            out.push_str(text);
            out.push('\n');
        }
    }

    match &view.news {
        NewsPanel::Headlines { items } => {
            out.push('\n');
            for item in items {
                out.push_str(&format!("- {}\n", item.title));
            }
        }
        NewsPanel::Message { text } => {
            out.push('\n');
            out.push_str(text);
            out.push('\n');
        }
        NewsPanel::Empty => {}
    }

    out
}

/// Left-aligned columns separated by two spaces.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|header| header.len()).collect::<Vec<_>>();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            match widths.get_mut(index) {
                Some(width) => *width = (*width).max(cell.chars().count()),
                None => widths.push(cell.chars().count()),
            }
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{cell:<width$}", width = widths[index]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_line(headers.to_vec());
    for row in rows {
        push_line(row.iter().map(String::as_str).collect());
    }
    out
}
