//! Symbol catalog: the ticker → display name mapping behind the dropdown.
//!
//! The catalog is built once at startup from one of three [`SymbolSource`]s
//! and is read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::chat::ChatSource;
use crate::data_source::{MarketData, SourceError};
use crate::scan::{dedup_candidates, scan_messages};
use crate::{ListingRow, Symbol};

/// Where dropdown candidates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolSource {
    /// Every active symbol of the listing status feed.
    Listing,
    /// Chat tokens that appear in the listing status feed.
    ChatListing,
    /// Chat tokens confirmed one by one with a per-symbol lookup.
    ChatLookup,
}

impl SymbolSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::ChatListing => "chat-listing",
            Self::ChatLookup => "chat-lookup",
        }
    }

    pub const fn needs_chat(self) -> bool {
        !matches!(self, Self::Listing)
    }
}

impl Display for SymbolSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("listing status feed failed: {0}")]
    Listing(SourceError),
    #[error("chat scan failed: {0}")]
    Chat(SourceError),
    #[error("symbol source '{0}' needs a chat channel to scan")]
    MissingChat(SymbolSource),
}

/// One dropdown option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub symbol: Symbol,
    pub name: String,
}

/// Ordered ticker → display name mapping with an optional default selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<Symbol, usize>,
    default_symbol: Option<Symbol>,
}

impl SymbolCatalog {
    /// Builds a catalog from entries; the first occurrence of a symbol wins
    /// and an empty name displays as the symbol. The default selection is
    /// the first entry.
    pub fn from_entries(entries: impl IntoIterator<Item = (Symbol, String)>) -> Self {
        let mut catalog = Self::default();
        for (symbol, name) in entries {
            catalog.push(symbol, name);
        }
        catalog.default_symbol = catalog.entries.first().map(|entry| entry.symbol.clone());
        catalog
    }

    /// Active rows of the listing status feed, in feed order.
    pub fn from_listing(rows: &[ListingRow]) -> Self {
        Self::from_entries(
            rows.iter()
                .filter(|row| row.is_active())
                .filter(|row| !row.symbol.trim().is_empty())
                .filter_map(|row| match Symbol::parse(&row.symbol) {
                    Ok(symbol) => Some((symbol, row.name.clone())),
                    Err(error) => {
                        debug!("skipping listing row '{}': {error}", row.symbol);
                        None
                    }
                }),
        )
    }

    /// Entries whose symbol appears in `matches`, keeping catalog order. The
    /// default selection is the first match present in the catalog.
    pub fn filter_by_matches(&self, matches: &[String]) -> Self {
        let wanted = matches.iter().map(String::as_str).collect::<HashSet<_>>();
        let mut filtered = Self::from_entries(
            self.entries
                .iter()
                .filter(|entry| wanted.contains(entry.symbol.as_str()))
                .map(|entry| (entry.symbol.clone(), entry.name.clone())),
        );

        filtered.default_symbol = matches
            .iter()
            .find_map(|candidate| filtered.lookup(candidate).map(|entry| entry.symbol.clone()));
        filtered
    }

    /// Confirms each distinct candidate with one provider lookup. Only
    /// lookups that report the same symbol are kept; failures are dropped.
    pub async fn from_lookups(provider: &dyn MarketData, candidates: &[String]) -> Self {
        let mut entries = Vec::new();

        for candidate in dedup_candidates(candidates) {
            let symbol = match Symbol::parse(&candidate) {
                Ok(symbol) => symbol,
                Err(error) => {
                    debug!("dropping candidate '{candidate}': {error}");
                    continue;
                }
            };

            match provider.symbol_overview(&symbol).await {
                Ok(Some(overview)) if overview.symbol == symbol.as_str() => {
                    let name = overview.name.unwrap_or_else(|| symbol.to_string());
                    entries.push((symbol, name));
                }
                Ok(Some(overview)) => {
                    debug!(
                        "dropping candidate '{candidate}': lookup answered for '{}'",
                        overview.symbol
                    );
                }
                Ok(None) => debug!("dropping candidate '{candidate}': unknown symbol"),
                Err(error) => debug!("dropping candidate '{candidate}': lookup failed: {error}"),
            }
        }

        Self::from_entries(entries)
    }

    fn push(&mut self, symbol: Symbol, name: String) {
        if self.index.contains_key(&symbol) {
            return;
        }
        let name = if name.trim().is_empty() {
            symbol.to_string()
        } else {
            name
        };
        self.index.insert(symbol.clone(), self.entries.len());
        self.entries.push(CatalogEntry { symbol, name });
    }

    fn lookup(&self, symbol: &str) -> Option<&CatalogEntry> {
        let symbol = Symbol::parse(symbol).ok()?;
        self.get(&symbol)
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&CatalogEntry> {
        self.index.get(symbol).map(|&position| &self.entries[position])
    }

    pub fn name_of(&self, symbol: &Symbol) -> Option<&str> {
        self.get(symbol).map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn default_symbol(&self) -> Option<&Symbol> {
        self.default_symbol.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Chat channel to scan for `chat-*` sources.
#[derive(Clone, Copy)]
pub struct ChatScan<'a> {
    pub source: &'a dyn ChatSource,
    pub channel: &'a str,
    pub limit: usize,
}

/// Builds the startup catalog for `source`.
pub async fn build_catalog(
    source: SymbolSource,
    provider: &dyn MarketData,
    chat: Option<ChatScan<'_>>,
) -> Result<SymbolCatalog, CatalogError> {
    let candidates = match (source.needs_chat(), chat) {
        (false, _) => Vec::new(),
        (true, None) => return Err(CatalogError::MissingChat(source)),
        (true, Some(scan)) => {
            let messages = scan
                .source
                .recent_messages(scan.channel, scan.limit)
                .await
                .map_err(CatalogError::Chat)?;
            let candidates = scan_messages(&messages);
            info!(
                "scanned {} messages from '{}': {} ticker candidates",
                messages.len(),
                scan.channel,
                candidates.len()
            );
            candidates
        }
    };

    let catalog = match source {
        SymbolSource::Listing => {
            let rows = provider.listing_status().await.map_err(CatalogError::Listing)?;
            SymbolCatalog::from_listing(&rows)
        }
        SymbolSource::ChatListing => {
            let rows = provider.listing_status().await.map_err(CatalogError::Listing)?;
            SymbolCatalog::from_listing(&rows).filter_by_matches(&candidates)
        }
        SymbolSource::ChatLookup => SymbolCatalog::from_lookups(provider, &candidates).await,
    };

    info!("symbol catalog ({source}) has {} entries", catalog.len());
    Ok(catalog)
}
