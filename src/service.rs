//! # Race Service
//!
//! The handle the API layer talks to. It owns the catalog and its one-time
//! load, validates arguments, and hands back [`EventSummary`] values.
//!
//! ## Lifecycle
//!
//! A service starts Uninitialized. The first call to [`RaceService::init`] or
//! to any query loads the catalog exactly once, even when many threads race
//! for it; the others block on the same load and then share the result. Once
//! Ready it never goes back. A failed load leaves the service Uninitialized
//! and the error goes to the caller that triggered it.
//!
//! After loading, every query is a pure read over shared immutable data, so
//! a service wrapped in `Arc` can be queried from any number of threads
//! without locking.

use std::num::NonZeroUsize;

use chrono::NaiveDate;
use log::{debug, info};
use once_cell::sync::OnceCell;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{RaceCatalogError, Result};
use crate::search::{search_with, SearchQuery};
use crate::{
    CatalogSource, CatalogStats, EventSummary, RaceCatalog, RaceCategory, SearchConfig,
};

/// Owner of the race catalog and entry point for searches.
#[derive(Debug)]
pub struct RaceService {
    source: CatalogSource,
    config: SearchConfig,
    catalog: OnceCell<RaceCatalog>,
}

impl RaceService {
    /// Create a service that loads `source` on first use, with default configuration.
    pub fn new(source: CatalogSource) -> Self {
        Self::with_config(source, SearchConfig::default())
    }

    /// Create a service with custom search configuration.
    pub fn with_config(source: CatalogSource, config: SearchConfig) -> Self {
        Self {
            source,
            config,
            catalog: OnceCell::new(),
        }
    }

    /// Create a service that is Ready from the start.
    ///
    /// A [`RaceCatalog`] is never empty, so the service never serves an empty catalog.
    pub fn from_catalog(catalog: RaceCatalog, config: SearchConfig) -> Self {
        Self {
            source: CatalogSource::Records(Vec::new()),
            config,
            catalog: OnceCell::with_value(catalog),
        }
    }

    /// Load the catalog now rather than on the first query.
    ///
    /// Call before accepting traffic so a bad source fails startup. Calling it
    /// again after success is a no-op.
    pub fn init(&self) -> Result<()> {
        self.catalog().map(|_| ())
    }

    pub fn is_ready(&self) -> bool {
        self.catalog.get().is_some()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The loaded catalog, loading it first if needed.
    pub fn catalog(&self) -> Result<&RaceCatalog> {
        self.catalog.get_or_try_init(|| {
            info!("[RaceService] Loading catalog from {}", self.source.describe());
            RaceCatalog::load(&self.source)
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Search names and locations for `query`.
    ///
    /// `limit` defaults to the configured default (50) and must be positive.
    /// An empty query returns the first `limit` races unfiltered. No match
    /// is an empty list, not an error.
    pub fn search(&self, query: &str, limit: Option<i64>) -> Result<Vec<EventSummary>> {
        let limit = self.resolve_limit(limit)?;
        let query = self.prepare_query(query)?;
        let catalog = self.catalog()?;

        let results: Vec<EventSummary> = search_with(catalog, &query, limit)
            .into_iter()
            .map(|event| event.summary())
            .collect();

        debug!(
            "[RaceService] search '{}' limit {} -> {} results",
            query.normalized(),
            limit,
            results.len()
        );
        Ok(results)
    }

    /// Every race, in catalog order.
    pub fn list(&self) -> Result<Vec<EventSummary>> {
        Ok(self
            .catalog()?
            .all()
            .iter()
            .map(|event| event.summary())
            .collect())
    }

    /// Every race of one category, in catalog order.
    pub fn list_by_category(&self, category: RaceCategory) -> Result<Vec<EventSummary>> {
        Ok(self
            .catalog()?
            .all()
            .iter()
            .filter(|event| event.category() == category)
            .map(|event| event.summary())
            .collect())
    }

    /// Races dated on or after `from`, in catalog order, bounded like [`search`](Self::search).
    pub fn upcoming(&self, from: NaiveDate, limit: Option<i64>) -> Result<Vec<EventSummary>> {
        let limit = self.resolve_limit(limit)?;
        Ok(self
            .catalog()?
            .all()
            .iter()
            .filter(|event| event.date() >= from)
            .take(limit.get())
            .map(|event| event.summary())
            .collect())
    }

    /// Run several queries against the shared catalog.
    ///
    /// All queries are validated before any runs; one bad query fails the batch.
    pub fn search_many(
        &self,
        queries: &[&str],
        limit: Option<i64>,
    ) -> Result<Vec<Vec<EventSummary>>> {
        let limit = self.resolve_limit(limit)?;
        let prepared = queries
            .iter()
            .map(|q| self.prepare_query(q))
            .collect::<Result<Vec<_>>>()?;
        let catalog = self.catalog()?;

        let run = |query: &SearchQuery| -> Vec<EventSummary> {
            search_with(catalog, query, limit)
                .into_iter()
                .map(|event| event.summary())
                .collect()
        };

        #[cfg(feature = "parallel")]
        let results = prepared.par_iter().map(run).collect();
        #[cfg(not(feature = "parallel"))]
        let results = prepared.iter().map(run).collect();

        Ok(results)
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        Ok(self.catalog()?.stats())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn resolve_limit(&self, limit: Option<i64>) -> Result<NonZeroUsize> {
        let requested = limit.unwrap_or(i64::from(self.config.default_limit));
        if requested <= 0 {
            return Err(RaceCatalogError::invalid(format!(
                "limit must be positive, got {}",
                requested
            )));
        }

        let requested = usize::try_from(requested).unwrap_or(usize::MAX);
        NonZeroUsize::new(requested)
            .ok_or_else(|| RaceCatalogError::invalid("limit must be positive"))
    }

    fn prepare_query(&self, query: &str) -> Result<SearchQuery> {
        if let Some(ch) = query.chars().find(|c| c.is_control() && !c.is_whitespace()) {
            return Err(RaceCatalogError::invalid(format!(
                "query contains control character U+{:04X}",
                ch as u32
            )));
        }
        Ok(SearchQuery::new(query).with_date_text(self.config.match_date_text))
    }
}

impl Default for RaceService {
    /// Service over the builtin catalog.
    fn default() -> Self {
        Self::new(CatalogSource::Builtin)
    }
}

// ============================================================================
// Tests
// ============================================================================
