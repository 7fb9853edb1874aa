//! # Race Finder
//!
//! Accent-insensitive search over a curated catalog of running races.
//!
//! This library provides:
//! - Text normalization (case folding, diacritic stripping, whitespace collapsing)
//! - A read-only, load-once race catalog with pre-normalized fields
//! - Substring search that preserves catalog order and honours a result limit
//! - A service handle that owns the one-time catalog load
//!
//! ## Features
//!
//! - **`parallel`** - Run query batches in parallel with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use race_finder::{CatalogSource, RaceService};
//!
//! let service = RaceService::new(CatalogSource::Json(
//!     r#"[{"name": "Maratón de Valencia", "location": "Valencia", "date": "2025-12-07"}]"#
//!         .to_string(),
//! ));
//!
//! let results = service.search("MARATON", None).unwrap();
//! assert_eq!(results[0].name, "Maratón de Valencia");
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, RaceCatalogError, Result};

// Text canonicalization
pub mod normalize;
pub use normalize::normalize;

// Catalog loading and storage
pub mod catalog;
pub use catalog::{CatalogSource, CatalogStats, RaceCatalog, RaceRecord, CATALOG_PATH_ENV};

// Substring search over the catalog
pub mod search;
pub use search::{search_events, search_with, SearchQuery};

// Service handle owning the one-time catalog load
pub mod service;
pub use service::RaceService;

// ============================================================================
// Core Types
// ============================================================================

/// Distance class of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RaceCategory {
    #[serde(rename = "5k")]
    FiveK,
    #[serde(rename = "10k")]
    TenK,
    #[serde(rename = "half_marathon")]
    HalfMarathon,
    #[serde(rename = "marathon")]
    Marathon,
    #[serde(rename = "ultra")]
    Ultra,
    #[serde(rename = "other")]
    Other,
}

impl RaceCategory {
    /// All categories, shortest first.
    pub const ALL: [RaceCategory; 6] = [
        RaceCategory::FiveK,
        RaceCategory::TenK,
        RaceCategory::HalfMarathon,
        RaceCategory::Marathon,
        RaceCategory::Ultra,
        RaceCategory::Other,
    ];

    /// Classify a race from its normalized name.
    ///
    /// Rules are checked in order, so "Media Maratón" is a half marathon
    /// even though it also contains "maraton".
    pub fn infer(normalized_name: &str) -> Self {
        let has = |needles: &[&str]| needles.iter().any(|n| normalized_name.contains(n));

        if has(&["ultra", "trail"]) {
            RaceCategory::Ultra
        } else if has(&["media maraton", "half marathon", "21k"]) {
            RaceCategory::HalfMarathon
        } else if has(&["maraton", "marathon", "42k"]) {
            RaceCategory::Marathon
        } else if has(&["10k", "10 km"]) {
            RaceCategory::TenK
        } else if has(&["5k", "5 km"]) {
            RaceCategory::FiveK
        } else {
            RaceCategory::Other
        }
    }

    /// Source-format label (`5k`, `half_marathon`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceCategory::FiveK => "5k",
            RaceCategory::TenK => "10k",
            RaceCategory::HalfMarathon => "half_marathon",
            RaceCategory::Marathon => "marathon",
            RaceCategory::Ultra => "ultra",
            RaceCategory::Other => "other",
        }
    }
}

impl fmt::Display for RaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaceCategory {
    type Err = RaceCatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_ascii_lowercase();
        RaceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == label)
            .ok_or_invalid(&format!("unknown race category '{}'", s))
    }
}

/// A single race in the catalog.
///
/// Immutable once built. The normalized fields are computed here, once, and
/// never again at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceEvent {
    name: String,
    location: String,
    date: NaiveDate,
    category: RaceCategory,
    date_label: String,
    normalized_name: String,
    normalized_location: String,
    normalized_date_label: String,
}

impl RaceEvent {
    /// Build an event, deriving the category from the name when none is given.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        date: NaiveDate,
        category: Option<RaceCategory>,
    ) -> Self {
        let name = name.into();
        let location = location.into();
        let normalized_name = normalize(&name);
        let normalized_location = normalize(&location);
        let date_label = spanish_date_label(date);
        let normalized_date_label = normalize(&date_label);
        let category = category.unwrap_or_else(|| RaceCategory::infer(&normalized_name));

        Self {
            name,
            location,
            date,
            category,
            date_label,
            normalized_name,
            normalized_location,
            normalized_date_label,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> RaceCategory {
        self.category
    }

    /// Long-form Spanish date, e.g. "7 de diciembre de 2025".
    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn normalized_location(&self) -> &str {
        &self.normalized_location
    }

    pub fn normalized_date_label(&self) -> &str {
        &self.normalized_date_label
    }

    /// The caller-facing shape of this event.
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            name: self.name.clone(),
            location: self.location.clone(),
            date: self.date,
            category: self.category,
        }
    }
}

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn spanish_date_label(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        SPANISH_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Event as returned to callers of [`RaceService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub name: String,
    pub location: String,
    /// ISO date (`YYYY-MM-DD`) on the wire
    pub date: NaiveDate,
    pub category: RaceCategory,
}

/// Configuration for search behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Limit applied when the caller does not pass one.
    /// Default: 50
    pub default_limit: u32,

    /// Also match the query against the Spanish date label ("diciembre").
    /// Default: false (name and location only)
    pub match_date_text: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            match_date_text: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
