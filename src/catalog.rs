//! # Race Catalog
//!
//! The ordered, read-only collection of races every search runs against.
//!
//! ## Source format
//!
//! A JSON array of records:
//!
//! ```json
//! [{"name": "Maratón de Valencia", "location": "Valencia", "date": "2025-12-07", "category": "marathon"}]
//! ```
//!
//! `category` is optional and derived from the name when absent. A source
//! that cannot be read or parsed fails the whole load. A single bad record
//! (blank name, unparseable date, unknown category) is logged and skipped;
//! the load only fails if nothing survives.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{OptionExt, RaceCatalogError, Result};
use crate::{RaceCategory, RaceEvent};

/// Environment variable naming a JSON catalog file to load instead of the builtin one.
pub const CATALOG_PATH_ENV: &str = "RACE_CATALOG_PATH";

/// Race list shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../data/races.json");

// ============================================================================
// Source Records
// ============================================================================

/// One raw record as it appears in the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub name: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RaceRecord {
    pub fn new(name: &str, location: &str, date: &str) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            date: date.to_string(),
            category: None,
        }
    }

    /// Validate the record and build the event, or say why it was rejected.
    fn into_event(self) -> std::result::Result<RaceEvent, String> {
        if self.name.trim().is_empty() {
            return Err("blank name".to_string());
        }
        if self.location.trim().is_empty() {
            return Err(format!("'{}' has a blank location", self.name));
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("'{}' has invalid date '{}': {}", self.name, self.date, e))?;

        let category = match self.category.as_deref() {
            Some(label) => Some(
                label
                    .parse::<RaceCategory>()
                    .map_err(|e| format!("'{}': {}", self.name, e))?,
            ),
            None => None,
        };

        Ok(RaceEvent::new(
            self.name.trim(),
            self.location.trim(),
            date,
            category,
        ))
    }
}

// ============================================================================
// Catalog Source
// ============================================================================

/// Where the catalog's raw records come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// The race list embedded in the crate
    #[default]
    Builtin,
    /// A JSON file on disk
    File(PathBuf),
    /// JSON text already in memory
    Json(String),
    /// Records built in code
    Records(Vec<RaceRecord>),
}

impl CatalogSource {
    /// `File` if `RACE_CATALOG_PATH` is set and non-empty, otherwise `Builtin`.
    pub fn from_env() -> Self {
        match std::env::var(CATALOG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => CatalogSource::File(PathBuf::from(path)),
            _ => CatalogSource::Builtin,
        }
    }

    /// Human-readable description for log lines.
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Builtin => "builtin catalog".to_string(),
            CatalogSource::File(path) => format!("file {}", path.display()),
            CatalogSource::Json(_) => "inline JSON".to_string(),
            CatalogSource::Records(records) => format!("{} in-memory records", records.len()),
        }
    }

    /// Read every record, keeping per-record parse failures separate from
    /// failures of the source as a whole.
    fn read_records(&self) -> Result<Vec<std::result::Result<RaceRecord, String>>> {
        match self {
            CatalogSource::Builtin => parse_records(BUILTIN_CATALOG),
            CatalogSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    RaceCatalogError::load(format!("cannot read {}: {}", path.display(), e))
                })?;
                parse_records(&text)
            }
            CatalogSource::Json(text) => parse_records(text),
            CatalogSource::Records(records) => Ok(records.iter().cloned().map(Ok).collect()),
        }
    }
}

fn parse_records(text: &str) -> Result<Vec<std::result::Result<RaceRecord, String>>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| RaceCatalogError::load(format!("malformed catalog JSON: {}", e)))?;

    let serde_json::Value::Array(entries) = value else {
        return Err(RaceCatalogError::load(
            "catalog JSON must be an array of race records",
        ));
    };

    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value::<RaceRecord>(entry).map_err(|e| e.to_string()))
        .collect())
}

// ============================================================================
// Race Catalog
// ============================================================================

/// The ordered set of races, fixed once loaded.
///
/// Order is the source order and is the only ordering searches ever use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceCatalog {
    events: Vec<RaceEvent>,
    skipped_records: usize,
}

impl RaceCatalog {
    /// Load and validate every record from `source`.
    ///
    /// Fails with [`RaceCatalogError::CatalogLoad`] if the source is missing,
    /// malformed, empty, or has no valid records.
    pub fn load(source: &CatalogSource) -> Result<Self> {
        let entries = source.read_records()?;
        if entries.is_empty() {
            return Err(RaceCatalogError::load(format!(
                "{} contains no race records",
                source.describe()
            )));
        }

        let total = entries.len();
        let mut events = Vec::with_capacity(total);
        let mut skipped_records = 0;

        for (index, entry) in entries.into_iter().enumerate() {
            match entry.and_then(RaceRecord::into_event) {
                Ok(event) => events.push(event),
                Err(reason) => {
                    warn!("[RaceCatalog] Skipping record {}: {}", index, reason);
                    skipped_records += 1;
                }
            }
        }

        if events.is_empty() {
            return Err(RaceCatalogError::load(format!(
                "none of the {} records in {} are valid",
                total,
                source.describe()
            )));
        }

        info!(
            "[RaceCatalog] Loaded {} races from {} ({} skipped)",
            events.len(),
            source.describe(),
            skipped_records
        );

        Ok(Self {
            events,
            skipped_records,
        })
    }

    /// Build a catalog from events already constructed in code.
    ///
    /// Fails with [`RaceCatalogError::CatalogLoad`] when `events` is empty,
    /// the same as a source with no valid records.
    pub fn from_events(events: Vec<RaceEvent>) -> Result<Self> {
        events
            .first()
            .ok_or_load_error("cannot build a catalog from zero events")?;

        Ok(Self {
            events,
            skipped_records: 0,
        })
    }

    /// Every event, unfiltered, in catalog order.
    pub fn all(&self) -> &[RaceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut category_counts = BTreeMap::new();
        for event in &self.events {
            *category_counts.entry(event.category()).or_insert(0u32) += 1;
        }

        CatalogStats {
            event_count: self.events.len() as u32,
            skipped_records: self.skipped_records as u32,
            category_counts,
        }
    }
}

/// Catalog statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub event_count: u32,
    /// Source records rejected at load time
    pub skipped_records: u32,
    pub category_counts: BTreeMap<RaceCategory, u32>,
}

// ============================================================================
// Tests
// ============================================================================
