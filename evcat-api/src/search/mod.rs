//! Event search pipeline
//!
//! A request flows through these stages in order:
//! 1. `query` - parameterized read of the events table
//! 2. `range` - start date window (date only)
//! 3. `accessibility` - organizer join, only when tags were requested
//! 4. `geocode` - organizer address to coordinates, concurrent per event
//! 5. `sort` - chronological or by distance
//!
//! The organizer table is read once per request and every stage works on that
//! snapshot. Nothing is shared between requests except the pool and the
//! geocoder.

pub mod accessibility;
pub mod date;
pub mod geocode;
pub mod query;
pub mod range;
pub mod sort;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::db;
use crate::models::{Coordinates, EnrichedEvent};
use accessibility::{filter_by_accessibility, AccessibilityTag};
use evcat_common::config::ServiceConfig;
use geocode::{enrich_events, EnrichOptions, Geocoder};
use query::EventFilter;
use range::{deserialize_date_bound, filter_by_date_range, DateRange};
use sort::{sort_events, InvalidReferenceError, SortDirective};

/// Search request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    #[serde(deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub event_types: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub organizers: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub age_groups: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub accessibility: Vec<AccessibilityTag>,
    #[serde(deserialize_with = "deserialize_date_bound")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_date_bound")]
    pub end_date: Option<NaiveDate>,
    pub sort: Option<SortDirective>,
}

/// `null` reads as an empty list, same as a missing key
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchCriteria {
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            categories: self.categories.clone(),
            event_types: self.event_types.clone(),
            organizers: self.organizers.clone(),
            age_groups: self.age_groups.clone(),
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Search failures that abort the request
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Store query failed: {0}")]
    StoreQuery(#[from] sqlx::Error),

    #[error(transparent)]
    InvalidReference(#[from] InvalidReferenceError),
}

/// Pipeline settings
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub enrich: EnrichOptions,
    pub default_reference: Coordinates,
}

impl SearchOptions {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            enrich: EnrichOptions {
                timeout: Duration::from_millis(config.geocoder.timeout_ms),
                concurrency: config.geocoder.concurrency,
            },
            default_reference: Coordinates::new(
                config.search.default_latitude,
                config.search.default_longitude,
            ),
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}

/// Runs searches against a store and a geocoder
#[derive(Clone)]
pub struct EventSearch {
    db: SqlitePool,
    geocoder: Arc<dyn Geocoder>,
    options: SearchOptions,
}

impl EventSearch {
    pub fn new(db: SqlitePool, geocoder: Arc<dyn Geocoder>, options: SearchOptions) -> Self {
        Self {
            db,
            geocoder,
            options,
        }
    }

    /// Run the full pipeline for one request
    pub async fn run(&self, criteria: &SearchCriteria) -> Result<Vec<EnrichedEvent>, SearchError> {
        let directive = criteria.sort.unwrap_or_default();
        directive.validate()?;

        let events = db::events::fetch_events(&self.db, &criteria.filter()).await?;
        let directory = db::events::fetch_organizers(&self.db).await?;
        let fetched = events.len();

        let in_range = filter_by_date_range(events, criteria.date_range());
        let candidates: Vec<_> = if criteria.accessibility.is_empty() {
            in_range.collect()
        } else {
            filter_by_accessibility(in_range, &criteria.accessibility, &directory).collect()
        };

        debug!(
            fetched,
            candidates = candidates.len(),
            organizers = directory.len(),
            "Events filtered, enriching"
        );

        let enriched = enrich_events(
            candidates,
            &directory,
            self.geocoder.as_ref(),
            self.options.enrich,
        )
        .await;

        Ok(sort_events(enriched, &directive, self.options.default_reference))
    }
}
