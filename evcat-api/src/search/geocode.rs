//! Geocode enrichment
//!
//! Resolves each event organizer's address to coordinates through an external
//! geocoding service. A failed or timed-out lookup never fails the search:
//! the event keeps its address and simply has no coordinates.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Coordinates, EnrichedEvent, Event, Location, OrganizerDirectory};
use evcat_common::config::GeocoderConfig;

const USER_AGENT: &str = concat!("evcat/", env!("CARGO_PKG_VERSION"));

/// Geocoding errors
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Geocode timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error {status}: {message}")]
    Api { status: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Address to coordinates lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a free-text address, `None` when nothing matched
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Stand-in used when no API key is configured; never matches
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(None)
    }
}

/// Google Geocoding API response
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponse {
    /// First result on `OK`, `None` on `ZERO_RESULTS`, error otherwise
    pub fn best_match(self) -> Result<Option<Coordinates>, GeocodeError> {
        match self.status.as_str() {
            "OK" => Ok(self
                .results
                .into_iter()
                .next()
                .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng))),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(GeocodeError::Api {
                status: self.status,
                message: self.error_message.unwrap_or_default(),
            }),
        }
    }
}

/// HTTP geocoder speaking the Google Geocoding JSON protocol
pub struct HttpGeocoder {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        debug!(address = %address, "Querying geocoder");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16().to_string(),
                message: error_text,
            });
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        body.best_match()
    }
}

/// Build the configured geocoder
///
/// Without an API key geocoding is disabled and every event goes out
/// without coordinates.
pub fn geocoder_from_config(config: &GeocoderConfig) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    match config.api_key.as_deref() {
        Some(key) => Ok(Arc::new(HttpGeocoder::new(
            config.base_url.clone(),
            key,
            Duration::from_millis(config.timeout_ms),
        )?)),
        None => {
            warn!("No geocoder API key configured, location sorting will treat all events as unplaced");
            Ok(Arc::new(DisabledGeocoder))
        }
    }
}

/// Enrichment tuning
#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    /// Upper bound for a single lookup
    pub timeout: Duration,
    /// Maximum lookups in flight
    pub concurrency: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            concurrency: 8,
        }
    }
}

/// Attach organizer locations to every event
///
/// Lookups run concurrently (bounded) and the output keeps input order.
/// Returns only once every lookup has finished or timed out.
pub async fn enrich_events(
    events: Vec<Event>,
    directory: &OrganizerDirectory,
    geocoder: &dyn Geocoder,
    options: EnrichOptions,
) -> Vec<EnrichedEvent> {
    stream::iter(events)
        .map(|event| enrich_event(event, directory, geocoder, options.timeout))
        .buffered(options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await
}

async fn enrich_event(
    event: Event,
    directory: &OrganizerDirectory,
    geocoder: &dyn Geocoder,
    timeout: Duration,
) -> EnrichedEvent {
    let Some(organizer) = directory.for_event(&event) else {
        debug!(organizer = ?event.organizer(), "Organizer not found, no location");
        return EnrichedEvent {
            event,
            location: None,
        };
    };

    let address = organizer.address.clone();
    if address.trim().is_empty() {
        return EnrichedEvent {
            event,
            location: Some(Location::unresolved(address)),
        };
    }

    let lookup = tokio::time::timeout(timeout, geocoder.geocode(&address)).await;
    let location = match lookup {
        Ok(Ok(Some(coordinates))) => Location::resolved(address, coordinates),
        Ok(Ok(None)) => {
            debug!(address = %address, "No geocode match");
            Location::unresolved(address)
        }
        Ok(Err(e)) => {
            warn!(address = %address, error = %e, "Geocode failed, continuing without coordinates");
            Location::unresolved(address)
        }
        Err(_) => {
            warn!(
                address = %address,
                error = %GeocodeError::Timeout(timeout),
                "Geocode failed, continuing without coordinates"
            );
            Location::unresolved(address)
        }
    };

    EnrichedEvent {
        event,
        location: Some(location),
    }
}
