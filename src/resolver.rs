//! Weather Resolution Module
//!
//! Maps a region identifier (a region code such as `gom`, or free-form
//! coordinates such as `52.43,30.98`) to normalized current weather.

use std::sync::Arc;

use crate::api::{WeatherTransport, WeatherbitClient};
use crate::config::WeatherConfig;
use crate::coordinates::CoordinateParser;
use crate::error::ResolveError;
use crate::models::{Coordinate, WeatherResult};
use crate::regions::RegionDirectory;
use crate::weather;
use anyhow::Result;
use tracing::{debug, error, instrument};

/// Service for resolving region identifiers into current weather
pub struct WeatherResolver {
    regions: RegionDirectory,
    transport: Arc<dyn WeatherTransport>,
}

impl WeatherResolver {
    #[must_use]
    pub fn new(regions: RegionDirectory, transport: Arc<dyn WeatherTransport>) -> Self {
        Self { regions, transport }
    }

    /// Resolver over the Gomel oblast directory and a Weatherbit client
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let client = WeatherbitClient::new(config)?;
        Ok(Self::new(RegionDirectory::default(), Arc::new(client)))
    }

    #[must_use]
    pub fn regions(&self) -> &RegionDirectory {
        &self.regions
    }

    /// Resolve an identifier that may be absent altogether
    pub async fn resolve_input(
        &self,
        region_id: Option<&str>,
    ) -> Result<WeatherResult, ResolveError> {
        match region_id {
            Some(region_id) => self.resolve(region_id).await,
            None => Err(ResolveError::invalid_input("region identifier is required")),
        }
    }

    /// Current weather for a region code or a coordinate string
    #[instrument(skip(self))]
    pub async fn resolve(&self, region_id: &str) -> Result<WeatherResult, ResolveError> {
        let coordinate = self.resolve_coordinate(region_id)?;
        debug!(
            "Resolved '{}' to ({})",
            region_id.trim(),
            coordinate.format_coordinates()
        );

        let body = self
            .transport
            .fetch_current(coordinate)
            .await
            .map_err(|e| {
                error!(
                    "Weather request failed for {} ({}): {:#}",
                    region_id.trim(),
                    coordinate.format_coordinates(),
                    e
                );
                ResolveError::upstream(format!("{e:#}"))
            })?;

        weather::parse_current(&body)
    }

    /// Coordinates for a region identifier, without contacting the provider.
    ///
    /// A region code match wins over coordinate parsing. Parsed coordinates
    /// must be finite and within the latitude/longitude ranges.
    pub fn resolve_coordinate(&self, region_id: &str) -> Result<Coordinate, ResolveError> {
        let region_id = region_id.trim();
        if region_id.is_empty() {
            return Err(ResolveError::invalid_input("region identifier is required"));
        }

        if let Some(coordinate) = self.regions.lookup(region_id) {
            return Ok(coordinate);
        }

        let coordinate = CoordinateParser::parse(region_id).ok_or_else(|| {
            ResolveError::invalid_input(format!(
                "unknown region or invalid coordinates: '{region_id}'"
            ))
        })?;

        if !coordinate.is_valid() {
            return Err(ResolveError::invalid_input(format!(
                "coordinates out of range: {region_id}"
            )));
        }

        Ok(coordinate)
    }
}
