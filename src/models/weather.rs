//! Normalized current weather returned to callers

use serde::{Deserialize, Serialize};

/// Placeholder when the upstream has no description
pub const MISSING_DESCRIPTION: &str = "-";
/// Placeholder when the upstream has no city name
pub const UNKNOWN_CITY: &str = "unknown";

/// Current conditions for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResult {
    /// Temperature in Celsius, rounded half away from zero
    pub temperature: i32,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Provider icon code, empty when unknown
    pub icon_code: String,
    /// City the provider attributes the observation to
    pub city: String,
}
