//! Weatherbit response normalization
//!
//! The provider payload is only trusted as far as its outer shape: a `data`
//! array whose first element is an object. Individual fields degrade to
//! defaults instead of failing the request.

use crate::error::ResolveError;
use crate::models::WeatherResult;
use crate::models::weather::{MISSING_DESCRIPTION, UNKNOWN_CITY};
use serde_json::{Map, Value};
use tracing::{error, warn};

/// Round half away from zero, saturating at the `i32` bounds
#[must_use]
pub fn round_temperature(celsius: f64) -> i32 {
    celsius.round() as i32
}

/// Parse a raw current-conditions body into a [`WeatherResult`]
pub fn parse_current(body: &str) -> Result<WeatherResult, ResolveError> {
    let payload: Value = serde_json::from_str(body).map_err(|e| {
        error!("Invalid JSON from weather provider: {}", e);
        ResolveError::upstream(format!("invalid response body: {e}"))
    })?;

    let item = first_observation(&payload).ok_or_else(|| {
        error!("Unexpected weather provider payload: {}", payload);
        ResolveError::upstream("missing or malformed data field")
    })?;

    Ok(normalize(item))
}

/// The first entry of `data`, if the payload has the expected shape
fn first_observation(payload: &Value) -> Option<&Map<String, Value>> {
    payload
        .as_object()?
        .get("data")?
        .as_array()?
        .first()?
        .as_object()
}

fn normalize(item: &Map<String, Value>) -> WeatherResult {
    let weather = item.get("weather").and_then(Value::as_object);

    let description = weather
        .and_then(|w| non_empty_str(w.get("description")))
        .unwrap_or(MISSING_DESCRIPTION);
    let icon_code = weather
        .and_then(|w| non_empty_str(w.get("icon")))
        .unwrap_or_default();
    let city = non_empty_str(item.get("city_name")).unwrap_or(UNKNOWN_CITY);

    WeatherResult {
        temperature: read_temperature(item.get("temp")),
        description: description.to_string(),
        icon_code: icon_code.to_string(),
        city: city.to_string(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Temperature from a number or a numeric string; anything else is 0
fn read_temperature(raw: Option<&Value>) -> i32 {
    let celsius = match raw {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match celsius.filter(|c| c.is_finite()) {
        Some(celsius) => round_temperature(celsius),
        None => {
            warn!("Unusable temperature in weather payload: {:?}", raw);
            0
        }
    }
}
