//! Location model for geographic coordinates and region entries

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate without range checks
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite and inside [-90, 90] x [-180, 180]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A district with a short lookup code and known coordinates
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Region {
    /// Short lookup key, e.g. `gom`
    pub code: &'static str,
    /// Human-readable district name
    pub name: &'static str,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Region {
    #[must_use]
    pub const fn new(code: &'static str, name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            code,
            name,
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_range() {
        assert!(Coordinate::new(52.43, 30.98).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.1).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_format_coordinates() {
        let coordinate = Coordinate::new(52.43, 30.98);
        assert_eq!(coordinate.format_coordinates(), "52.4300, 30.9800");
    }

    #[test]
    fn test_region_serializes_flat() {
        let region = Region::new("gom", "Gomel", 52.43, 30.98);
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "gom",
                "name": "Gomel",
                "latitude": 52.43,
                "longitude": 30.98
            })
        );
    }
}
