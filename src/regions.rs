//! Static directory of the Gomel oblast districts
//!
//! Region codes are the short keys the frontend links to (`/api/weather/gom`).
//! The directory is built once at startup and never mutated.

use std::collections::HashMap;

use crate::models::{Coordinate, Region};
use anyhow::{Result, bail};

/// District centres of the Gomel oblast
pub const GOMEL_OBLAST: [Region; 21] = [
    Region::new("br", "Bragin", 51.8, 30.3),
    Region::new("buda", "Buda-Koshelyovo", 52.72, 30.57),
    Region::new("vetka", "Vetka", 52.56, 31.18),
    Region::new("gom", "Gomel", 52.43, 30.98),
    Region::new("dobrush", "Dobrush", 52.41, 31.32),
    Region::new("elsk", "Yelsk", 51.75, 29.15),
    Region::new("zhit", "Zhitkovichi", 52.22, 27.85),
    Region::new("zhlobin", "Zhlobin", 52.89, 30.03),
    Region::new("kalin", "Kalinkovichi", 52.63, 29.33),
    Region::new("korm", "Korma", 53.11, 30.63),
    Region::new("lel", "Lelchitsy", 51.63, 28.1),
    Region::new("loev", "Loyew", 51.95, 30.8),
    Region::new("moz", "Mozyr", 52.05, 29.27),
    Region::new("narovl", "Narovlya", 51.8, 29.5),
    Region::new("oktyabr", "Oktyabrsky", 52.65, 28.9),
    Region::new("petr", "Petrikov", 52.13, 28.9),
    Region::new("rech", "Rechitsa", 52.36, 30.4),
    Region::new("rogach", "Rogachev", 53.09, 30.05),
    Region::new("svetl", "Svetlogorsk", 52.63, 29.73),
    Region::new("hoyniki", "Khoiniki", 51.9, 29.5),
    Region::new("chechersk", "Chechersk", 52.92, 30.92),
];

/// Immutable lookup from region code to coordinates
#[derive(Debug, Clone)]
pub struct RegionDirectory {
    regions: HashMap<&'static str, Region>,
}

impl RegionDirectory {
    /// Build a directory from caller-supplied regions.
    ///
    /// Rejects duplicate codes, empty codes and coordinates that are not
    /// finite or fall outside the valid latitude/longitude ranges.
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Result<Self> {
        let mut map = HashMap::new();
        for region in regions {
            if region.code.trim().is_empty() {
                bail!("Region code cannot be empty (name: {})", region.name);
            }
            if !region.coordinate.is_valid() {
                bail!(
                    "Region '{}' has invalid coordinates: {}",
                    region.code,
                    region.coordinate.format_coordinates()
                );
            }
            if map.insert(region.code, region.clone()).is_some() {
                bail!("Duplicate region code: {}", region.code);
            }
        }
        Ok(Self { regions: map })
    }

    /// Coordinates for a region code; the code is matched exactly
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<Coordinate> {
        self.regions.get(code).map(|region| region.coordinate)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.get(code)
    }

    /// All regions sorted by code
    #[must_use]
    pub fn sorted(&self) -> Vec<&Region> {
        let mut regions: Vec<&Region> = self.regions.values().collect();
        regions.sort_by_key(|region| region.code);
        regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionDirectory {
    /// The Gomel oblast districts
    fn default() -> Self {
        Self {
            regions: GOMEL_OBLAST
                .iter()
                .map(|region| (region.code, region.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory_is_valid() {
        // the static table must pass the same checks as user data
        let validated = RegionDirectory::new(GOMEL_OBLAST).unwrap();
        assert_eq!(validated.len(), GOMEL_OBLAST.len());
        assert_eq!(RegionDirectory::default().len(), 21);
    }

    #[test]
    fn test_lookup_known_codes() {
        let directory = RegionDirectory::default();
        assert_eq!(directory.lookup("gom"), Some(Coordinate::new(52.43, 30.98)));
        assert_eq!(directory.lookup("br"), Some(Coordinate::new(51.8, 30.3)));
        assert_eq!(directory.get("moz").map(|r| r.name), Some("Mozyr"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let directory = RegionDirectory::default();
        assert_eq!(directory.lookup("GOM"), None);
        assert_eq!(directory.lookup(" gom"), None);
        assert_eq!(directory.lookup("minsk"), None);
        assert_eq!(directory.lookup(""), None);
    }

    #[test]
    fn test_sorted_by_code() {
        let directory = RegionDirectory::default();
        let codes: Vec<&str> = directory.sorted().iter().map(|r| r.code).collect();
        assert_eq!(codes.first(), Some(&"br"));
        assert_eq!(codes.last(), Some(&"zhlobin"));
        assert!(codes.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = RegionDirectory::new([
            Region::new("gom", "Gomel", 52.43, 30.98),
            Region::new("gom", "Gomel again", 52.0, 30.0),
        ]);
        assert!(result.unwrap_err().to_string().contains("Duplicate region code"));
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let result = RegionDirectory::new([Region::new("x", "Nowhere", 120.0, 30.0)]);
        assert!(result.unwrap_err().to_string().contains("invalid coordinates"));

        let result = RegionDirectory::new([Region::new("y", "Nowhere", f64::NAN, 30.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_code() {
        let result = RegionDirectory::new([Region::new("  ", "Blank", 52.0, 30.0)]);
        assert!(result.is_err());
    }
}
