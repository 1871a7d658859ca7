//! Free-form coordinate parsing
//!
//! Accepts inputs such as `52.43,30.98`, `52.43 30.98`, `52.43:30.98` or
//! `52.43;30.98`. Range checks are left to the caller.

use crate::models::Coordinate;

/// Separators in the order they are tried
const SEPARATORS: [char; 4] = [',', ' ', ':', ';'];

/// Coordinate parsing utilities
pub struct CoordinateParser;

impl CoordinateParser {
    /// Parse `text` into a coordinate, or `None` when it does not look like one.
    ///
    /// Only the first separator present in `text` is used. If splitting on it
    /// yields fewer than two non-empty fragments, or the first two fragments
    /// are not numbers, there is no match; later separators are not tried.
    /// Fragments after the second are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Option<Coordinate> {
        let separator = SEPARATORS.into_iter().find(|sep| text.contains(*sep))?;

        let mut fragments = text
            .split(separator)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty());

        let latitude = fragments.next()?.parse::<f64>().ok()?;
        let longitude = fragments.next()?.parse::<f64>().ok()?;

        Some(Coordinate::new(latitude, longitude))
    }
}
