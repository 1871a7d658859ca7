//! Data models for the BelWeather application
//!
//! - Location: geographic coordinates and the region directory entries
//! - Weather: the normalized current weather handed to callers

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinate, Region};
pub use weather::WeatherResult;
