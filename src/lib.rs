//! `BelWeather` - current weather for the districts of the Gomel oblast
//!
//! This library resolves a region code or a free-form coordinate string to
//! normalized current conditions from the Weatherbit API, and exposes the
//! result through a small JSON web layer.

pub mod api;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod logging;
pub mod models;
pub mod regions;
pub mod resolver;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::{WeatherTransport, WeatherbitClient};
pub use config::BelWeatherConfig;
pub use coordinates::CoordinateParser;
pub use error::{BelWeatherError, ResolveError};
pub use models::{Coordinate, Region, WeatherResult};
pub use regions::RegionDirectory;
pub use resolver::WeatherResolver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T, E = BelWeatherError> = std::result::Result<T, E>;
