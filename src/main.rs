use anyhow::Result;
use belweather::{BelWeatherConfig, WeatherResolver, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BelWeatherConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!("Starting BelWeather {}", belweather::VERSION);
    let resolver = WeatherResolver::from_config(&config.weather)?;
    tracing::info!("Serving {} regions", resolver.regions().len());

    web::run(&config.server, resolver).await?;
    Ok(())
}
