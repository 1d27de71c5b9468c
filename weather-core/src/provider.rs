use crate::{Config, WeatherError, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a location name. Every call is a fresh round trip.
    async fn current_weather(&self, location: &str) -> Result<WeatherReading, WeatherError>;
}

/// Construct the weather provider described by the loaded config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(
        OpenWeatherProvider::new(config.credentials.openweather_api_key.clone())
            .with_base_url(&config.settings.weather_base_url),
    )
}
