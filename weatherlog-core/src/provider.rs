use crate::{Config, RawWeather, config::CITY, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of raw current-weather and forecast bodies for the recorded city.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self) -> anyhow::Result<RawWeather>;
}

/// Construct the OpenWeather fetcher for the compiled-in city from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherFetcher>> {
    let api_key = config.resolve_api_key()?;
    Ok(Box::new(OpenWeatherProvider::new(api_key, CITY)))
}
