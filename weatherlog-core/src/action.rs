use anyhow::{Context, Result};

use crate::{model::PersistSummary, provider::WeatherFetcher, store::WeatherStore};

pub const SAVED_MESSAGE: &str = "Weather data saved successfully!";

/// Fetch current weather and forecast, then store them in one go.
/// A failed fetch saves nothing.
pub async fn fetch_and_save(
    fetcher: &dyn WeatherFetcher,
    store: &WeatherStore,
) -> Result<PersistSummary> {
    let raw = fetcher.fetch().await.context("Failed to fetch weather data")?;
    store.persist(&raw).context("Failed to save weather data")
}
