use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::model::RawWeather;

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    city: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("city", &self.city)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, city: impl Into<String>) -> Self {
        Self::with_base_url(api_key, city, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: String,
        city: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            city: city.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self) -> Result<Value> {
        self.get_json("weather", "current weather").await
    }

    async fn fetch_forecast(&self) -> Result<Value> {
        self.get_json("forecast", "5-day forecast").await
    }

    async fn get_json(&self, endpoint: &str, label: &str) -> Result<Value> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);
        tracing::debug!(%url, city = %self.city, "requesting OpenWeather {label}");

        let res = self
            .http
            .get(&url)
            .query(&[("q", self.city.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({label})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {label} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {label} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {label} JSON"))
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherProvider {
    async fn fetch(&self) -> Result<RawWeather> {
        let current = self.fetch_current().await?;
        let forecast = self.fetch_forecast().await?;

        Ok(RawWeather { current, forecast })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_kept() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "ż".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn debug_hides_api_key() {
        let provider = OpenWeatherProvider::new("SECRET".into(), "Poznan");
        let debug = format!("{provider:?}");

        assert!(debug.contains("Poznan"));
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let provider =
            OpenWeatherProvider::with_base_url("K".into(), "Poznan", "http://localhost:1234/");
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
