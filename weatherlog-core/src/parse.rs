//! Explicit parse step between raw provider JSON and the rows we store.
//!
//! Required keys missing from the provider response surface as a
//! [`ParseError`] before anything touches the database.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Format shared by fetch timestamps and sunrise/sunset strings.
/// Zero-padded so that lexicographic order matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text stored for an alert entry that carries no description.
pub const ALERT_PLACEHOLDER: &str = "Alert without description";

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing required field `{0}` in provider response")]
    MissingField(&'static str),

    #[error("malformed {what} response: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("field `{field}` must be {expected}")]
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("epoch timestamp {0} is out of range")]
    Timestamp(f64),
}

/// Current conditions, ready to be written as a `weather` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub description: String,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub cloudiness: Option<f64>,
    pub sunrise: String,
    pub sunset: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: String,
}

impl CurrentConditions {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let parsed = OwCurrentResponse::deserialize(value).map_err(|source| {
            ParseError::Malformed {
                what: "current weather",
                source,
            }
        })?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or(ParseError::MissingField("weather[0].description"))?;

        Ok(Self {
            temperature_c: kelvin_to_celsius(parsed.main.temp),
            description,
            pressure: parsed.main.pressure,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            wind_direction: parsed.wind.deg,
            cloudiness: parsed.clouds.and_then(|c| c.all),
            sunrise: local_time_string(parsed.sys.sunrise)?,
            sunset: local_time_string(parsed.sys.sunset)?,
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
            city: parsed.name,
        })
    }
}

/// The whole forecast response, kept opaque apart from its alerts.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBlob(Value);

impl ForecastBlob {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Serialized form written to the `forecasts` table.
    pub fn text(&self) -> String {
        self.0.to_string()
    }

    /// Alert descriptions, one per entry of the optional `alerts` array.
    /// An absent key and an empty array both give no alerts. A non-string
    /// description is kept as its JSON text.
    pub fn alerts(&self) -> Result<Vec<String>, ParseError> {
        let Some(alerts) = self.0.get("alerts") else {
            return Ok(Vec::new());
        };

        let entries = alerts.as_array().ok_or(ParseError::UnexpectedType {
            field: "alerts",
            expected: "an array",
        })?;

        Ok(entries
            .iter()
            .map(|alert| {
                match alert.get("description") {
                    None | Some(Value::Null) => ALERT_PLACEHOLDER.to_owned(),
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                }
            })
            .collect())
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Epoch seconds rendered in the machine's local time zone. Fractional
/// seconds are dropped.
pub fn local_time_string(epoch: f64) -> Result<String, ParseError> {
    if !epoch.is_finite() {
        return Err(ParseError::Timestamp(epoch));
    }
    let utc = DateTime::from_timestamp(epoch.floor() as i64, 0)
        .ok_or(ParseError::Timestamp(epoch))?;
    Ok(format_timestamp(utc.with_timezone(&Local).naive_local()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: f64,
    sunset: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    wind: OwWind,
    sys: OwSys,
    coord: OwCoord,
    weather: Vec<OwWeather>,
    clouds: Option<OwClouds>,
}
