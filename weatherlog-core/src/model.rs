use serde_json::Value;

/// Raw bodies of one fetch: current conditions and the 5-day forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeather {
    pub current: Value,
    pub forecast: Value,
}

/// One stored row of the `weather` table. Numeric columns come back as
/// stored, fractional provider values included.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub id: i64,
    pub timestamp: String,
    pub temperature: f64,
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

/// One stored row of the `forecasts` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub id: i64,
    pub timestamp: String,
    pub forecast: String,
}

/// One stored row of the `alerts` table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub id: i64,
    pub timestamp: String,
    pub alert: String,
}

/// Full listing of the `weather` table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherTable {
    pub columns: Vec<String>,
    pub rows: Vec<WeatherSnapshot>,
}

impl WeatherTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a single persist wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistSummary {
    pub timestamp: String,
    pub weather_id: i64,
    pub forecast_id: i64,
    pub alerts: usize,
}
