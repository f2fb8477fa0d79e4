//! SQLite store for weather snapshots, forecast blobs and alerts.
//!
//! Every operation opens its own connection; nothing is held between calls.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::{AlertRecord, ForecastRecord, PersistSummary, RawWeather, WeatherSnapshot, WeatherTable},
    parse::{CurrentConditions, ForecastBlob, format_timestamp},
};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS weather (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT,
        temperature REAL,
        description TEXT,
        pressure INTEGER,
        humidity INTEGER,
        wind_speed REAL,
        wind_direction INTEGER,
        cloudiness INTEGER,
        sunrise TEXT,
        sunset TEXT,
        latitude REAL,
        longitude REAL,
        city TEXT
    );

    CREATE TABLE IF NOT EXISTS forecasts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT,
        forecast TEXT
    );

    CREATE TABLE IF NOT EXISTS alerts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT,
        alert TEXT
    );
"#;

const WEATHER_COLUMNS: &str = "id, timestamp, temperature, description, pressure, humidity, \
     wind_speed, wind_direction, cloudiness, sunrise, sunset, latitude, longitude, city";

#[derive(Debug, Clone)]
pub struct WeatherStore {
    path: PathBuf,
}

impl WeatherStore {
    /// Point at a database file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.init()?;
        Ok(store)
    }

    /// Create the three tables if they are absent. Safe to call repeatedly.
    pub fn init(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create weather database schema")?;

        tracing::debug!(path = %self.path.display(), "weather schema ready");
        Ok(())
    }

    /// Persist one fetch, stamped with the current local time.
    pub fn persist(&self, raw: &RawWeather) -> Result<PersistSummary> {
        self.persist_at(raw, Local::now().naive_local())
    }

    /// Persist one fetch with an explicit timestamp.
    ///
    /// Both inputs are parsed before anything is written, and all rows go in
    /// through a single transaction: either the snapshot, the forecast and
    /// every alert land, or nothing does.
    pub fn persist_at(&self, raw: &RawWeather, at: NaiveDateTime) -> Result<PersistSummary> {
        let current = CurrentConditions::from_value(&raw.current)
            .context("Failed to read current weather response")?;
        let forecast = ForecastBlob::from_value(raw.forecast.clone());
        let alerts = forecast
            .alerts()
            .context("Failed to read forecast alerts")?;

        let timestamp = format_timestamp(at);

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO weather
            (timestamp, temperature, description, pressure, humidity, wind_speed, wind_direction,
             cloudiness, sunrise, sunset, latitude, longitude, city)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                timestamp,
                current.temperature_c,
                current.description,
                current.pressure,
                current.humidity,
                current.wind_speed,
                current.wind_direction,
                current.cloudiness,
                current.sunrise,
                current.sunset,
                current.latitude,
                current.longitude,
                current.city,
            ],
        )
        .context("Failed to insert weather snapshot")?;
        let weather_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO forecasts (timestamp, forecast) VALUES (?1, ?2)",
            params![timestamp, forecast.text()],
        )
        .context("Failed to insert forecast")?;
        let forecast_id = tx.last_insert_rowid();

        for alert in &alerts {
            tx.execute(
                "INSERT INTO alerts (timestamp, alert) VALUES (?1, ?2)",
                params![timestamp, alert],
            )
            .context("Failed to insert alert")?;
        }

        tx.commit().context("Failed to commit weather data")?;

        tracing::info!(
            %timestamp,
            city = %current.city,
            alerts = alerts.len(),
            "saved weather snapshot"
        );

        Ok(PersistSummary {
            timestamp,
            weather_id,
            forecast_id,
            alerts: alerts.len(),
        })
    }

    /// Every snapshot, newest first, together with the table's column names.
    pub fn list_weather(&self) -> Result<WeatherTable> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare("PRAGMA table_info(weather)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read weather columns")?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {WEATHER_COLUMNS} FROM weather ORDER BY timestamp DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map([], row_to_snapshot)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read weather snapshots")?;

        Ok(WeatherTable { columns, rows })
    }

    pub fn count_weather(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// The snapshot at `offset` when ordered newest first.
    pub fn weather_page(&self, offset: u64) -> Result<Option<WeatherSnapshot>> {
        let offset = i64::try_from(offset).context("Page offset too large")?;
        let conn = self.connect()?;

        conn.query_row(
            &format!(
                "SELECT {WEATHER_COLUMNS} FROM weather \
                 ORDER BY timestamp DESC, id DESC LIMIT 1 OFFSET ?1"
            ),
            params![offset],
            row_to_snapshot,
        )
        .optional()
        .with_context(|| format!("Failed to read weather snapshot at offset {offset}"))
    }

    pub fn list_forecasts(&self) -> Result<Vec<ForecastRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, forecast FROM forecasts ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ForecastRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                forecast: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read forecasts: {}", e))
    }

    pub fn list_alerts(&self) -> Result<Vec<AlertRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, timestamp, alert FROM alerts ORDER BY timestamp DESC, id DESC")?;

        let rows = stmt.query_map([], |row| {
            Ok(AlertRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                alert: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read alerts: {}", e))
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path)
            .with_context(|| format!("Failed to open database: {}", self.path.display()))
    }
}

fn row_to_snapshot(row: &Row<'_>) -> rusqlite::Result<WeatherSnapshot> {
    Ok(WeatherSnapshot {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        temperature: row.get(2)?,
        description: row.get(3)?,
        pressure: row.get(4)?,
        humidity: row.get(5)?,
        wind_speed: row.get(6)?,
        wind_direction: row.get(7)?,
        cloudiness: row.get(8)?,
        sunrise: row.get(9)?,
        sunset: row.get(10)?,
        latitude: row.get(11)?,
        longitude: row.get(12)?,
        city: row.get(13)?,
    })
}
