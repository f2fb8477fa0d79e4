//! Text renderings of the stored snapshots.

use anyhow::{Result, anyhow};
use std::fmt::Display;

use crate::{
    cursor::{Navigation, RecordCursor},
    model::{WeatherSnapshot, WeatherTable},
    store::WeatherStore,
};

pub const EMPTY_MESSAGE: &str = "No weather data in the database.";

const NULL_CELL: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    Table,
    SingleRecord,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::SingleRecord => "record",
        }
    }

    pub const fn all() -> &'static [ViewMode] {
        &[ViewMode::Table, ViewMode::SingleRecord]
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ViewMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "table" => Ok(ViewMode::Table),
            "record" | "single" => Ok(ViewMode::SingleRecord),
            _ => Err(anyhow!(
                "Unknown view mode '{value}'. Supported modes: table, record."
            )),
        }
    }
}

/// Result of one render of the single-record view.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub cursor: RecordCursor,
    pub total: u64,
    /// `None` when the table is empty.
    pub rendered: Option<String>,
}

/// All snapshots as an aligned text table, or the empty-state message.
pub fn table_view(store: &WeatherStore) -> Result<String> {
    let table = store.list_weather()?;
    Ok(render_table(&table))
}

/// Apply `nav` to `cursor` and render the record it lands on.
///
/// The returned cursor is the session state for the next call.
pub fn single_record_view(
    store: &WeatherStore,
    cursor: RecordCursor,
    nav: Option<Navigation>,
) -> Result<RecordView> {
    let total = store.count_weather()?;
    let cursor = match nav {
        Some(nav) => cursor.apply(nav, total),
        None => cursor.clamp(total),
    };

    if total == 0 {
        return Ok(RecordView {
            cursor,
            total,
            rendered: None,
        });
    }

    let rendered = store
        .weather_page(cursor.index())?
        .map(|record| render_record(&record, cursor.index(), total));

    Ok(RecordView {
        cursor,
        total,
        rendered,
    })
}

pub fn render_table(table: &WeatherTable) -> String {
    if table.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let rows: Vec<Vec<String>> = table.rows.iter().map(snapshot_cells).collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(cell.chars().count()),
                None => widths.push(cell.chars().count()),
            }
        }
    }

    let mut out = String::from("All weather records:\n");
    out.push_str(&render_line(table.columns.as_slice(), &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &rows {
        out.push('\n');
        out.push_str(&render_line(row.as_slice(), &widths));
    }

    out
}

pub fn render_record(record: &WeatherSnapshot, index: u64, total: u64) -> String {
    let lines = [
        format!("Record: {}/{}", index + 1, total),
        format!("Date and time: {}", record.timestamp),
        format!("Temperature: {:.2} °C", record.temperature),
        format!("Description: {}", record.description),
        format!("Pressure: {}", with_unit(record.pressure, " hPa")),
        format!("Humidity: {}", with_unit(record.humidity, " %")),
        format!("Wind speed: {}", with_unit(record.wind_speed, " m/s")),
        format!("Wind direction: {}", with_unit(record.wind_direction, "°")),
        format!("Cloudiness: {}", with_unit(record.cloudiness, " %")),
        format!("Sunrise: {}", record.sunrise),
        format!("Sunset: {}", record.sunset),
        format!("Latitude: {}", with_unit(record.latitude, "")),
        format!("Longitude: {}", with_unit(record.longitude, "")),
        format!("City: {}", record.city),
    ];

    lines.join("\n")
}

fn render_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn snapshot_cells(s: &WeatherSnapshot) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.timestamp.clone(),
        format!("{:.2}", s.temperature),
        s.description.clone(),
        cell(s.pressure),
        cell(s.humidity),
        cell(s.wind_speed),
        cell(s.wind_direction),
        cell(s.cloudiness),
        s.sunrise.clone(),
        s.sunset.clone(),
        cell(s.latitude),
        cell(s.longitude),
        s.city.clone(),
    ]
}

fn cell<T: Display>(value: Option<T>) -> String {
    with_unit(value, "")
}

fn with_unit<T: Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => NULL_CELL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawWeather;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            id: 7,
            timestamp: "2024-11-14 12:00:00".into(),
            temperature: 300.0 - 273.15,
            description: "clear sky".into(),
            pressure: Some(1012.0),
            humidity: Some(55.0),
            wind_speed: Some(3.2),
            wind_direction: Some(180.0),
            cloudiness: None,
            sunrise: "2024-11-14 07:00:00".into(),
            sunset: "2024-11-14 16:00:00".into(),
            latitude: Some(52.4),
            longitude: Some(16.9),
            city: "Poznan".into(),
        }
    }

    fn store_with(count: u32) -> (TempDir, WeatherStore) {
        let dir = TempDir::new().unwrap();
        let store = WeatherStore::open(dir.path().join("weather.db")).unwrap();

        for i in 0..count {
            let raw = RawWeather {
                current: json!({
                    "main": {"temp": 280.0 + f64::from(i)},
                    "wind": {},
                    "sys": {"sunrise": 1_700_000_000, "sunset": 1_700_040_000},
                    "coord": {},
                    "name": "Poznan",
                    "weather": [{"description": format!("reading {i}")}]
                }),
                forecast: json!({}),
            };
            let at = NaiveDate::from_ymd_opt(2024, 11, 14)
                .unwrap()
                .and_hms_opt(10, i, 0)
                .unwrap();
            store.persist_at(&raw, at).unwrap();
        }

        (dir, store)
    }

    #[test]
    fn view_mode_parses_known_names() {
        for mode in ViewMode::all() {
            assert_eq!(ViewMode::try_from(mode.as_str()).unwrap(), *mode);
        }
        assert!(ViewMode::try_from("chart").is_err());
    }

    #[test]
    fn record_shows_labelled_fields() {
        let text = render_record(&snapshot(), 0, 3);

        assert!(text.starts_with("Record: 1/3\n"));
        assert!(text.contains("Temperature: 26.85 °C"));
        assert!(text.contains("Pressure: 1012 hPa"));
        assert!(text.contains("Wind direction: 180°"));
        assert!(text.contains("Cloudiness: n/a"));
        assert!(text.ends_with("City: Poznan"));
    }

    #[test]
    fn empty_table_renders_empty_message() {
        let table = WeatherTable {
            columns: vec!["id".into()],
            rows: vec![],
        };
        assert_eq!(render_table(&table), EMPTY_MESSAGE);
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let (_dir, store) = store_with(2);

        let text = table_view(&store).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("id"));
        assert!(lines[1].ends_with("city"));
        assert!(lines[3].contains("reading 1"));
        assert!(lines[4].contains("reading 0"));
    }

    #[test]
    fn empty_store_renders_nothing_in_record_mode() {
        let (_dir, store) = store_with(0);

        let view = single_record_view(&store, RecordCursor::new(), Some(Navigation::Next)).unwrap();

        assert_eq!(view.total, 0);
        assert_eq!(view.rendered, None);
        assert_eq!(view.cursor.index(), 0);
        assert_eq!(table_view(&store).unwrap(), EMPTY_MESSAGE);
    }

    #[test]
    fn cursor_round_trips_through_the_view() {
        let (_dir, store) = store_with(3);

        let view = single_record_view(&store, RecordCursor::new(), None).unwrap();
        assert!(view.rendered.as_deref().unwrap().contains("reading 2"));

        let view = single_record_view(&store, view.cursor, Some(Navigation::Next)).unwrap();
        assert_eq!(view.cursor.index(), 1);

        let view = single_record_view(&store, view.cursor, Some(Navigation::Next)).unwrap();
        let view = single_record_view(&store, view.cursor, Some(Navigation::Next)).unwrap();
        assert_eq!(view.cursor.index(), 2);
        let text = view.rendered.unwrap();
        assert!(text.starts_with("Record: 3/3"));
        assert!(text.contains("reading 0"));
    }
}
