// Monitoring readings document - the wire/file shape both sources share
use crate::domain::monitoring::{DailySnapshot, MonitoringIndex, Station};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

/// The monitoring dataset as the external data source serializes it:
/// the undated current readings plus per-date historical readings.
///
/// ```json
/// {
///   "current": [
///     { "point_id": 1, "location": [51.55, -0.03],
///       "data": { "10:00": { "pH": 7.1, "Turbidity": 2.0, ... } } }
///   ],
///   "dates": { "2025-03-21": [ ... ] }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct MonitoringDocument {
    #[serde(default)]
    pub current: Vec<Station>,
    #[serde(default)]
    pub dates: HashMap<String, Vec<Station>>,
}

impl MonitoringDocument {
    /// Validates the document and builds the immutable index. Any
    /// ingestion violation (bad date key, duplicate id, empty series,
    /// non-finite value) fails the whole load; there is no partial
    /// index.
    pub fn into_index(self) -> anyhow::Result<MonitoringIndex> {
        let current =
            DailySnapshot::from_stations(self.current).context("invalid current snapshot")?;

        let mut dated = HashMap::new();
        for (key, stations) in self.dates {
            let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                .with_context(|| format!("'{key}' is not a YYYY-MM-DD snapshot date"))?;
            let snapshot = DailySnapshot::from_stations(stations)
                .with_context(|| format!("invalid snapshot for {date}"))?;
            dated.insert(date, snapshot);
        }

        Ok(MonitoringIndex::new(current, dated))
    }
}
