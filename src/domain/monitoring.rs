// Monitoring domain models - stations, snapshots, and the index
use super::geometry::Coordinate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// One timestamped set of water-quality measurements. The schema is
/// fixed: every station carries the same five metrics, validated
/// finite at ingestion so missing-metric bugs surface at load time.
///
/// Serde names follow the upstream data source's field naming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "pH")]
    pub ph: f64,
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,
    #[serde(rename = "DO2")]
    pub dissolved_oxygen: f64,
    #[serde(rename = "Conductivity")]
    pub conductivity: f64,
    #[serde(rename = "Ecoli")]
    pub e_coli: f64,
}

impl Reading {
    pub fn is_finite(&self) -> bool {
        [
            self.ph,
            self.turbidity,
            self.dissolved_oxygen,
            self.conductivity,
            self.e_coli,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Readings keyed by ISO-8601-comparable timestamp strings. The map
/// ordering is the chronological ordering, so the last entry is the
/// station's latest reading regardless of insertion order.
pub type TimeSeries = BTreeMap<String, Reading>;

/// One fixed-location monitoring station and its series of readings.
/// Serde names match the upstream JSON document (`point_id`, `data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "point_id")]
    pub id: u32,
    pub location: Coordinate,
    #[serde(rename = "data")]
    pub series: TimeSeries,
}

impl Station {
    /// The reading at the maximum timestamp of this station's own
    /// series. `None` only for an empty series, which ingestion
    /// rejects.
    pub fn latest(&self) -> Option<(&str, &Reading)> {
        self.series
            .iter()
            .next_back()
            .map(|(time, reading)| (time.as_str(), reading))
    }

    pub fn timestamps(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("duplicate station id {0} in snapshot")]
    DuplicateStation(u32),
    #[error("station id 0 is not a valid monitoring point id")]
    ZeroStationId,
    #[error("station {0} has no readings")]
    EmptySeries(u32),
    #[error("non-finite measurement for station {station} at '{timestamp}'")]
    NonFiniteValue { station: u32, timestamp: String },
}

/// The set of stations valid for one calendar date (or "current").
/// Station ids are unique by construction; iteration is in ascending
/// id order, so the lowest-id station is the snapshot's first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySnapshot {
    stations: BTreeMap<u32, Station>,
}

impl DailySnapshot {
    /// Builds a snapshot from loader output, enforcing the ingestion
    /// invariants: positive unique ids, non-empty series, finite
    /// measurement values.
    pub fn from_stations(stations: Vec<Station>) -> Result<Self, IngestError> {
        let mut snapshot = Self::default();
        for station in stations {
            if station.id == 0 {
                return Err(IngestError::ZeroStationId);
            }
            if station.series.is_empty() {
                return Err(IngestError::EmptySeries(station.id));
            }
            if let Some((timestamp, _)) = station
                .series
                .iter()
                .find(|(_, reading)| !reading.is_finite())
            {
                return Err(IngestError::NonFiniteValue {
                    station: station.id,
                    timestamp: timestamp.clone(),
                });
            }
            let id = station.id;
            if snapshot.stations.insert(id, station).is_some() {
                return Err(IngestError::DuplicateStation(id));
            }
        }
        Ok(snapshot)
    }

    pub fn get(&self, id: u32) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The canonical time axis: the timestamps of the first (lowest-id)
    /// station, empty for an empty snapshot. The axis is a convenience
    /// default for charting, not a guarantee that every station shares
    /// it.
    pub fn time_axis(&self) -> Vec<String> {
        self.stations
            .values()
            .next()
            .map(Station::timestamps)
            .unwrap_or_default()
    }
}

/// Which snapshot a query addresses: the undated "current" data or one
/// calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSelector {
    Current,
    Date(NaiveDate),
}

impl DateSelector {
    /// Parses a date path segment. Absence, the `current` sentinel and
    /// the literal string `null` (what the frontend sends for "no date
    /// chosen") all mean the current snapshot; anything else must be a
    /// real `YYYY-MM-DD` calendar date.
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        match raw {
            None | Some("null") | Some("current") => Ok(Self::Current),
            Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|_| QueryError::InvalidDate(value.to_string())),
        }
    }
}

/// Typed failures of the query surface. The presentation layer maps
/// each kind to a transport status; nothing here is thrown across the
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("'{0}' is not a valid calendar date")]
    InvalidDate(String),
    #[error("no monitoring data recorded for {0}")]
    DateNotFound(NaiveDate),
    #[error("monitoring point {0} not found")]
    StationNotFound(u32),
    #[error("no reading recorded at '{0}'")]
    TimestampNotFound(String),
}

/// The whole dataset: the current snapshot plus any dated ones.
/// Built once at startup and replaced wholesale on reload, never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitoringIndex {
    current: DailySnapshot,
    dated: HashMap<NaiveDate, DailySnapshot>,
}

impl MonitoringIndex {
    pub fn new(current: DailySnapshot, dated: HashMap<NaiveDate, DailySnapshot>) -> Self {
        Self { current, dated }
    }

    /// Pure keyed snapshot lookup. A syntactically valid date with no
    /// data is `DateNotFound`; station- and timestamp-level misses are
    /// the query engine's concern.
    pub fn snapshot(&self, selector: &DateSelector) -> Result<&DailySnapshot, QueryError> {
        match selector {
            DateSelector::Current => Ok(&self.current),
            DateSelector::Date(date) => self
                .dated
                .get(date)
                .ok_or(QueryError::DateNotFound(*date)),
        }
    }

    /// Stations in the current snapshot, logged at load and reload.
    pub fn station_count(&self) -> usize {
        self.current.len()
    }

    pub fn dated_snapshot_count(&self) -> usize {
        self.dated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ph: f64) -> Reading {
        Reading {
            ph,
            turbidity: 2.0,
            dissolved_oxygen: 8.5,
            conductivity: 450.0,
            e_coli: 120.0,
        }
    }

    fn station(id: u32, timestamps: &[&str]) -> Station {
        let series = timestamps
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), reading(7.0 + i as f64 * 0.1)))
            .collect();
        Station {
            id,
            location: Coordinate::new(51.55, -0.03),
            series,
        }
    }

    #[test]
    fn test_date_selector_current_absent_and_null_are_equivalent() {
        assert_eq!(DateSelector::parse(None).unwrap(), DateSelector::Current);
        assert_eq!(
            DateSelector::parse(Some("null")).unwrap(),
            DateSelector::Current
        );
        assert_eq!(
            DateSelector::parse(Some("current")).unwrap(),
            DateSelector::Current
        );
    }

    #[test]
    fn test_date_selector_rejects_impossible_calendar_date() {
        let err = DateSelector::parse(Some("2025-02-30")).unwrap_err();
        assert_eq!(err, QueryError::InvalidDate("2025-02-30".to_string()));
    }

    #[test]
    fn test_date_selector_rejects_garbage() {
        assert!(matches!(
            DateSelector::parse(Some("yesterday")),
            Err(QueryError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_date_selector_accepts_real_date() {
        let selector = DateSelector::parse(Some("2025-03-21")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        assert_eq!(selector, DateSelector::Date(expected));
    }

    #[test]
    fn test_valid_date_without_data_is_date_not_found() {
        let index = MonitoringIndex::default();
        let date = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();

        let err = index.snapshot(&DateSelector::Date(date)).unwrap_err();
        assert_eq!(err, QueryError::DateNotFound(date));
    }

    #[test]
    fn test_latest_follows_timestamp_order_not_insertion_order() {
        let mut series = TimeSeries::new();
        series.insert("11:00".to_string(), reading(7.3));
        series.insert("09:00".to_string(), reading(6.9));
        series.insert("10:00".to_string(), reading(7.1));
        let station = Station {
            id: 1,
            location: Coordinate::new(51.55, -0.03),
            series,
        };

        let (time, latest) = station.latest().unwrap();
        assert_eq!(time, "11:00");
        assert_eq!(latest.ph, 7.3);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_station_ids() {
        let err = DailySnapshot::from_stations(vec![
            station(1, &["10:00"]),
            station(1, &["10:00"]),
        ])
        .unwrap_err();
        assert!(matches!(err, IngestError::DuplicateStation(1)));
    }

    #[test]
    fn test_snapshot_rejects_zero_station_id() {
        let err = DailySnapshot::from_stations(vec![station(0, &["10:00"])]).unwrap_err();
        assert!(matches!(err, IngestError::ZeroStationId));
    }

    #[test]
    fn test_snapshot_rejects_empty_series() {
        let err = DailySnapshot::from_stations(vec![station(7, &[])]).unwrap_err();
        assert!(matches!(err, IngestError::EmptySeries(7)));
    }

    #[test]
    fn test_snapshot_rejects_non_finite_measurement() {
        let mut bad = station(3, &["10:00"]);
        bad.series.get_mut("10:00").unwrap().turbidity = f64::NAN;

        let err = DailySnapshot::from_stations(vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            IngestError::NonFiniteValue { station: 3, .. }
        ));
    }

    #[test]
    fn test_time_axis_comes_from_lowest_id_station() {
        let snapshot = DailySnapshot::from_stations(vec![
            station(2, &["08:00", "09:00"]),
            station(1, &["10:00", "11:00"]),
        ])
        .unwrap();

        assert_eq!(snapshot.time_axis(), vec!["10:00", "11:00"]);
    }

    #[test]
    fn test_time_axis_of_empty_snapshot_is_empty() {
        assert!(DailySnapshot::default().time_axis().is_empty());
    }

    #[test]
    fn test_reading_serde_uses_source_field_names() {
        let json = serde_json::to_value(reading(7.1)).unwrap();
        assert_eq!(json["pH"], 7.1);
        assert_eq!(json["Turbidity"], 2.0);
        assert_eq!(json["DO2"], 8.5);
        assert_eq!(json["Conductivity"], 450.0);
        assert_eq!(json["Ecoli"], 120.0);
    }
}
