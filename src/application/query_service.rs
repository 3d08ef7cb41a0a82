// Query service - the read API over the monitoring index
use crate::application::monitoring_source::MonitoringSource;
use crate::domain::geometry::Coordinate;
use crate::domain::monitoring::{
    DateSelector, MonitoringIndex, QueryError, Reading, Station, TimeSeries,
};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Full-snapshot payload: every station plus the canonical time axis.
#[derive(Debug, Serialize)]
pub struct SnapshotView {
    pub monitoring_data: Vec<StationView>,
    pub time_steps: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StationView {
    pub point_id: u32,
    pub location: Coordinate,
    pub data: TimeSeries,
    pub latest: Option<LatestView>,
}

#[derive(Debug, Serialize)]
pub struct LatestView {
    pub time: String,
    pub reading: Reading,
}

/// Per-station payload: the full series plus the snapshot's time axis,
/// which charting clients use as their default x-axis.
#[derive(Debug, Serialize)]
pub struct StationDetailView {
    pub point_id: u32,
    pub location: Coordinate,
    pub data: TimeSeries,
    pub latest: Option<LatestView>,
    pub time_steps: Vec<String>,
}

/// Exactly one reading of one station.
#[derive(Debug, Serialize)]
pub struct ReadingView {
    pub point_id: u32,
    pub location: Coordinate,
    pub time: String,
    pub data: Reading,
}

/// Holds the monitoring index and answers all read queries against it.
/// Queries clone an `Arc` of the current index and never block each
/// other; reload builds a full replacement before swapping it in, so
/// in-flight reads keep seeing a consistent dataset.
pub struct QueryService {
    index: RwLock<Arc<MonitoringIndex>>,
    source: Arc<dyn MonitoringSource>,
}

impl QueryService {
    pub async fn load(source: Arc<dyn MonitoringSource>) -> anyhow::Result<Self> {
        let index = source
            .load_index()
            .await
            .context("failed to load monitoring index")?;
        tracing::info!(
            stations = index.station_count(),
            dated_snapshots = index.dated_snapshot_count(),
            "monitoring index loaded"
        );
        Ok(Self {
            index: RwLock::new(Arc::new(index)),
            source,
        })
    }

    async fn index(&self) -> Arc<MonitoringIndex> {
        self.index.read().await.clone()
    }

    /// Rebuilds the index from the source and swaps it in atomically.
    /// Returns the station count of the new current snapshot. On
    /// failure the previous index stays in place untouched.
    pub async fn reload(&self) -> anyhow::Result<usize> {
        let index = self
            .source
            .load_index()
            .await
            .context("failed to reload monitoring index")?;
        let stations = index.station_count();
        *self.index.write().await = Arc::new(index);
        tracing::info!(stations, "monitoring index reloaded");
        Ok(stations)
    }

    pub async fn list_all(&self, selector: &DateSelector) -> Result<SnapshotView, QueryError> {
        let index = self.index().await;
        let snapshot = index.snapshot(selector)?;
        Ok(SnapshotView {
            monitoring_data: snapshot.stations().map(station_view).collect(),
            time_steps: snapshot.time_axis(),
        })
    }

    pub async fn get_station(
        &self,
        id: u32,
        selector: &DateSelector,
    ) -> Result<StationDetailView, QueryError> {
        let index = self.index().await;
        let snapshot = index.snapshot(selector)?;
        let station = snapshot.get(id).ok_or(QueryError::StationNotFound(id))?;
        Ok(StationDetailView {
            point_id: station.id,
            location: station.location,
            data: station.series.clone(),
            latest: latest_view(station),
            time_steps: snapshot.time_axis(),
        })
    }

    /// Exact-match lookup only. A timestamp the station never recorded
    /// is reported as missing, never approximated from a neighbor.
    pub async fn get_reading(
        &self,
        id: u32,
        timestamp: &str,
        selector: &DateSelector,
    ) -> Result<ReadingView, QueryError> {
        let index = self.index().await;
        let snapshot = index.snapshot(selector)?;
        let station = snapshot.get(id).ok_or(QueryError::StationNotFound(id))?;
        let reading = station
            .series
            .get(timestamp)
            .ok_or_else(|| QueryError::TimestampNotFound(timestamp.to_string()))?;
        Ok(ReadingView {
            point_id: station.id,
            location: station.location,
            time: timestamp.to_string(),
            data: *reading,
        })
    }

    /// The reading at the maximum timestamp of the station's own
    /// series, not a global clock.
    pub async fn latest_reading(
        &self,
        id: u32,
        selector: &DateSelector,
    ) -> Result<ReadingView, QueryError> {
        let index = self.index().await;
        let snapshot = index.snapshot(selector)?;
        let station = snapshot.get(id).ok_or(QueryError::StationNotFound(id))?;
        let (time, reading) = station
            .latest()
            .ok_or_else(|| QueryError::TimestampNotFound("latest".to_string()))?;
        Ok(ReadingView {
            point_id: station.id,
            location: station.location,
            time: time.to_string(),
            data: *reading,
        })
    }
}

fn station_view(station: &Station) -> StationView {
    StationView {
        point_id: station.id,
        location: station.location,
        data: station.series.clone(),
        latest: latest_view(station),
    }
}

fn latest_view(station: &Station) -> Option<LatestView> {
    station.latest().map(|(time, reading)| LatestView {
        time: time.to_string(),
        reading: *reading,
    })
}
