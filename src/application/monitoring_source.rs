// Source traits for data acquisition
use crate::domain::geometry::RawFeature;
use crate::domain::monitoring::MonitoringIndex;
use async_trait::async_trait;

/// Loads the full monitoring dataset. Implementations own all I/O;
/// the index they return is immutable for its lifetime and replaced
/// wholesale on reload.
#[async_trait]
pub trait MonitoringSource: Send + Sync {
    async fn load_index(&self) -> anyhow::Result<MonitoringIndex>;
}

/// Yields raw polyline features for normalization. Reprojection to
/// WGS84 is the implementation's responsibility; the normalizer only
/// swaps axis order.
#[async_trait]
pub trait GeometrySource: Send + Sync {
    async fn load_features(&self) -> anyhow::Result<Vec<RawFeature>>;
}
