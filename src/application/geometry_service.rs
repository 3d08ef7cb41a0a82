// Geometry service - owns the normalized river geometry
use crate::application::monitoring_source::GeometrySource;
use crate::domain::geometry::{normalize_features, RiverGeometry};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Loads raw features once at startup, normalizes them for the
/// configured river, and caches the result process-wide. A missing
/// river feature fails construction, so the process never starts
/// serving with no geometry.
pub struct GeometryService {
    geometry: RwLock<Arc<RiverGeometry>>,
    source: Arc<dyn GeometrySource>,
    river_name: String,
}

impl GeometryService {
    pub async fn load(source: Arc<dyn GeometrySource>, river_name: String) -> anyhow::Result<Self> {
        let geometry = build(source.as_ref(), &river_name).await?;
        Ok(Self {
            geometry: RwLock::new(Arc::new(geometry)),
            source,
            river_name,
        })
    }

    pub async fn geometry(&self) -> Arc<RiverGeometry> {
        self.geometry.read().await.clone()
    }

    /// Renormalizes from the source and swaps the cached geometry.
    /// Returns the new segment count; on failure the previous geometry
    /// stays in place.
    pub async fn reload(&self) -> anyhow::Result<usize> {
        let geometry = build(self.source.as_ref(), &self.river_name).await?;
        let segments = geometry.segment_count();
        *self.geometry.write().await = Arc::new(geometry);
        tracing::info!(river = %self.river_name, segments, "river geometry reloaded");
        Ok(segments)
    }
}

async fn build(source: &dyn GeometrySource, river_name: &str) -> anyhow::Result<RiverGeometry> {
    let features = source
        .load_features()
        .await
        .context("failed to load geometry features")?;
    let geometry = normalize_features(&features, river_name)?;
    tracing::info!(
        river = river_name,
        segments = geometry.segment_count(),
        "river geometry normalized"
    );
    Ok(geometry)
}
