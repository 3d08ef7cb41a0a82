// GeoJSON geometry source
//
// Reads a GeoJSON FeatureCollection (the watercourse dataset exported
// to WGS84) and extracts named LineString / MultiLineString features.
// Features without a usable name or with a non-line geometry are
// skipped; filtering to the target river happens in the normalizer.
use crate::application::monitoring_source::GeometrySource;
use crate::domain::geometry::{RawFeature, RawGeometry};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GeoJsonFileSource {
    path: PathBuf,
    name_property: String,
}

impl GeoJsonFileSource {
    pub fn new(path: impl Into<PathBuf>, name_property: String) -> Self {
        Self {
            path: path.into(),
            name_property,
        }
    }
}

#[async_trait]
impl GeometrySource for GeoJsonFileSource {
    async fn load_features(&self) -> anyhow::Result<Vec<RawFeature>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read geometry file {}", self.path.display()))?;
        parse_feature_collection(&text, &self.name_property)
    }
}

fn parse_feature_collection(text: &str, name_property: &str) -> anyhow::Result<Vec<RawFeature>> {
    let document: Value = serde_json::from_str(text).context("geometry file is not valid JSON")?;
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .context("geometry file is not a GeoJSON FeatureCollection")?;

    Ok(features
        .iter()
        .filter_map(|feature| to_raw_feature(feature, name_property))
        .collect())
}

fn to_raw_feature(feature: &Value, name_property: &str) -> Option<RawFeature> {
    let name = feature
        .get("properties")?
        .get(name_property)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let geometry = feature.get("geometry")?;
    let coordinates = geometry.get("coordinates")?.clone();
    let raw = match geometry.get("type").and_then(Value::as_str)? {
        "LineString" => RawGeometry::LineString(serde_json::from_value(coordinates).ok()?),
        "MultiLineString" => RawGeometry::MultiLineString(serde_json::from_value(coordinates).ok()?),
        _ => return None,
    };

    Some(RawFeature {
        name,
        geometry: raw,
    })
}
