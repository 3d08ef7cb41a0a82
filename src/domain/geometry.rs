// River geometry domain models and normalization
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A WGS84 point, serialized as a `[lat, lon]` pair so segments can be
/// handed straight to a map polyline renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.lat, self.lon).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (lat, lon) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self { lat, lon })
    }
}

/// One contiguous polyline of the selected river, at least two points,
/// in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RiverSegment {
    points: Vec<Coordinate>,
}

impl RiverSegment {
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All segments of one named river feature. Built once at startup and
/// never empty; the `/api/map` payload is this struct serialized as
/// `[[[lat, lon], ...], ...]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RiverGeometry {
    segments: Vec<RiverSegment>,
}

impl RiverGeometry {
    pub fn segments(&self) -> &[RiverSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("river feature '{0}' not found in source geometry")]
    FeatureNotFound(String),
    #[error("polyline with {0} point(s) cannot form a river segment")]
    DegenerateSegment(usize),
    #[error("point with {0} coordinate value(s) is not a (lon, lat) pair")]
    MalformedPoint(usize),
}

/// Raw polyline geometry as produced by the geometry loader, still in
/// the source's (lon, lat[, extra ignored dimensions]) point order.
#[derive(Debug, Clone)]
pub enum RawGeometry {
    LineString(Vec<Vec<f64>>),
    MultiLineString(Vec<Vec<Vec<f64>>>),
}

/// One named feature from the geometry source. The loader is expected
/// to have reprojected coordinates to WGS84 already.
#[derive(Debug, Clone)]
pub struct RawFeature {
    pub name: String,
    pub geometry: RawGeometry,
}

/// Filters `features` to those named `target_name` and normalizes them
/// into renderable segments: every point is axis-swapped from
/// (lon, lat) to (lat, lon), and multi-polylines are flattened into
/// independent segments, never merged.
///
/// Zero matching features is fatal; there is no valid "empty river"
/// state for this service.
pub fn normalize_features(
    features: &[RawFeature],
    target_name: &str,
) -> Result<RiverGeometry, GeometryError> {
    let mut segments = Vec::new();
    let mut matched = 0usize;

    for feature in features.iter().filter(|f| f.name == target_name) {
        matched += 1;
        match &feature.geometry {
            RawGeometry::LineString(line) => segments.push(normalize_line(line)?),
            RawGeometry::MultiLineString(lines) => {
                for line in lines {
                    segments.push(normalize_line(line)?);
                }
            }
        }
    }

    if matched == 0 {
        return Err(GeometryError::FeatureNotFound(target_name.to_string()));
    }

    Ok(RiverGeometry { segments })
}

fn normalize_line(line: &[Vec<f64>]) -> Result<RiverSegment, GeometryError> {
    if line.len() < 2 {
        return Err(GeometryError::DegenerateSegment(line.len()));
    }

    let mut points = Vec::with_capacity(line.len());
    for point in line {
        match point.as_slice() {
            // (lon, lat, ...) -> (lat, lon); altitude and any further
            // dimensions are dropped
            [lon, lat, ..] => points.push(Coordinate::new(*lat, *lon)),
            _ => return Err(GeometryError::MalformedPoint(point.len())),
        }
    }

    Ok(RiverSegment { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_feature(name: &str, line: Vec<Vec<f64>>) -> RawFeature {
        RawFeature {
            name: name.to_string(),
            geometry: RawGeometry::LineString(line),
        }
    }

    #[test]
    fn test_axis_swap_preserves_point_count_and_order() {
        let features = vec![line_feature(
            "River Lee",
            vec![vec![-0.03, 51.55], vec![-0.02, 51.56], vec![-0.01, 51.57]],
        )];

        let geometry = normalize_features(&features, "River Lee").unwrap();

        assert_eq!(geometry.segment_count(), 1);
        let segment = &geometry.segments()[0];
        assert_eq!(segment.len(), 3);
        assert_eq!(segment.points()[0], Coordinate::new(51.55, -0.03));
        assert_eq!(segment.points()[2], Coordinate::new(51.57, -0.01));
    }

    #[test]
    fn test_multi_polyline_yields_independent_segments() {
        let features = vec![RawFeature {
            name: "River Lee".to_string(),
            geometry: RawGeometry::MultiLineString(vec![
                vec![vec![-0.03, 51.55], vec![-0.02, 51.56]],
                vec![vec![-0.01, 51.57], vec![0.00, 51.58], vec![0.01, 51.59]],
            ]),
        }];

        let geometry = normalize_features(&features, "River Lee").unwrap();

        assert_eq!(geometry.segment_count(), 2);
        assert_eq!(geometry.segments()[0].len(), 2);
        assert_eq!(geometry.segments()[1].len(), 3);
    }

    #[test]
    fn test_extra_dimensions_are_ignored() {
        let features = vec![line_feature(
            "River Lee",
            vec![vec![-0.03, 51.55, 12.0], vec![-0.02, 51.56, 13.5]],
        )];

        let geometry = normalize_features(&features, "River Lee").unwrap();

        assert_eq!(geometry.segments()[0].points()[1], Coordinate::new(51.56, -0.02));
    }

    #[test]
    fn test_other_features_are_filtered_out() {
        let features = vec![
            line_feature("River Lee", vec![vec![-0.03, 51.55], vec![-0.02, 51.56]]),
            line_feature("River Thames", vec![vec![-0.1, 51.5], vec![-0.2, 51.49]]),
        ];

        let geometry = normalize_features(&features, "River Lee").unwrap();

        assert_eq!(geometry.segment_count(), 1);
    }

    #[test]
    fn test_missing_feature_is_fatal() {
        let features = vec![line_feature(
            "River Thames",
            vec![vec![-0.1, 51.5], vec![-0.2, 51.49]],
        )];

        let err = normalize_features(&features, "River Lee").unwrap_err();
        assert!(matches!(err, GeometryError::FeatureNotFound(name) if name == "River Lee"));
    }

    #[test]
    fn test_single_point_line_is_rejected() {
        let features = vec![line_feature("River Lee", vec![vec![-0.03, 51.55]])];

        let err = normalize_features(&features, "River Lee").unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateSegment(1)));
    }

    #[test]
    fn test_one_value_point_is_rejected() {
        let features = vec![line_feature(
            "River Lee",
            vec![vec![-0.03, 51.55], vec![51.56]],
        )];

        let err = normalize_features(&features, "River Lee").unwrap_err();
        assert!(matches!(err, GeometryError::MalformedPoint(1)));
    }

    #[test]
    fn test_coordinate_serializes_as_pair() {
        let json = serde_json::to_string(&Coordinate::new(51.55, -0.03)).unwrap();
        assert_eq!(json, "[51.55,-0.03]");
    }
}
