//! Shared fixtures for unit tests.

use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};

use crate::data::{Feature, FeatureCollection, RegionId};

/// Axis-aligned square with its lower-left corner at `(x, y)`.
pub(crate) fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    let ring = LineString::from(vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)]);
    MultiPolygon(vec![Polygon::new(ring, vec![])])
}

/// Unit-square feature carrying the given properties.
pub(crate) fn feature(id: &str, properties: Value) -> Feature {
    let properties = match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Feature::new(RegionId::new(id), square(0.0, 0.0, 1.0), properties)
}

/// Collection of unit-square features, one per property object, ids `r0`, `r1`, ...
pub(crate) fn collection(properties: Vec<Value>) -> FeatureCollection {
    FeatureCollection::new(
        properties.into_iter()
            .enumerate()
            .map(|(i, props)| feature(&format!("r{i}"), props))
            .collect(),
    )
}
