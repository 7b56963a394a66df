//! GeoJSON boundary parsing.

use anyhow::{anyhow, bail, ensure, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};

use super::feature::{Feature, FeatureCollection, RegionId};

/// Parse a GeoJSON FeatureCollection. Any malformed feature fails the whole parse.
///
/// `id_property` names the property holding the region id; the top-level feature `id`
/// is used when that property is absent or blank.
pub(crate) fn read_feature_collection(bytes: &[u8], id_property: &str) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_slice(bytes)
        .context("[data::geojson] Failed to parse GeoJSON")?;

    ensure!(value["type"].as_str() == Some("FeatureCollection"),
        "[data::geojson] Expected a FeatureCollection, found {}", value["type"]);

    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[data::geojson] FeatureCollection has no features array"))?;

    features.iter()
        .enumerate()
        .map(|(idx, feature)| read_feature(feature, id_property)
            .with_context(|| format!("[data::geojson] Invalid feature at index {idx}")))
        .collect::<Result<Vec<_>>>()
        .map(FeatureCollection::new)
}

fn read_feature(feature: &Value, id_property: &str) -> Result<Feature> {
    ensure!(feature["type"].as_str() == Some("Feature"), "expected type \"Feature\"");

    let properties = match &feature["properties"] {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => bail!("properties must be an object, found {other}"),
    };

    let id = properties.get(id_property)
        .and_then(RegionId::from_value)
        .or_else(|| RegionId::from_value(&feature["id"]));

    let geometry = read_geometry(&feature["geometry"])?;

    Ok(Feature::new(id, geometry, properties))
}

/// Polygon and MultiPolygon geometries, normalized to a MultiPolygon.
fn read_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = geometry["coordinates"].as_array();
    match (geometry["type"].as_str(), coords) {
        (Some("Polygon"), Some(rings)) => Ok(MultiPolygon(vec![read_polygon(rings)?])),
        (Some("MultiPolygon"), Some(polygons)) => polygons.iter()
            .map(|polygon| polygon.as_array()
                .ok_or_else(|| anyhow!("polygon coordinates must be an array"))
                .and_then(|rings| read_polygon(rings)))
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon),
        (Some(ty @ ("Polygon" | "MultiPolygon")), None) => bail!("{ty} geometry has no coordinates array"),
        (Some(ty), _) => bail!("unsupported geometry type {ty:?}"),
        (None, _) if geometry.is_null() => bail!("feature has no geometry"),
        (None, _) => bail!("geometry has no type"),
    }
}

/// GeoJSON polygon: `[exterior, hole, hole, ...]`.
fn read_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| anyhow!("ring must be an array of positions"))
            .and_then(|positions| read_ring(positions))
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Ring of `[x, y]` positions; extra ordinates are ignored and open rings are closed.
fn read_ring(positions: &[Value]) -> Result<LineString<f64>> {
    let mut points = positions.iter()
        .map(|position| {
            let pair = position.as_array()
                .filter(|pair| pair.len() >= 2)
                .ok_or_else(|| anyhow!("position must be an array of at least two numbers"))?;
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("x coordinate must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("y coordinate must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }
    ensure!(points.len() >= 4, "ring has {} positions, a closed ring needs at least 4", points.len());

    Ok(LineString(points))
}
