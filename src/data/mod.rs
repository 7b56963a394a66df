//! Boundary and demographic loading, and the left join between them.

mod csv;
mod error;
mod feature;
mod geojson;
mod join;
mod source;

use std::collections::BTreeSet;

use log::debug;

pub use csv::{DemographicRecord, FieldValue};
pub use error::LoadError;
pub use feature::{Feature, FeatureCollection, JoinStatus, RegionId};
pub use join::{join, JoinReport, MissingJoinWarning};
pub use source::Source;

/// Column and property names used while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Identifier column of the demographic table.
    pub region_column: String,
    /// Feature property holding the region id (falls back to the GeoJSON `id`).
    pub feature_id_property: String,
    /// Feature property naming the city a region belongs to.
    pub city_property: String,
    /// Field separator of the demographic table.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            region_column: "region_id".to_string(),
            feature_id_property: "region_id".to_string(),
            city_property: "city".to_string(),
            delimiter: b',',
        }
    }
}

/// Fetch and parse a GeoJSON boundary file. All-or-nothing.
pub fn load_boundaries(source: &Source, options: &LoadOptions) -> Result<FeatureCollection, LoadError> {
    let bytes = source.fetch()?;
    let features = geojson::read_feature_collection(&bytes, &options.feature_id_property)
        .map_err(|e| LoadError::Geometry { location: source.location(), message: format!("{e:#}") })?;
    debug!("[data] Loaded {} features from {source}", features.len());
    Ok(features)
}

/// Fetch and parse a delimited demographic table.
pub fn load_demographics(source: &Source, options: &LoadOptions) -> Result<Vec<DemographicRecord>, LoadError> {
    let bytes = source.fetch()?;
    let records = csv::read_records(&bytes, &options.region_column, options.delimiter)
        .map_err(|e| LoadError::Table { location: source.location(), message: format!("{e:#}") })?;
    debug!("[data] Loaded {} demographic records from {source}", records.len());
    Ok(records)
}

/// Joined boundaries and demographics, ready to be shared with renderers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    features: FeatureCollection,
    report: JoinReport,
    cities: Vec<String>,
}

impl Dataset {
    /// Join `features` with `records` and collect the city list from `city_property`.
    pub fn from_parts(features: &FeatureCollection, records: &[DemographicRecord], city_property: &str) -> Self {
        let (features, report) = join(features, records);
        let cities = features.iter()
            .filter_map(|feature| feature.property(city_property))
            .filter_map(|value| match value {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self { features, report, cities }
    }

    pub fn features(&self) -> &FeatureCollection { &self.features }

    pub fn join_report(&self) -> &JoinReport { &self.report }

    /// Distinct city names, sorted.
    pub fn cities(&self) -> &[String] { &self.cities }
}

/// Load boundaries and demographics concurrently, then join once both have resolved.
pub fn load_dataset(boundaries: &Source, demographics: &Source, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let (features, records) = rayon::join(
        || load_boundaries(boundaries, options),
        || load_demographics(demographics, options),
    );
    let dataset = Dataset::from_parts(&features?, &records?, &options.city_property);

    debug!("[data] Joined {} features: {} matched, {} without data",
        dataset.features.len(), dataset.report.matched, dataset.report.missing.len());

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"region_id":"A","city":"Springfield"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
        {"type":"Feature","properties":{"region_id":"B","city":"Shelbyville"},"geometry":{"type":"Polygon","coordinates":[[[1,0],[2,0],[2,1],[1,1],[1,0]]]}},
        {"type":"Feature","properties":{"region_id":"C","city":"Springfield"},"geometry":{"type":"Polygon","coordinates":[[[2,0],[3,0],[3,1],[2,1],[2,0]]]}}
    ]}"#;

    #[test]
    fn load_dataset_joins_and_lists_cities() {
        let boundaries = Source::bytes("boundaries", BOUNDARIES.as_bytes().to_vec());
        let demographics = Source::bytes("demographics", b"region_id,pop\nA,10\nB,20\n".to_vec());

        let dataset = load_dataset(&boundaries, &demographics, &LoadOptions::default()).unwrap();

        assert_eq!(dataset.features().len(), 3);
        assert_eq!(dataset.join_report().matched, 2);
        assert_eq!(dataset.join_report().missing.len(), 1);
        assert_eq!(dataset.cities(), ["Shelbyville", "Springfield"]);
    }

    #[test]
    fn either_failure_fails_the_dataset() {
        let good = Source::bytes("boundaries", BOUNDARIES.as_bytes().to_vec());
        let bad_table = Source::bytes("demographics", b"name\nx\n".to_vec());
        let err = load_dataset(&good, &bad_table, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Table { .. }));

        let bad_geo = Source::bytes("boundaries", b"{}".to_vec());
        let table = Source::bytes("demographics", b"region_id\nA\n".to_vec());
        let err = load_dataset(&bad_geo, &table, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Geometry { .. }));
    }
}
