use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{data::{LoadOptions, Source}, scale::ScaleTable, view::{ViewTransformController, SCALE_EXTENT}};

/// Viewer settings, read from JSON. Every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Zoom limits `[min, max]` of the view transform.
    pub scale_extent: (f64, f64),
    pub region_column: String,
    pub feature_id_property: String,
    pub city_property: String,
    /// Single-byte field separator of the demographic table.
    pub delimiter: char,
    /// Prefix joined onto relative data locations (a directory or a URL).
    pub base_path: String,
    pub scales: ScaleTable,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let options = LoadOptions::default();
        Self {
            width: 960.0,
            height: 600.0,
            padding: 0.0,
            scale_extent: SCALE_EXTENT,
            region_column: options.region_column,
            feature_id_property: options.feature_id_property,
            city_property: options.city_property,
            delimiter: options.delimiter as char,
            base_path: String::new(),
            scales: ScaleTable::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)
            .context("[config] Invalid viewer configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("[config] Failed to load {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.width > 0.0 && self.height > 0.0,
            "[config] width and height must be positive, got {}x{}", self.width, self.height);
        ensure!(self.padding >= 0.0, "[config] padding must not be negative, got {}", self.padding);
        let (min, max) = self.scale_extent;
        ensure!(min.is_finite() && max.is_finite() && min > 0.0 && min <= max,
            "[config] scale_extent must satisfy 0 < min <= max, got [{min}, {max}]");
        ensure!(self.delimiter.is_ascii(), "[config] delimiter must be a single ASCII character, got {:?}", self.delimiter);
        Ok(())
    }

    /// Zoom/pan controller honoring `scale_extent`.
    pub fn controller(&self) -> ViewTransformController {
        ViewTransformController::with_scale_extent(self.scale_extent.0, self.scale_extent.1)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            region_column: self.region_column.clone(),
            feature_id_property: self.feature_id_property.clone(),
            city_property: self.city_property.clone(),
            delimiter: if self.delimiter.is_ascii() { self.delimiter as u8 } else { b',' },
        }
    }

    /// Resolve a data location against `base_path`. Absolute paths and URLs are kept as is.
    pub fn resolve(&self, location: &str) -> Source {
        let is_absolute = location.contains("://") || Path::new(location).is_absolute();
        if self.base_path.is_empty() || is_absolute {
            return Source::parse(location);
        }
        if self.base_path.contains("://") {
            Source::parse(&format!("{}/{}", self.base_path.trim_end_matches('/'), location.trim_start_matches('/')))
        } else {
            Source::Path(Path::new(&self.base_path).join(location))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scale::{Interpolator, Rgb}, view::Gesture};

    #[test]
    fn empty_object_gives_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!((config.width, config.height), (960.0, 600.0));
        assert_eq!(config.load_options(), LoadOptions::default());
    }

    #[test]
    fn partial_overrides() {
        let config = ViewerConfig::from_json_str(r#"{"width": 400, "delimiter": ";", "city_property": "town"}"#).unwrap();
        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.load_options().delimiter, b';');
        assert_eq!(config.load_options().city_property, "town");
    }

    #[test]
    fn scale_table_can_be_replaced() {
        let config = ViewerConfig::from_json_str(r#"{"scales": {"entries": [
            {"pattern": "INCOME", "spec": {"domain": {"kind": "computed"}, "interpolator": "reds", "fallback": {"r": 0, "g": 0, "b": 0}}}
        ]}}"#).unwrap();
        assert_eq!(config.scales.lookup("MED_INCOME").interpolator, Interpolator::Reds);

        let config = ViewerConfig::from_json_str(r##"{"scales": {"entries": [
            {"pattern": "RENT", "spec": {"domain": {"kind": "computed"}, "interpolator": "blues", "fallback": "#eeeeee"}}
        ]}}"##).unwrap();
        assert_eq!(config.scales.lookup("RENT").fallback, Rgb::new(0xee, 0xee, 0xee));
    }

    #[test]
    fn scale_extent_reaches_the_controller() {
        let config = ViewerConfig::from_json_str(r#"{"scale_extent": [1, 4]}"#).unwrap();
        let mut controller = config.controller();
        assert_eq!(controller.scale_extent(), (1.0, 4.0));
        let t = controller.handle(Gesture::DoubleClick { pointer: (0.0, 0.0), shift: false });
        let t2 = controller.handle(Gesture::DoubleClick { pointer: (0.0, 0.0), shift: false });
        assert_eq!((t.k, t2.k), (2.0, 4.0));
        assert_eq!(controller.handle(Gesture::DoubleClick { pointer: (0.0, 0.0), shift: false }).k, 4.0);

        assert_eq!(ViewerConfig::default().controller().scale_extent(), SCALE_EXTENT);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ViewerConfig::from_json_str(r#"{"width": 0}"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{"padding": -1}"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{"delimiter": "é"}"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{"scale_extent": [5, 2]}"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{"scale_extent": [0, 2]}"#).is_err());
        assert!(ViewerConfig::from_json_str("[1]").is_err());
    }

    #[test]
    fn resolves_relative_locations() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.resolve("a.geojson"), Source::parse("a.geojson"));

        config.base_path = "data".into();
        assert_eq!(config.resolve("a.geojson"), Source::Path(Path::new("data").join("a.geojson")));

        config.base_path = "https://example.org/maps/".into();
        assert_eq!(config.resolve("a.csv"), Source::Url("https://example.org/maps/a.csv".into()));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"padding": 8}"#).unwrap();
        assert_eq!(ViewerConfig::from_json_file(&path).unwrap().padding, 8.0);
        assert!(ViewerConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
