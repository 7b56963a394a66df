use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    data::{Dataset, Feature, RegionId},
    projection::{in_city, ProjectionFactory, RegionKey},
    scale::{coerce_number, ColorScale, Rgb, ScaleFactory},
    state::{AppState, LoadState},
    view::ViewTransform,
};

use super::path::multipolygon_to_path;

/// How the painted attribute is mapped to color.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScaleKind {
    /// Whatever the scale table configures for the attribute.
    #[default]
    Auto,
    Sequential,
    Diverging,
    Quantize,
    /// Sequential over the union of the attribute and `other`.
    Joint { other: String },
}

/// What to draw and at which size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    pub attribute: String,
    #[serde(default)]
    pub scale: ScaleKind,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub padding: f64,
    #[serde(default = "default_city_property")]
    pub city_property: String,
    #[serde(default = "default_legend_stops")]
    pub legend_stops: usize,
}

fn default_city_property() -> String { "city".to_string() }

fn default_legend_stops() -> usize { 5 }

impl FrameRequest {
    pub fn new(attribute: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            attribute: attribute.into(),
            scale: ScaleKind::Auto,
            width,
            height,
            padding: 0.0,
            city_property: default_city_property(),
            legend_stops: default_legend_stops(),
        }
    }

    pub fn with_scale(mut self, scale: ScaleKind) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_city_property(mut self, city_property: impl Into<String>) -> Self {
        self.city_property = city_property.into();
        self
    }
}

/// Why nothing can be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoDataReason {
    NotLoaded,
    Loading,
    Failed(String),
    NoFeatures,
}

impl std::fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataReason::NotLoaded => write!(f, "No data loaded"),
            NoDataReason::Loading => write!(f, "Loading..."),
            NoDataReason::Failed(message) => write!(f, "Failed to load data: {message}"),
            NoDataReason::NoFeatures => write!(f, "No regions to display"),
        }
    }
}

/// One region ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintedFeature {
    pub id: Option<RegionId>,
    /// SVG path data in projected screen coordinates (before the view transform).
    pub path: String,
    pub fill: Rgb,
    pub value: Option<f64>,
    /// Unmatched by the join, or the attribute is missing or non-numeric.
    pub no_data: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendStop {
    pub value: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapFrame {
    pub width: f64,
    pub height: f64,
    pub attribute: String,
    pub region: RegionKey,
    pub view: ViewTransform,
    pub features: Vec<PaintedFeature>,
    pub legend: Vec<LegendStop>,
    pub no_data_color: Rgb,
    /// Set when the scale degraded to a constant color.
    pub fallback: bool,
}

/// Everything a renderer needs for one paint, computed from the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    NoData { reason: NoDataReason, width: f64, height: f64 },
    Map(MapFrame),
}

impl Frame {
    /// Derive a frame from `state`. Fails only when the projection cannot be fitted
    /// to the full extent (degenerate geometry or an empty viewport).
    pub fn build(state: &AppState, scales: &ScaleFactory, request: &FrameRequest, view: ViewTransform) -> Result<Frame> {
        let no_data = |reason| Frame::NoData { reason, width: request.width, height: request.height };
        let dataset = match state.load_state() {
            LoadState::Empty => return Ok(no_data(NoDataReason::NotLoaded)),
            LoadState::Loading => return Ok(no_data(NoDataReason::Loading)),
            LoadState::Failed(e) => return Ok(no_data(NoDataReason::Failed(e.to_string()))),
            LoadState::Ready(dataset) => dataset,
        };
        if dataset.features().is_empty() {
            return Ok(no_data(NoDataReason::NoFeatures));
        }

        Self::map(dataset, state.selected_city(), scales, request, view)
            .map(Frame::Map)
            .with_context(|| format!("[render] Cannot draw {:?} at {}x{}", request.attribute, request.width, request.height))
    }

    fn map(dataset: &Dataset, city: Option<&str>, scales: &ScaleFactory, request: &FrameRequest, view: ViewTransform) -> Result<MapFrame> {
        let features = dataset.features();
        let factory = ProjectionFactory::for_city(features, &request.city_property, city)
            .with_padding(request.padding);

        let mut region = if city.is_some() { RegionKey::Zoomed } else { RegionKey::Full };
        let projection = match factory.fit_projection(region, request.width, request.height) {
            Ok(projection) => projection,
            Err(e) if region == RegionKey::Zoomed => {
                warn!("[render] {e:#}; showing the full extent instead");
                region = RegionKey::Full;
                factory.fit_projection(region, request.width, request.height)?
            }
            Err(e) => return Err(e),
        };

        // Computed domains follow what is on screen: the selected city when zoomed.
        let zoomed: Vec<Feature>;
        let domain_features: &[Feature] = match (region, city) {
            (RegionKey::Zoomed, Some(city)) => {
                zoomed = features.iter()
                    .filter(|feature| in_city(feature, &request.city_property, city))
                    .cloned()
                    .collect();
                &zoomed
            }
            _ => features.features(),
        };
        let scale = select_scale(scales, domain_features, request);
        let painted = features.iter()
            .map(|feature| {
                let value = feature.property(&request.attribute).and_then(coerce_number);
                let no_data = !feature.has_data() || value.is_none();
                let fill = match value {
                    Some(v) if feature.has_data() => scale.color(v),
                    _ => scale.no_data_color(),
                };
                PaintedFeature {
                    id: feature.id().cloned(),
                    path: multipolygon_to_path(feature.geometry(), &projection),
                    fill,
                    value,
                    no_data,
                }
            })
            .collect::<Vec<_>>();

        debug!("[render] Frame for {:?}: {} features, region {region:?}, {} without data",
            request.attribute, painted.len(), painted.iter().filter(|f| f.no_data).count());

        Ok(MapFrame {
            width: request.width,
            height: request.height,
            attribute: request.attribute.clone(),
            region,
            view,
            legend: scale.legend(request.legend_stops).into_iter()
                .map(|(value, color)| LegendStop { value, color })
                .collect(),
            no_data_color: scale.no_data_color(),
            fallback: scale.is_fallback(),
            features: painted,
        })
    }
}

fn select_scale(scales: &ScaleFactory, features: &[Feature], request: &FrameRequest) -> ColorScale {
    let key = request.attribute.as_str();
    match &request.scale {
        ScaleKind::Auto => scales.for_attribute(features, key),
        ScaleKind::Sequential => scales.sequential(features, key),
        ScaleKind::Diverging => scales.diverging(key, key, None),
        ScaleKind::Quantize => scales.quantize(),
        ScaleKind::Joint { other } => scales.joint_domain(features, key, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{DemographicRecord, FeatureCollection, FieldValue, LoadError},
        testing::{feature, square},
    };
    use serde_json::json;

    fn ready_state(features: FeatureCollection, records: &[DemographicRecord]) -> AppState {
        let mut state = AppState::new();
        let ticket = state.begin_load();
        state.finish_load(ticket, Ok(Dataset::from_parts(&features, records, "city")));
        state
    }

    fn record(id: &str, pop: f64) -> DemographicRecord {
        DemographicRecord {
            id: RegionId::new(id).unwrap(),
            fields: [("POP".to_string(), FieldValue::Number(pop))].into_iter().collect(),
        }
    }

    fn placed(id: &str, x: f64, city: &str) -> Feature {
        let props = json!({"region_id": id, "city": city}).as_object().cloned().unwrap();
        Feature::new(RegionId::new(id), square(x, 0.0, 1.0), props)
    }

    #[test]
    fn no_data_frames_follow_load_state() {
        let scales = ScaleFactory::default();
        let request = FrameRequest::new("POP", 100.0, 100.0);
        let mut state = AppState::new();

        let frame = Frame::build(&state, &scales, &request, ViewTransform::IDENTITY).unwrap();
        assert!(matches!(frame, Frame::NoData { reason: NoDataReason::NotLoaded, .. }));

        let ticket = state.begin_load();
        let frame = Frame::build(&state, &scales, &request, ViewTransform::IDENTITY).unwrap();
        assert!(matches!(frame, Frame::NoData { reason: NoDataReason::Loading, .. }));

        state.finish_load(ticket, Err(LoadError::Network { location: "u".into(), message: "down".into() }));
        let frame = Frame::build(&state, &scales, &request, ViewTransform::IDENTITY).unwrap();
        assert!(matches!(frame, Frame::NoData { reason: NoDataReason::Failed(_), .. }));
    }

    #[test]
    fn unmatched_features_are_painted_as_no_data() {
        let features = FeatureCollection::new(vec![placed("R0", 0.0, "A"), placed("R1", 1.0, "A"), placed("R2", 2.0, "A")]);
        let state = ready_state(features, &[record("R0", 10.0), record("R2", 30.0)]);
        let request = FrameRequest::new("POP", 300.0, 100.0);

        let Frame::Map(frame) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        assert_eq!(frame.features.len(), 3);
        assert!(frame.features[1].no_data);
        assert_eq!(frame.features[1].fill, frame.no_data_color);
        assert!(!frame.features[0].no_data && !frame.features[2].no_data);
        assert_ne!(frame.features[0].fill, frame.features[2].fill);
        assert_eq!(frame.legend.len(), 5);
        assert_eq!(frame.legend[0].value, 10.0);
    }

    #[test]
    fn unknown_selection_falls_back_to_full_extent() {
        let features = FeatureCollection::new(vec![placed("R0", 0.0, "A"), placed("R1", 5.0, "B")]);
        let mut state = ready_state(features, &[]);
        assert!(state.select_city(Some("B")));

        let request = FrameRequest::new("POP", 100.0, 100.0).with_city_property("town");
        let Frame::Map(frame) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        assert_eq!(frame.region, RegionKey::Full);

        let request = FrameRequest::new("POP", 100.0, 100.0);
        let Frame::Map(frame) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        assert_eq!(frame.region, RegionKey::Zoomed);
    }

    #[test]
    fn zoomed_frames_scan_the_selected_city_only() {
        let features = FeatureCollection::new(vec![placed("R0", 0.0, "A"), placed("R1", 5.0, "B"), placed("R2", 6.0, "B")]);
        let mut state = ready_state(features, &[record("R0", 1000.0), record("R1", 20.0), record("R2", 60.0)]);
        let request = FrameRequest::new("POP", 200.0, 100.0);

        let Frame::Map(full) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        assert_eq!(full.legend.first().map(|s| s.value), Some(20.0));
        assert_eq!(full.legend.last().map(|s| s.value), Some(1000.0));

        assert!(state.select_city(Some("B")));
        let Frame::Map(zoomed) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        assert_eq!(zoomed.region, RegionKey::Zoomed);
        assert_eq!(zoomed.legend.first().map(|s| s.value), Some(20.0));
        assert_eq!(zoomed.legend.last().map(|s| s.value), Some(60.0));
        // Regions outside the city are still drawn, clamped to the city's range.
        assert_eq!(zoomed.features.len(), 3);
        assert_eq!(zoomed.features[0].fill, zoomed.legend.last().map(|s| s.color).unwrap());
    }

    #[test]
    fn empty_domain_paints_fallback_without_failing() {
        let features = FeatureCollection::new(vec![placed("R0", 0.0, "A"), placed("R1", 1.0, "A")]);
        let state = ready_state(features, &[record("R0", 1.0)]);
        let request = FrameRequest::new("MISSING_FIELD", 100.0, 100.0);

        let Frame::Map(frame) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        assert!(frame.fallback);
        assert!(frame.legend.is_empty());
        assert!(frame.features.iter().all(|f| f.no_data));
    }

    #[test]
    fn quantize_request_uses_fixed_buckets() {
        let features = FeatureCollection::new(vec![feature("R0", json!({"city": "A"}))]);
        let state = ready_state(features, &[record("R0", 12.0)]);
        let request = FrameRequest::new("POP", 50.0, 50.0).with_scale(ScaleKind::Quantize);

        let Frame::Map(frame) = Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).unwrap() else {
            panic!("expected a map frame");
        };
        let values = frame.legend.iter().map(|s| s.value).collect::<Vec<_>>();
        assert_eq!(values, vec![0.0, 20.0, 40.0, 60.0, 80.0]);
        assert_eq!(frame.features[0].fill, frame.legend[0].color);
    }

    #[test]
    fn empty_viewport_is_an_error() {
        let features = FeatureCollection::new(vec![placed("R0", 0.0, "A")]);
        let state = ready_state(features, &[]);
        let request = FrameRequest::new("POP", 0.0, 100.0);
        assert!(Frame::build(&state, &ScaleFactory::default(), &request, ViewTransform::IDENTITY).is_err());
    }
}
