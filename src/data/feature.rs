use std::{fmt, ops::Deref, sync::Arc};

use ahash::AHashSet;
use geo::{BoundingRect, MultiPolygon, Rect};
use serde_json::{Map, Value};

/// Stable key joining boundaries to demographic rows.
/// Keeps the original identifier text (leading zeros included) without repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(Arc<str>);

impl RegionId {
    /// Returns `None` for identifiers that are empty after trimming.
    pub fn new(id: &str) -> Option<Self> {
        let id = id.trim();
        (!id.is_empty()).then(|| Self(Arc::from(id)))
    }

    /// Build an id from a JSON property value (strings and numbers only).
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) => Self::new(&n.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Outcome of joining a feature against demographic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStatus {
    /// Loaded from boundaries, not joined yet.
    #[default]
    Unjoined,
    /// A demographic record was merged into the properties.
    Matched,
    /// No demographic record exists; render with the no-data treatment.
    Missing,
}

/// A boundary geometry plus its named properties.
#[derive(Debug, Clone)]
pub struct Feature {
    id: Option<RegionId>,
    geometry: Arc<MultiPolygon<f64>>,
    properties: Map<String, Value>,
    status: JoinStatus,
}

impl Feature {
    pub fn new(id: Option<RegionId>, geometry: MultiPolygon<f64>, properties: Map<String, Value>) -> Self {
        Self { id, geometry: Arc::new(geometry), properties, status: JoinStatus::Unjoined }
    }

    pub fn id(&self) -> Option<&RegionId> { self.id.as_ref() }

    pub fn geometry(&self) -> &MultiPolygon<f64> { &self.geometry }

    pub fn properties(&self) -> &Map<String, Value> { &self.properties }

    pub fn property(&self, key: &str) -> Option<&Value> { self.properties.get(key) }

    pub fn status(&self) -> JoinStatus { self.status }

    /// False only for features the join marked as having no demographic record.
    pub fn has_data(&self) -> bool { self.status != JoinStatus::Missing }

    /// Same geometry (shared, not copied) with replacement properties and status.
    pub(crate) fn rejoined(&self, properties: Map<String, Value>, status: JoinStatus) -> Self {
        Self {
            id: self.id.clone(),
            geometry: Arc::clone(&self.geometry),
            properties,
            status,
        }
    }
}

/// Ordered features; order follows the source file.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self { Self { features } }

    pub fn len(&self) -> usize { self.features.len() }

    pub fn is_empty(&self) -> bool { self.features.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> { self.features.iter() }

    pub fn features(&self) -> &[Feature] { &self.features }

    /// Region ids that appear more than once, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<RegionId> {
        let mut seen = AHashSet::with_capacity(self.features.len());
        let mut duplicates = Vec::new();
        for id in self.features.iter().filter_map(Feature::id) {
            if !seen.insert(id) && !duplicates.contains(id) {
                duplicates.push(id.clone());
            }
        }
        duplicates
    }

    /// Bounding box (lon/lat) of every feature accepted by `filter`.
    pub fn bounds_where(&self, filter: impl Fn(&Feature) -> bool) -> Option<Rect<f64>> {
        self.features.iter()
            .filter(|feature| filter(*feature))
            .filter_map(|feature| feature.geometry().bounding_rect())
            .reduce(|a, b| Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            ))
    }

    pub fn bounds(&self) -> Option<Rect<f64>> { self.bounds_where(|_| true) }
}

impl Deref for FeatureCollection {
    type Target = [Feature];

    fn deref(&self) -> &[Feature] { &self.features }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter { self.features.iter() }
}
