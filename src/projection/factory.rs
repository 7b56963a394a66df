use anyhow::{anyhow, Result};
use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::data::{Feature, FeatureCollection};

use super::projection::Projection;

/// Which reference geometry a projection is fitted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKey {
    /// Every loaded boundary.
    Full,
    /// The detail boundary of the selected region.
    Zoomed,
}

/// Fits projections to one of two reference extents.
///
/// Nothing is cached between calls: callers refit whenever the viewport or the
/// selected region changes.
#[derive(Clone, Debug, Default)]
pub struct ProjectionFactory {
    full: Option<Rect<f64>>,
    zoomed: Option<Rect<f64>>,
    padding: f64,
}

impl ProjectionFactory {
    pub fn new(full: Option<Rect<f64>>, zoomed: Option<Rect<f64>>) -> Self {
        Self { full, zoomed, padding: 0.0 }
    }

    /// Full extent covers every feature; zoomed extent covers those accepted by `in_zoom`.
    pub fn from_features(features: &FeatureCollection, in_zoom: impl Fn(&Feature) -> bool) -> Self {
        Self::new(features.bounds(), features.bounds_where(in_zoom))
    }

    /// Zoomed extent is the set of features whose `city_property` equals `city`.
    pub fn for_city(features: &FeatureCollection, city_property: &str, city: Option<&str>) -> Self {
        Self::from_features(features, |feature| city.is_some_and(|city| in_city(feature, city_property, city)))
    }

    /// Inset the viewport on every side.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn reference(&self, region: RegionKey) -> Option<Rect<f64>> {
        match region {
            RegionKey::Full => self.full,
            RegionKey::Zoomed => self.zoomed,
        }
    }

    /// Projection fitting the `region` reference geometry inside `width x height`.
    pub fn fit_projection(&self, region: RegionKey, width: f64, height: f64) -> Result<Projection> {
        let bounds = self.reference(region)
            .ok_or_else(|| anyhow!("[projection] No reference geometry for {region:?} region"))?;
        Projection::fit_size(bounds, width, height, self.padding)
    }
}

/// Whether `feature`'s `city_property` names `city` (numbers compare by their text).
pub(crate) fn in_city(feature: &Feature, city_property: &str, city: &str) -> bool {
    match feature.property(city_property) {
        Some(serde_json::Value::String(value)) => value.trim() == city,
        Some(serde_json::Value::Number(value)) => value.to_string() == city,
        _ => false,
    }
}
