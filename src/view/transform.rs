use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Zoom/pan applied to projected geometry: `screen = translate + k * point`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { k: 1.0, x: 0.0, y: 0.0 };

    pub fn apply(&self, point: Coord<f64>) -> Coord<f64> {
        Coord { x: self.x + self.k * point.x, y: self.y + self.k * point.y }
    }

    pub fn invert(&self, point: Coord<f64>) -> Coord<f64> {
        Coord { x: (point.x - self.x) / self.k, y: (point.y - self.y) / self.k }
    }

    pub fn is_identity(&self) -> bool { *self == Self::IDENTITY }
}

impl Default for ViewTransform {
    fn default() -> Self { Self::IDENTITY }
}

impl fmt::Display for ViewTransform {
    /// Format as an SVG transform attribute.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}
