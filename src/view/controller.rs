//! Gesture-driven zoom/pan state.

use geo::Coord;
use log::trace;
use serde::{Deserialize, Serialize};

use super::transform::ViewTransform;

/// Default zoom limits.
pub const SCALE_EXTENT: (f64, f64) = (1.0, 10.0);

/// Unit of a wheel event's `delta_y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    fn factor(self) -> f64 {
        match self {
            DeltaMode::Pixel => 0.002,
            DeltaMode::Line => 0.05,
            DeltaMode::Page => 1.0,
        }
    }
}

/// User input the controller understands. Positions are in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    /// Positive `delta_y` scrolls down and zooms out.
    Wheel { delta_y: f64, mode: DeltaMode, pointer: (f64, f64) },
    /// Pointer moved by `(dx, dy)` while pressed.
    Drag { dx: f64, dy: f64 },
    /// Two-finger pinch; `ratio` is new distance over old distance.
    Pinch { ratio: f64, center: (f64, f64) },
    /// Doubles the zoom, or halves it with shift.
    DoubleClick { pointer: (f64, f64), shift: bool },
}

/// Owns the view transform of one map surface.
///
/// Every gesture produces the next transform from the current one and the event alone.
/// The transform is a `Copy` value replaced as a whole, so readers never see a scale
/// paired with a stale translate.
#[derive(Clone, Debug)]
pub struct ViewTransformController {
    transform: ViewTransform,
    scale_extent: (f64, f64),
}

impl Default for ViewTransformController {
    fn default() -> Self { Self::new() }
}

impl ViewTransformController {
    /// Identity transform, zoom limited to [`SCALE_EXTENT`].
    pub fn new() -> Self {
        Self { transform: ViewTransform::IDENTITY, scale_extent: SCALE_EXTENT }
    }

    /// Custom zoom limits; `min` is raised to a positive value and `max` to at least `min`.
    pub fn with_scale_extent(min: f64, max: f64) -> Self {
        let min = if min.is_finite() && min > 0.0 { min } else { SCALE_EXTENT.0 };
        let max = if max.is_finite() { max.max(min) } else { min.max(SCALE_EXTENT.1) };
        Self { transform: ViewTransform::IDENTITY, scale_extent: (min, max) }
    }

    /// Snapshot of the current transform.
    pub fn transform(&self) -> ViewTransform { self.transform }

    pub fn scale_extent(&self) -> (f64, f64) { self.scale_extent }

    /// Back to identity, e.g. when the drawing surface is recreated.
    pub fn reset(&mut self) {
        self.transform = ViewTransform::IDENTITY;
    }

    /// Apply one gesture and return the resulting transform.
    /// Events with non-finite values leave the transform unchanged.
    pub fn handle(&mut self, gesture: Gesture) -> ViewTransform {
        if let Some(next) = self.next_transform(gesture) {
            trace!("[view] {gesture:?} -> k={} x={} y={}", next.k, next.x, next.y);
            self.transform = next;
        }
        self.transform
    }

    fn next_transform(&self, gesture: Gesture) -> Option<ViewTransform> {
        match gesture {
            Gesture::Wheel { delta_y, mode, pointer } => {
                finite(&[delta_y])?;
                self.zoom_about(2f64.powf(-delta_y * mode.factor()), pointer)
            }
            Gesture::Drag { dx, dy } => {
                finite(&[dx, dy])?;
                let t = self.transform;
                Some(ViewTransform { k: t.k, x: t.x + dx, y: t.y + dy })
            }
            Gesture::Pinch { ratio, center } => {
                finite(&[ratio])?;
                if ratio <= 0.0 { return None }
                self.zoom_about(ratio, center)
            }
            Gesture::DoubleClick { pointer, shift } => {
                self.zoom_about(if shift { 0.5 } else { 2.0 }, pointer)
            }
        }
    }

    /// Scale by `factor` keeping the content under `anchor` fixed.
    /// A factor that over- or underflowed still clamps to the extent.
    fn zoom_about(&self, factor: f64, anchor: (f64, f64)) -> Option<ViewTransform> {
        finite(&[anchor.0, anchor.1])?;
        if factor.is_nan() || factor < 0.0 { return None }
        let t = self.transform;
        let k = (t.k * factor).clamp(self.scale_extent.0, self.scale_extent.1);

        let anchor = Coord { x: anchor.0, y: anchor.1 };
        let content = t.invert(anchor);
        Some(ViewTransform { k, x: anchor.x - content.x * k, y: anchor.y - content.y * k })
    }
}

fn finite(values: &[f64]) -> Option<()> {
    values.iter().all(|v| v.is_finite()).then_some(())
}
