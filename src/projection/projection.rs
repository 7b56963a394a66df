use std::{fmt, sync::Arc};

use anyhow::{bail, ensure, Result};
use geo::{Coord, Rect};
use log::debug;

use super::mercator::Mercator;

/// Lon/lat -> screen coordinates: Mercator followed by a fitted scale and translate
/// (screen y grows downward).
#[derive(Clone)]
pub struct Projection {
    mercator: Arc<Mercator>,
    scale: f64,
    translate: (f64, f64),
}

impl Projection {
    /// Fit `bounds` (lon/lat) inside `extent` (screen), preserving aspect ratio and
    /// centering the shorter dimension.
    pub fn fit_extent(bounds: Rect<f64>, extent: Rect<f64>) -> Result<Self> {
        ensure!(extent.width() > 0.0 && extent.height() > 0.0,
            "[projection] Viewport extent must have positive size, got {}x{}", extent.width(), extent.height());

        let mercator = Mercator::new()?;
        let (Some(lo), Some(hi)) = (mercator.forward(bounds.min()), mercator.forward(bounds.max())) else {
            bail!("[projection] Reference bounds cannot be projected: {bounds:?}");
        };

        // Projected bounds in screen orientation (y flipped).
        let (x0, x1) = (lo.x, hi.x);
        let (y0, y1) = (-hi.y, -lo.y);
        let (dx, dy) = (x1 - x0, y1 - y0);

        let scale = match (dx > 0.0, dy > 0.0) {
            (true, true) => (extent.width() / dx).min(extent.height() / dy),
            (true, false) => extent.width() / dx,
            (false, true) => extent.height() / dy,
            (false, false) => bail!("[projection] Reference geometry has an empty extent: {bounds:?}"),
        };

        let translate = (
            extent.min().x + (extent.width() - scale * (x0 + x1)) / 2.0,
            extent.min().y + (extent.height() - scale * (y0 + y1)) / 2.0,
        );

        debug!("[projection] Fitted scale={scale:e} translate=({:.3},{:.3})", translate.0, translate.1);

        Ok(Self { mercator: Arc::new(mercator), scale, translate })
    }

    /// Fit `bounds` inside a `width x height` viewport inset by `padding` on every side.
    pub fn fit_size(bounds: Rect<f64>, width: f64, height: f64, padding: f64) -> Result<Self> {
        ensure!(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "[projection] Viewport must have positive size, got {width}x{height}");
        ensure!(padding >= 0.0 && 2.0 * padding < width.min(height),
            "[projection] Padding {padding} leaves no room in a {width}x{height} viewport");

        Self::fit_extent(bounds, Rect::new((padding, padding), (width - padding, height - padding)))
    }

    /// Screen position of a lon/lat coordinate.
    pub fn project(&self, coord: &Coord<f64>) -> Option<Coord<f64>> {
        let m = self.mercator.forward(*coord)?;
        Some(Coord {
            x: self.translate.0 + self.scale * m.x,
            y: self.translate.1 - self.scale * m.y,
        })
    }

    /// Lon/lat of a screen position.
    pub fn invert(&self, point: &Coord<f64>) -> Option<Coord<f64>> {
        self.mercator.inverse(Coord {
            x: (point.x - self.translate.0) / self.scale,
            y: (self.translate.1 - point.y) / self.scale,
        })
    }

    /// Screen units per projected meter.
    pub fn scale(&self) -> f64 { self.scale }

    pub fn translate(&self) -> (f64, f64) { self.translate }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("scale", &self.scale)
            .field("translate", &self.translate)
            .finish()
    }
}
