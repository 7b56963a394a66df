use anyhow::{anyhow, Context, Result};
use geo::Coord;
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// Latitude beyond which Mercator y diverges; inputs are clamped to it.
pub(crate) const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

const GEOGRAPHIC: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";
const MERCATOR: &str = "+proj=merc +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs +type=crs";

/// WGS84 lon/lat (degrees) <-> Mercator meters (y grows north).
pub(crate) struct Mercator {
    geographic: Proj4,
    planar: Proj4,
}

impl Mercator {
    pub(crate) fn new() -> Result<Self> {
        let geographic = Proj4::from_proj_string(GEOGRAPHIC)
            .with_context(|| anyhow!("failed to build source PROJ.4: {GEOGRAPHIC}"))?;
        let planar = Proj4::from_proj_string(MERCATOR)
            .with_context(|| anyhow!("failed to build target PROJ.4: {MERCATOR}"))?;
        Ok(Self { geographic, planar })
    }

    /// Degrees in, meters out. `None` for non-finite input or a failed transform.
    pub(crate) fn forward(&self, coord: Coord<f64>) -> Option<Coord<f64>> {
        if !(coord.x.is_finite() && coord.y.is_finite()) { return None }
        let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let mut point = (coord.x.to_radians(), lat.to_radians(), 0.0);
        transform(&self.geographic, &self.planar, &mut point).ok()?;
        (point.0.is_finite() && point.1.is_finite()).then_some(Coord { x: point.0, y: point.1 })
    }

    /// Meters in, degrees out.
    pub(crate) fn inverse(&self, coord: Coord<f64>) -> Option<Coord<f64>> {
        if !(coord.x.is_finite() && coord.y.is_finite()) { return None }
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.planar, &self.geographic, &mut point).ok()?;
        Some(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }
}
