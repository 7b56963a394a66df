//! Turning application state into paintable frames, and painting them.

mod frame;
mod path;
mod svg;

use anyhow::Result;

pub use frame::{Frame, FrameRequest, LegendStop, MapFrame, NoDataReason, PaintedFeature, ScaleKind};
pub use svg::{frame_to_svg, write_svg_file, SvgRenderer};

pub(crate) use svg::{escape, write_svg_footer, write_svg_header};

/// A drawing surface that frames are painted onto.
pub trait Renderer {
    fn paint(&mut self, frame: &Frame) -> Result<()>;
}
