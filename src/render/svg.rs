//! SVG writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};

use crate::scale::Rgb;

use super::{frame::{Frame, MapFrame}, Renderer};

const LEGEND_SWATCH: f64 = 14.0;
const LEGEND_MARGIN: f64 = 10.0;

/// Paints frames as standalone SVG documents into any writer.
pub struct SvgRenderer<W: Write> {
    writer: W,
}

impl<W: Write> SvgRenderer<W> {
    pub fn new(writer: W) -> Self { Self { writer } }

    pub fn into_inner(self) -> W { self.writer }
}

impl SvgRenderer<BufWriter<File>> {
    /// Renderer writing to a newly created file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[render::svg] Failed to create {}", path.display()))?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Renderer for SvgRenderer<W> {
    fn paint(&mut self, frame: &Frame) -> Result<()> {
        write_frame(&mut self.writer, frame)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Render a frame to an in-memory SVG string.
pub fn frame_to_svg(frame: &Frame) -> Result<String> {
    let mut renderer = SvgRenderer::new(Vec::new());
    renderer.paint(frame)?;
    String::from_utf8(renderer.into_inner())
        .context("[render::svg] SVG output is not valid UTF-8")
}

/// Render a frame to an SVG file.
pub fn write_svg_file(frame: &Frame, path: &Path) -> Result<()> {
    SvgRenderer::create(path)?.paint(frame)
}

fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    match frame {
        Frame::NoData { reason, width, height } => {
            write_svg_header(writer, *width, *height)?;
            write_svg_styles(writer)?;
            writeln!(writer, r#"<text class="status" x="{:.1}" y="{:.1}">{}</text>"#,
                width / 2.0, height / 2.0, escape(&reason.to_string()))?;
        }
        Frame::Map(map) => {
            write_svg_header(writer, map.width, map.height)?;
            write_svg_styles(writer)?;
            write_regions(writer, map)?;
            write_legend(writer, map)?;
        }
    }
    write_svg_footer(writer)
}

/// Every region inside one group carrying the view transform.
fn write_regions<W: Write>(writer: &mut W, map: &MapFrame) -> Result<()> {
    writeln!(writer, r#"<g class="regions" transform="{}">"#, map.view)?;
    for feature in &map.features {
        if feature.path.is_empty() { continue }

        let id = feature.id.as_ref().map(|id| format!(r#" data-id="{}""#, escape(id.as_str()))).unwrap_or_default();
        let class = if feature.no_data { "region no-data" } else { "region" };
        let value = feature.value.map(|v| format!(r#" data-value="{v}""#)).unwrap_or_default();
        writeln!(writer, r#"<path class="{class}"{id}{value} fill-rule="evenodd" style="fill:{}" d="{}"/>"#,
            feature.fill, feature.path)?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

/// Vertical legend in the top-left corner, unaffected by the view transform.
fn write_legend<W: Write>(writer: &mut W, map: &MapFrame) -> Result<()> {
    writeln!(writer, r#"<g class="legend" transform="translate({LEGEND_MARGIN},{LEGEND_MARGIN})">"#)?;
    writeln!(writer, r#"<text class="legend-title" x="0" y="0">{}</text>"#, escape(&map.attribute))?;

    let mut y = 6.0;
    for stop in &map.legend {
        write_swatch(writer, y, stop.color, &format_value(stop.value))?;
        y += LEGEND_SWATCH + 2.0;
    }
    if map.features.iter().any(|f| f.no_data) {
        write_swatch(writer, y, map.no_data_color, "No data")?;
    }

    writeln!(writer, "</g>")?;
    Ok(())
}

fn write_swatch<W: Write>(writer: &mut W, y: f64, color: Rgb, label: &str) -> Result<()> {
    writeln!(writer, r#"<rect x="0" y="{y}" width="{LEGEND_SWATCH}" height="{LEGEND_SWATCH}" style="fill:{color}"/>"#)?;
    writeln!(writer, r#"<text class="legend-label" x="{}" y="{}">{}</text>"#,
        LEGEND_SWATCH + 4.0, y + LEGEND_SWATCH - 3.0, escape(label))?;
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else if value.abs() < 10.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.1}")
    }
}

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Write SVG header to any writer.
pub(crate) fn write_svg_header<W: Write>(writer: &mut W, width: f64, height: f64) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##)?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write SVG styles for map features.
fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"<defs>
<style>
    .region {{ stroke: #ffffff; stroke-width: 0.5; vector-effect: non-scaling-stroke; }}
    .no-data {{ fill-opacity: 0.6; }}
    .legend-title {{ font: bold 12px sans-serif; fill: #333; }}
    .legend-label {{ font: 11px sans-serif; fill: #333; }}
    .status {{ font: 14px sans-serif; fill: #666; text-anchor: middle; }}
</style>
</defs>"##)?;
    Ok(())
}

/// Write the closing </svg> tag.
pub(crate) fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}
