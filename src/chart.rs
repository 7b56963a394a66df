//! Two-sided bar chart comparing two attributes of one region.

use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    data::Feature,
    render::{escape, write_svg_footer, write_svg_header},
    scale::{coerce_number, ColorScale, Rgb},
};

/// Margins around the plotting area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Chart size and bar styling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub bar_height: f64,
    /// Vertical gap between a bar and its label.
    pub label_offset: f64,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 140.0,
            margin: Margin { top: 20.0, right: 20.0, bottom: 20.0, left: 20.0 },
            bar_height: 30.0,
            label_offset: 14.0,
        }
    }
}

const CENTER_LINE_STROKE: &str = "#000";
const TEXT_FILL: &str = "#333";
const FONT_SIZE: &str = "12px";

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub key: String,
    pub value: Option<f64>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
    /// Anchor of the value label, centered under the bar.
    pub label: (f64, f64),
}

/// Layout of a paired comparison: the left bar grows leftward from the center line
/// and the right bar rightward, both measured against the same domain maximum.
#[derive(Clone, Debug, PartialEq)]
pub struct PairedBars {
    pub dimensions: ChartDimensions,
    pub center_x: f64,
    pub left: Bar,
    pub right: Bar,
}

impl PairedBars {
    /// `None` when neither attribute has a numeric value for `feature`.
    /// `scale` should span both keys (see `ScaleFactory::joint_domain`).
    pub fn layout(feature: &Feature, left_key: &str, right_key: &str, scale: &ColorScale, dimensions: ChartDimensions) -> Option<Self> {
        let value = |key: &str| feature.property(key).and_then(coerce_number);
        let (left_value, right_value) = (value(left_key), value(right_key));
        if left_value.is_none() && right_value.is_none() { return None }

        let m = dimensions.margin;
        let inner_width = (dimensions.width - m.left - m.right).max(0.0);
        let inner_height = (dimensions.height - m.top - m.bottom).max(0.0);
        let center_x = m.left + inner_width / 2.0;
        let half = inner_width / 2.0;
        let y = m.top + ((inner_height - dimensions.bar_height - dimensions.label_offset) / 2.0).max(0.0);

        let extent = scale.domain()
            .map(|d| d.max().abs().max(d.min().abs()))
            .unwrap_or_else(|| left_value.unwrap_or(0.0).abs().max(right_value.unwrap_or(0.0).abs()));
        let length = |v: Option<f64>| match v {
            Some(v) if extent > 0.0 => half * (v.abs() / extent).min(1.0),
            _ => 0.0,
        };

        let bar = |key: &str, value: Option<f64>, x: f64, width: f64| Bar {
            key: key.to_string(),
            value,
            x,
            y,
            width,
            height: dimensions.bar_height,
            fill: value.map_or_else(|| scale.no_data_color(), |v| scale.color(v)),
            label: (x + width / 2.0, y + dimensions.bar_height + dimensions.label_offset),
        };

        let left_width = length(left_value);
        let right_width = length(right_value);
        Some(Self {
            dimensions,
            center_x,
            left: bar(left_key, left_value, center_x - left_width, left_width),
            right: bar(right_key, right_value, center_x, right_width),
        })
    }

    /// Write the chart as a standalone SVG document.
    pub fn write_svg<W: Write>(&self, writer: &mut W) -> Result<()> {
        let d = &self.dimensions;
        write_svg_header(writer, d.width, d.height)?;

        for bar in [&self.left, &self.right] {
            writeln!(writer, r#"<rect class="bar" data-key="{}" x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" style="fill:{}"/>"#,
                escape(&bar.key), bar.x, bar.y, bar.width, bar.height, bar.fill)?;
            let text = bar.value.map_or_else(|| "No data".to_string(), |v| format!("{v:.2}"));
            writeln!(writer, r#"<text x="{:.3}" y="{:.3}" fill="{TEXT_FILL}" font-size="{FONT_SIZE}" text-anchor="middle">{}</text>"#,
                bar.label.0, bar.label.1, escape(&text))?;
        }

        writeln!(writer, r#"<line class="center" x1="{x:.3}" y1="{:.3}" x2="{x:.3}" y2="{:.3}" stroke="{CENTER_LINE_STROKE}"/>"#,
            d.margin.top, d.height - d.margin.bottom, x = self.center_x)?;

        write_svg_footer(writer)
    }

    pub fn to_svg_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_svg(&mut buffer)?;
        String::from_utf8(buffer).context("[chart] SVG output is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scale::ScaleFactory, testing::{collection, feature}};
    use serde_json::json;

    #[test]
    fn bars_share_the_joint_domain() {
        let features = collection(vec![json!({"pctA": 0, "pctB": 90}), json!({"pctA": 40, "pctB": 10})]);
        let scale = ScaleFactory::default().joint_domain(&features, "pctA", "pctB");

        let bars = PairedBars::layout(&features[1], "pctA", "pctB", &scale, ChartDimensions::default()).unwrap();
        assert_eq!(bars.center_x, 200.0);
        // Half width is 180; 40/90 and 10/90 of it.
        assert!((bars.left.width - 80.0).abs() < 1e-9);
        assert!((bars.right.width - 20.0).abs() < 1e-9);
        assert_eq!(bars.left.x + bars.left.width, bars.center_x);
        assert_eq!(bars.right.x, bars.center_x);
        assert_eq!(bars.left.fill, scale.color(40.0));
        assert_eq!(bars.left.label.1 - bars.left.y, 44.0);
    }

    #[test]
    fn missing_side_has_zero_width() {
        let f = feature("r", json!({"a": 5}));
        let scale = ColorScale::Sequential { min: 0.0, max: 10.0, interpolator: crate::scale::Interpolator::Reds, no_data: Rgb::NO_DATA };
        let bars = PairedBars::layout(&f, "a", "b", &scale, ChartDimensions::default()).unwrap();
        assert_eq!(bars.right.width, 0.0);
        assert_eq!(bars.right.fill, Rgb::NO_DATA);
        assert!(bars.to_svg_string().unwrap().contains("No data"));
    }

    #[test]
    fn nothing_to_compare() {
        let f = feature("r", json!({"a": "n/a"}));
        let scale = ScaleFactory::default().quantize();
        assert!(PairedBars::layout(&f, "a", "b", &scale, ChartDimensions::default()).is_none());
    }

    #[test]
    fn svg_has_two_bars_and_a_center_line() {
        let f = feature("r", json!({"a": 1, "b": 2}));
        let scale = ColorScale::Sequential { min: 0.0, max: 2.0, interpolator: crate::scale::Interpolator::Reds, no_data: Rgb::NO_DATA };
        let svg = PairedBars::layout(&f, "a", "b", &scale, ChartDimensions::default()).unwrap().to_svg_string().unwrap();
        assert_eq!(svg.matches(r#"class="bar""#).count(), 2);
        assert!(svg.contains(r##"stroke="#000""##));
        assert!(svg.contains(r#"width="400""#));
    }
}
