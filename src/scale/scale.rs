use serde_json::Value;

use super::{
    color::Rgb,
    domain::{coerce_number, AttributeDomain},
    interpolate::{Interpolator, BLUES_5},
};

/// No numeric value exists for an attribute; the scale degrades to a constant color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyDomainWarning {
    /// The attribute key(s) that were scanned.
    pub keys: Vec<String>,
}

/// Fixed domain and thresholds of quantized scales.
pub const QUANTIZE_DOMAIN: (f64, f64) = (0.0, 100.0);

/// Pure mapping from an attribute value to a color.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorScale {
    /// Single interpolator over `[min, max]`, clamped.
    Sequential { min: f64, max: f64, interpolator: Interpolator, no_data: Rgb },
    /// Interpolator over `[min, center, max]`, input clamped to `[min, max]`.
    Diverging { min: f64, center: f64, max: f64, interpolator: Interpolator, no_data: Rgb },
    /// Fixed `[0, 100]` domain split into equal buckets, one palette color each.
    Quantize { palette: Vec<Rgb>, no_data: Rgb },
    /// Every input maps to `color`; produced when the domain was empty.
    Fallback { color: Rgb, warning: EmptyDomainWarning },
}

impl ColorScale {
    pub(crate) fn quantize_blues() -> Self {
        ColorScale::Quantize { palette: BLUES_5.to_vec(), no_data: Rgb::NO_DATA }
    }

    /// Position of `value` along the interpolator, in [0, 1]. `None` for quantized and
    /// fallback scales and for NaN input.
    pub fn position(&self, value: f64) -> Option<f64> {
        if value.is_nan() { return None }
        match *self {
            ColorScale::Sequential { min, max, .. } => {
                let t = if max > min { (value - min) / (max - min) } else { 0.0 };
                Some(t.clamp(0.0, 1.0))
            }
            ColorScale::Diverging { min, center, max, .. } => {
                let x = value.clamp(min, max);
                let t = if x < center {
                    if center > min { 0.5 * (x - min) / (center - min) } else { 0.5 }
                } else if max > center {
                    0.5 + 0.5 * (x - center) / (max - center)
                } else {
                    0.5
                };
                Some(t)
            }
            ColorScale::Quantize { .. } | ColorScale::Fallback { .. } => None,
        }
    }

    /// Bucket of a quantized scale; values outside the domain pin to the end buckets.
    fn bucket(palette_len: usize, value: f64) -> usize {
        let (lo, hi) = QUANTIZE_DOMAIN;
        let step = (hi - lo) / palette_len as f64;
        let k = ((value - lo) / step).floor();
        if k < 0.0 { 0 } else { (k as usize).min(palette_len - 1) }
    }

    /// Color of a numeric value. NaN gets the no-data color.
    pub fn color(&self, value: f64) -> Rgb {
        match self {
            ColorScale::Sequential { interpolator, no_data, .. }
            | ColorScale::Diverging { interpolator, no_data, .. } => self.position(value)
                .map_or(*no_data, |t| interpolator.at(t)),
            ColorScale::Quantize { palette, no_data } => {
                if value.is_nan() || palette.is_empty() { *no_data }
                else { palette[Self::bucket(palette.len(), value)] }
            }
            ColorScale::Fallback { color, .. } => *color,
        }
    }

    /// Color of a property value; missing or non-numeric values get the no-data color.
    pub fn color_for(&self, value: Option<&Value>) -> Rgb {
        value.and_then(coerce_number)
            .map_or_else(|| self.no_data_color(), |n| self.color(n))
    }

    /// Color for regions without data.
    pub fn no_data_color(&self) -> Rgb {
        match self {
            ColorScale::Sequential { no_data, .. }
            | ColorScale::Diverging { no_data, .. }
            | ColorScale::Quantize { no_data, .. } => *no_data,
            ColorScale::Fallback { color, .. } => *color,
        }
    }

    /// Input domain. `None` for fallback scales.
    pub fn domain(&self) -> Option<AttributeDomain> {
        match *self {
            ColorScale::Sequential { min, max, .. } => Some(AttributeDomain::Linear { min, max }),
            ColorScale::Diverging { min, center, max, .. } => Some(AttributeDomain::Diverging { min, center, max }),
            ColorScale::Quantize { .. } => Some(AttributeDomain::Linear { min: QUANTIZE_DOMAIN.0, max: QUANTIZE_DOMAIN.1 }),
            ColorScale::Fallback { .. } => None,
        }
    }

    /// Color at the center of a diverging scale (the middle of the domain otherwise).
    pub fn midpoint(&self) -> Rgb {
        match self.domain() {
            Some(AttributeDomain::Diverging { center, .. }) => self.color(center),
            Some(domain) => self.color((domain.min() + domain.max()) / 2.0),
            None => self.no_data_color(),
        }
    }

    pub fn is_fallback(&self) -> bool { matches!(self, ColorScale::Fallback { .. }) }

    pub fn warning(&self) -> Option<&EmptyDomainWarning> {
        match self {
            ColorScale::Fallback { warning, .. } => Some(warning),
            _ => None,
        }
    }

    /// Legend entries as `(value, color)`: the lower bound of each bucket for quantized
    /// scales, otherwise `stops` evenly spaced values across the domain.
    pub fn legend(&self, stops: usize) -> Vec<(f64, Rgb)> {
        match self {
            ColorScale::Quantize { palette, .. } => {
                let (lo, hi) = QUANTIZE_DOMAIN;
                let step = (hi - lo) / palette.len() as f64;
                palette.iter().enumerate().map(|(i, &color)| (lo + step * i as f64, color)).collect()
            }
            ColorScale::Fallback { .. } => Vec::new(),
            _ => {
                let Some(domain) = self.domain() else { return Vec::new() };
                let (min, max) = (domain.min(), domain.max());
                match stops {
                    0 => Vec::new(),
                    1 => vec![(min, self.color(min))],
                    n => (0..n)
                        .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
                        .map(|v| (v, self.color(v)))
                        .collect(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reds(min: f64, max: f64) -> ColorScale {
        ColorScale::Sequential { min, max, interpolator: Interpolator::Reds, no_data: Rgb::NO_DATA }
    }

    fn rdbu(limit: f64) -> ColorScale {
        ColorScale::Diverging { min: -limit, center: 0.0, max: limit, interpolator: Interpolator::RdBu, no_data: Rgb::NO_DATA }
    }

    #[test]
    fn sequential_is_monotonic_within_domain() {
        let scale = reds(10.0, 20.0);
        let samples: Vec<f64> = (0..=50).map(|i| 10.0 + i as f64 * 0.2).collect();
        let positions: Vec<f64> = samples.iter().map(|&v| scale.position(v).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(positions[0], 0.0);
        assert_eq!(*positions.last().unwrap(), 1.0);

        let lum: Vec<f64> = samples.iter().map(|&v| scale.color(v).luminance()).collect();
        assert!(lum.windows(2).all(|w| w[1] <= w[0]));
        assert!(lum[0] > lum[50]);
    }

    #[test]
    fn sequential_clamps_and_handles_degenerate_domain() {
        let scale = reds(0.0, 1.0);
        assert_eq!(scale.color(-5.0), scale.color(0.0));
        assert_eq!(scale.color(5.0), scale.color(1.0));
        assert_eq!(scale.color(f64::NAN), Rgb::NO_DATA);

        let flat = reds(3.0, 3.0);
        assert_eq!(flat.position(3.0), Some(0.0));
        assert_eq!(flat.color(3.0), Interpolator::Reds.at(0.0));
    }

    #[test]
    fn diverging_zero_is_midpoint_for_any_reference() {
        for limit in [0.5, 1.0, 3.0, 1000.0] {
            let scale = rdbu(limit);
            assert_eq!(scale.position(0.0), Some(0.5));
            assert_eq!(scale.color(0.0), scale.midpoint());
            assert_eq!(scale.color(0.0), Interpolator::RdBu.at(0.5));
        }
        let skewed = ColorScale::Diverging { min: -2.0, center: 0.0, max: 8.0, interpolator: Interpolator::RdBu, no_data: Rgb::NO_DATA };
        assert_eq!(skewed.color(0.0), skewed.midpoint());
        assert_eq!(skewed.position(-1.0), Some(0.25));
        assert_eq!(skewed.position(4.0), Some(0.75));
    }

    #[test]
    fn diverging_pins_out_of_range_values() {
        let scale = rdbu(1.0);
        assert_eq!(scale.color(-7.0), scale.color(-1.0));
        assert_eq!(scale.color(42.0), scale.color(1.0));
        assert_eq!(scale.color(-1.0), Interpolator::RdBu.at(0.0));
    }

    #[test]
    fn quantize_buckets() {
        let scale = ColorScale::quantize_blues();
        assert_eq!(scale.color(1.0), scale.color(19.9));
        assert_eq!(scale.color(20.0), scale.color(39.0));
        assert_ne!(scale.color(19.9), scale.color(20.0));
        assert_eq!(scale.color(-10.0), BLUES_5[0]);
        assert_eq!(scale.color(100.0), BLUES_5[4]);
        assert_eq!(scale.color(250.0), BLUES_5[4]);
        assert_eq!(scale.color(f64::NAN), Rgb::NO_DATA);

        let legend = scale.legend(3);
        assert_eq!(legend.iter().map(|(v, _)| *v).collect::<Vec<_>>(), vec![0.0, 20.0, 40.0, 60.0, 80.0]);
    }

    #[test]
    fn same_bucket_same_color() {
        let scale = ColorScale::quantize_blues();
        for bucket in 0..5 {
            let lo = bucket as f64 * 20.0;
            let colors: Vec<Rgb> = (0..20).map(|i| scale.color(lo + i as f64 * 0.99)).collect();
            assert!(colors.iter().all(|c| *c == colors[0]), "bucket {bucket}");
        }
    }

    #[test]
    fn fallback_is_constant() {
        let scale = ColorScale::Fallback { color: Rgb::NO_DATA, warning: EmptyDomainWarning { keys: vec!["v".into()] } };
        for v in [f64::NEG_INFINITY, -1.0, 0.0, 1e9, f64::NAN] {
            assert_eq!(scale.color(v), Rgb::NO_DATA);
        }
        assert!(scale.is_fallback());
        assert!(scale.legend(5).is_empty());
        assert_eq!(scale.warning().unwrap().keys, ["v"]);
    }

    #[test]
    fn color_for_treats_missing_as_no_data() {
        let scale = ColorScale::Sequential { min: 0.0, max: 1.0, interpolator: Interpolator::Blues, no_data: Rgb::new(1, 2, 3) };
        assert_eq!(scale.color_for(None), Rgb::new(1, 2, 3));
        assert_eq!(scale.color_for(Some(&json!("n/a"))), Rgb::new(1, 2, 3));
        assert_eq!(scale.color_for(Some(&json!("1"))), Interpolator::Blues.at(1.0));
    }

    #[test]
    fn legend_spans_domain() {
        let legend = reds(0.0, 100.0).legend(5);
        assert_eq!(legend.iter().map(|(v, _)| *v).collect::<Vec<_>>(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(legend[0].1, Interpolator::Reds.at(0.0));
    }
}
