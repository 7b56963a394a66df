//! Color interpolators over t in [0, 1].

use serde::{Deserialize, Serialize};

use super::color::Rgb;

const REDS: [u32; 9] = [
    0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d,
];

const BLUES: [u32; 9] = [
    0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b,
];

const RD_BU: [u32; 11] = [
    0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3, 0x2166ac, 0x053061,
];

/// Five-class Blues, used by quantized scales.
pub(crate) const BLUES_5: [Rgb; 5] = [
    Rgb::from_u32(0xeff3ff),
    Rgb::from_u32(0xbdd7e7),
    Rgb::from_u32(0x6baed6),
    Rgb::from_u32(0x3182bd),
    Rgb::from_u32(0x08519c),
];

/// Named color ramps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolator {
    /// Light to dark red.
    Reds,
    /// Light to dark blue.
    Blues,
    /// Red through near-white to blue.
    RdBu,
}

impl Interpolator {
    fn stops(self) -> &'static [u32] {
        match self {
            Interpolator::Reds => &REDS,
            Interpolator::Blues => &BLUES,
            Interpolator::RdBu => &RD_BU,
        }
    }

    /// Color at `t`, clamped to [0, 1]. NaN maps to the start of the ramp.
    pub fn at(self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let stops = self.stops();
        let channel = |shift: u32| {
            let values: Vec<f64> = stops.iter().map(|hex| ((hex >> shift) & 0xff) as f64).collect();
            basis_spline(&values, t).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(16), channel(8), channel(0))
    }
}

/// Uniform cubic B-spline through `values`, with reflected end points.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let i = if t >= 1.0 { n - 1 } else { (t * n as f64).floor() as usize };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };

    let t1 = (t - i as f64 / n as f64) * n as f64;
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3) / 6.0
}
