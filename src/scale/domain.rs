//! Attribute value extraction and domain computation.

use serde_json::Value;

use crate::data::Feature;

/// Numeric coercion of a property value.
///
/// Numbers pass through and strings are trimmed and parsed. Null, booleans, empty or
/// unparsable strings, NaN and infinities are missing rather than zero.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Coerced values of `key` across `features`, skipping missing ones.
pub fn attribute_values<'a>(features: &'a [Feature], key: &'a str) -> impl Iterator<Item = f64> + 'a {
    features.iter()
        .filter_map(move |feature| feature.property(key))
        .filter_map(coerce_number)
}

/// Input range a scale is defined over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeDomain {
    /// `[min, max]`, computed or fixed.
    Linear { min: f64, max: f64 },
    /// `[min, center, max]`, e.g. `[-1, 0, 1]`.
    Diverging { min: f64, center: f64, max: f64 },
}

impl AttributeDomain {
    /// Single pass min/max over every key's values. `None` when no value survives coercion.
    pub fn scan(features: &[Feature], keys: &[&str]) -> Option<AttributeDomain> {
        let mut bounds: Option<(f64, f64)> = None;
        for feature in features {
            for value in keys.iter().filter_map(|key| feature.property(key)).filter_map(coerce_number) {
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(value), max.max(value)),
                    None => (value, value),
                });
            }
        }
        bounds.map(|(min, max)| AttributeDomain::Linear { min, max })
    }

    pub fn min(&self) -> f64 {
        match *self {
            AttributeDomain::Linear { min, .. } | AttributeDomain::Diverging { min, .. } => min,
        }
    }

    pub fn max(&self) -> f64 {
        match *self {
            AttributeDomain::Linear { max, .. } | AttributeDomain::Diverging { max, .. } => max,
        }
    }
}
