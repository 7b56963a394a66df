use log::warn;

use crate::data::Feature;

use super::{
    color::Rgb,
    config::{DomainRule, ScaleTable},
    domain::AttributeDomain,
    interpolate::Interpolator,
    scale::{ColorScale, EmptyDomainWarning},
};

/// Reference domain of diverging scales when none is given.
pub const DEFAULT_DIVERGING: (f64, f64) = (-1.0, 1.0);

/// Builds color scales from feature collections, driven by a [`ScaleTable`].
#[derive(Clone, Debug, Default)]
pub struct ScaleFactory {
    table: ScaleTable,
}

impl ScaleFactory {
    pub fn new(table: ScaleTable) -> Self { Self { table } }

    pub fn table(&self) -> &ScaleTable { &self.table }

    /// Sequential scale over the computed `[min, max]` of `key`, using the table's
    /// interpolator for that key. Falls back to a constant color when nothing is numeric.
    pub fn sequential(&self, features: &[Feature], key: &str) -> ColorScale {
        let spec = self.table.lookup(key);
        sequential_from(features, &[key], spec.interpolator, spec.fallback)
    }

    /// Diverging scale with a fixed domain (default `[-1, 0, 1]`), clamped.
    /// The keys only select the table entry; data never moves the domain.
    pub fn diverging(&self, left_key: &str, right_key: &str, reference: Option<(f64, f64)>) -> ColorScale {
        let left = self.table.lookup(left_key);
        let spec = if matches!(left.domain, DomainRule::Diverging { .. }) { left } else { self.table.lookup(right_key) };
        let (min, max) = reference.unwrap_or(DEFAULT_DIVERGING);
        let interpolator = match spec.domain {
            DomainRule::Diverging { .. } => spec.interpolator,
            _ => Interpolator::RdBu,
        };
        ColorScale::Diverging { min: min.min(0.0), center: 0.0, max: max.max(0.0), interpolator, no_data: spec.fallback }
    }

    /// Five-bucket scale over the fixed domain `[0, 100]`.
    pub fn quantize(&self) -> ColorScale { ColorScale::quantize_blues() }

    /// Sequential scale whose domain spans both keys, so both sides of a paired
    /// comparison share one legend.
    pub fn joint_domain(&self, features: &[Feature], left_key: &str, right_key: &str) -> ColorScale {
        sequential_from(features, &[left_key, right_key], Interpolator::Reds, self.table.lookup(left_key).fallback)
    }

    /// Scale for `key` as configured in the table.
    pub fn for_attribute(&self, features: &[Feature], key: &str) -> ColorScale {
        let spec = self.table.lookup(key);
        match spec.domain {
            DomainRule::Computed => sequential_from(features, &[key], spec.interpolator, spec.fallback),
            DomainRule::Fixed { min, max } => ColorScale::Sequential { min, max, interpolator: spec.interpolator, no_data: spec.fallback },
            DomainRule::Diverging { limit } => ColorScale::Diverging {
                min: -limit.abs(),
                center: 0.0,
                max: limit.abs(),
                interpolator: spec.interpolator,
                no_data: spec.fallback,
            },
        }
    }
}

fn sequential_from(features: &[Feature], keys: &[&str], interpolator: Interpolator, fallback: Rgb) -> ColorScale {
    match AttributeDomain::scan(features, keys) {
        Some(domain) => ColorScale::Sequential { min: domain.min(), max: domain.max(), interpolator, no_data: fallback },
        None => {
            let warning = EmptyDomainWarning { keys: keys.iter().map(|k| k.to_string()).collect() };
            warn!("[scale] No numeric values for {:?} across {} features; using fallback color {}",
                warning.keys, features.len(), fallback.to_hex());
            ColorScale::Fallback { color: fallback, warning }
        }
    }
}
