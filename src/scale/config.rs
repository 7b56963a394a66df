//! Static mapping from attribute keys to scale settings.

use serde::{Deserialize, Serialize};

use super::{color::Rgb, interpolate::Interpolator};

/// How an attribute's domain is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainRule {
    /// `[min, max]` scanned from the data.
    Computed,
    /// Hardcoded `[min, max]`.
    Fixed { min: f64, max: f64 },
    /// Hardcoded `[-limit, 0, limit]`, diverging and clamped.
    Diverging { limit: f64 },
}

/// Scale settings for one family of attributes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    pub domain: DomainRule,
    pub interpolator: Interpolator,
    pub fallback: Rgb,
}

/// A table row: attributes whose key contains `pattern` use `spec`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub pattern: String,
    pub spec: ScaleSpec,
}

/// Used when no pattern matches.
pub const DEFAULT_SPEC: ScaleSpec = ScaleSpec {
    domain: DomainRule::Computed,
    interpolator: Interpolator::Blues,
    fallback: Rgb::NO_DATA,
};

/// Built-in rows, checked in order.
const BUILTIN: &[(&str, ScaleSpec)] = &[
    // Rate differences against a reference group: red below parity, blue above.
    ("DIFF_", ScaleSpec { domain: DomainRule::Diverging { limit: 1.0 }, interpolator: Interpolator::RdBu, fallback: Rgb::NO_DATA }),
    ("SHARE_", ScaleSpec { domain: DomainRule::Computed, interpolator: Interpolator::Reds, fallback: Rgb::NO_DATA }),
    ("RATE", ScaleSpec { domain: DomainRule::Computed, interpolator: Interpolator::Reds, fallback: Rgb::NO_DATA }),
    ("POP", ScaleSpec { domain: DomainRule::Computed, interpolator: Interpolator::Blues, fallback: Rgb::NO_DATA }),
];

/// Ordered pattern table; the first entry whose pattern occurs in the key wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    pub entries: Vec<ScaleEntry>,
    #[serde(default = "default_spec")]
    pub default: ScaleSpec,
}

fn default_spec() -> ScaleSpec { DEFAULT_SPEC }

impl Default for ScaleTable {
    fn default() -> Self {
        Self {
            entries: BUILTIN.iter()
                .map(|(pattern, spec)| ScaleEntry { pattern: pattern.to_string(), spec: *spec })
                .collect(),
            default: DEFAULT_SPEC,
        }
    }
}

impl ScaleTable {
    pub fn lookup(&self, key: &str) -> &ScaleSpec {
        self.entries.iter()
            .find(|entry| key.contains(entry.pattern.as_str()))
            .map_or(&self.default, |entry| &entry.spec)
    }
}
