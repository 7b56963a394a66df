//! Attribute domains and color scales.

mod color;
mod config;
mod domain;
mod factory;
mod interpolate;
mod scale;

pub use color::Rgb;
pub use config::{DomainRule, ScaleEntry, ScaleSpec, ScaleTable, DEFAULT_SPEC};
pub use domain::{attribute_values, coerce_number, AttributeDomain};
pub use factory::{ScaleFactory, DEFAULT_DIVERGING};
pub use interpolate::Interpolator;
pub use scale::{ColorScale, EmptyDomainWarning, QUANTIZE_DOMAIN};
