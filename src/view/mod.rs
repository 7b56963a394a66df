//! Interactive zoom/pan view transform.

mod controller;
mod transform;

pub use controller::{DeltaMode, Gesture, ViewTransformController, SCALE_EXTENT};
pub use transform::ViewTransform;
