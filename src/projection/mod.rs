//! Map projection fitted to a viewport and a reference region.

mod factory;
mod mercator;
mod projection;

pub use factory::{ProjectionFactory, RegionKey};
pub(crate) use factory::in_city;
pub use projection::Projection;
