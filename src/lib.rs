#![doc = "Choropleth map pipeline: load regions and demographics, color them, project them, and draw them under an interactive view transform"]
mod chart;
mod config;
mod data;
mod projection;
mod render;
mod scale;
mod state;
mod view;

#[cfg(test)]
mod testing;

#[doc(inline)]
pub use data::{
    join, load_boundaries, load_dataset, load_demographics, Dataset, DemographicRecord, Feature,
    FeatureCollection, FieldValue, JoinReport, JoinStatus, LoadError, LoadOptions, MissingJoinWarning,
    RegionId, Source,
};

#[doc(inline)]
pub use scale::{
    attribute_values, coerce_number, AttributeDomain, ColorScale, DomainRule, EmptyDomainWarning,
    Interpolator, Rgb, ScaleEntry, ScaleFactory, ScaleSpec, ScaleTable, DEFAULT_DIVERGING, DEFAULT_SPEC,
    QUANTIZE_DOMAIN,
};

#[doc(inline)]
pub use projection::{Projection, ProjectionFactory, RegionKey};

#[doc(inline)]
pub use view::{DeltaMode, Gesture, ViewTransform, ViewTransformController, SCALE_EXTENT};

#[doc(inline)]
pub use state::{AppState, LoadOutcome, LoadState, LoadTicket, StateChange, SubscriptionId};

#[doc(inline)]
pub use render::{
    frame_to_svg, write_svg_file, Frame, FrameRequest, LegendStop, MapFrame, NoDataReason, PaintedFeature,
    Renderer, ScaleKind, SvgRenderer,
};

#[doc(inline)]
pub use chart::{Bar, ChartDimensions, Margin, PairedBars};

#[doc(inline)]
pub use config::ViewerConfig;
