pub mod interaction;
pub mod tooltip;
pub mod viewport;

pub use interaction::{
    CITATION_EDGE_COLOR, EdgeRole, HighlightPartition, InteractionState, NodeRole,
    REFERENCE_EDGE_COLOR,
};
pub use tooltip::place_tooltip;
pub use viewport::{ScaleRange, ViewTransform, ViewportController, fit_transform};
