use eframe::egui::Pos2;
use openalex_graphs::openalex::WorkGraph;
use openalex_graphs::physics::Simulation;
use openalex_graphs::view::{HighlightPartition, InteractionState, ViewportController};

mod build;
mod interaction;
mod legend;
mod view;

const NODE_RADIUS: f32 = 13.0;
const MIN_HIT_RADIUS: f32 = 4.0;

/// Force-directed citation graph of the most cited works of one topic.
pub(super) struct WorksGraphView {
    graph: WorkGraph,
    simulation: Simulation,
    viewport: ViewportController,
    interaction: InteractionState,
    partition: HighlightPartition,
    dragging: Option<usize>,
    needs_fit: bool,
    scratch: ViewScratch,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radius: f32,
    visible_mask: Vec<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToolbarAction {
    ZoomIn,
    ZoomOut,
    Fit,
}
