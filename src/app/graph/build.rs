use log::info;
use openalex_graphs::openalex::{WorkGraph, WorkNode};
use openalex_graphs::physics::{SETTLE_ITERATIONS, Simulation, SimulationConfig};
use openalex_graphs::util::{capitalize, format_count};
use openalex_graphs::view::{HighlightPartition, InteractionState, ScaleRange, ViewportController};

use super::{NODE_RADIUS, ViewScratch, WorksGraphView};

impl WorksGraphView {
    pub(in crate::app) fn new(graph: WorkGraph) -> Self {
        let config = SimulationConfig {
            node_radius: NODE_RADIUS,
            ..SimulationConfig::default()
        };
        let mut simulation = Simulation::new(graph.node_count(), &graph.edges, config);
        simulation.settle(SETTLE_ITERATIONS);
        info!(
            "laid out {} works with {} citation links",
            graph.node_count(),
            graph.edge_count()
        );

        let partition = HighlightPartition::idle(graph.node_count(), graph.edge_count());
        Self {
            graph,
            simulation,
            viewport: ViewportController::new(ScaleRange::GRAPH),
            interaction: InteractionState::default(),
            partition,
            dragging: None,
            needs_fit: true,
            scratch: ViewScratch::default(),
        }
    }

    pub(in crate::app) fn work_count(&self) -> usize {
        self.graph.node_count()
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Recomputes the highlight partition only when the focused node changed.
    pub(in crate::app) fn refresh_partition(&mut self) {
        let focus = self.interaction.focus();
        if self.partition.focus == focus {
            return;
        }
        self.partition =
            HighlightPartition::compute(focus, &self.graph.edges, self.graph.node_count());
    }

    /// The tooltip stays on the clicked node; hovering only highlights.
    pub(in crate::app) fn tooltip_target(&self) -> Option<usize> {
        self.interaction.active()
    }

    pub(in crate::app) fn stop(&mut self) {
        self.simulation.stop();
        self.dragging = None;
        self.interaction.reset();
        self.refresh_partition();
    }
}

pub(super) fn tooltip_lines(work: &WorkNode) -> Vec<String> {
    vec![
        work.title.clone(),
        format!("Type: {}", capitalize(&work.type_tag)),
        format!(
            "Year: {}",
            work.year
                .map(|year| year.to_string())
                .unwrap_or_else(|| "Unknown".to_owned())
        ),
        format!("References: {}", format_count(work.reference_count as u64)),
        format!("Citations: {}", format_count(work.citation_count)),
    ]
}
