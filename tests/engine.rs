use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use openalex_graphs::HierarchyNode;
use openalex_graphs::layout::{RadialConfig, radial_layout};
use openalex_graphs::openalex::{RawWork, WorkGraph};
use openalex_graphs::physics::{SETTLE_ITERATIONS, Simulation, SimulationConfig};
use openalex_graphs::view::{
    EdgeRole, HighlightPartition, InteractionState, NodeRole, ScaleRange, ViewportController,
    place_tooltip,
};

fn works() -> Vec<RawWork> {
    serde_json::from_str(
        r#"[
            {"id": "W1", "title": "Attention", "type": "article", "cited_by_count": 900,
             "referenced_works": ["W2", "W3", "W404"]},
            {"id": "W2", "title": "Sequence models", "type": "article", "cited_by_count": 400,
             "referenced_works": ["W3"]},
            {"id": "W3", "title": "Backprop", "type": "book-chapter", "cited_by_count": 300},
            {"id": "W4", "title": "Survey", "type": "review", "cited_by_count": 50,
             "referenced_works": ["W1"]},
            {"id": "W5", "display_name": "Loner", "cited_by_count": 1}
        ]"#,
    )
    .expect("fixture parses")
}

#[test]
fn works_graph_settles_highlights_and_places_tooltips() {
    let graph = WorkGraph::from_works(&works());
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edges, vec![(0, 1), (0, 2), (1, 2), (3, 0)]);

    let config = SimulationConfig::default();
    let mut simulation = Simulation::new(graph.node_count(), &graph.edges, config);
    simulation.settle(SETTLE_ITERATIONS);

    let bodies = simulation.bodies();
    assert!(bodies.iter().all(|body| body.position.is_finite()));
    let min_distance = 2.0 * config.collision_radius();
    for (index, a) in bodies.iter().enumerate() {
        for b in &bodies[index + 1..] {
            assert!(
                (a.position - b.position).length() >= min_distance * 0.9,
                "bodies overlap after settling"
            );
        }
    }

    let mut interaction = InteractionState::default();
    interaction.click(0);
    let partition =
        HighlightPartition::compute(interaction.focus(), &graph.edges, graph.node_count());
    assert_eq!(partition.node(0), NodeRole::Active);
    assert_eq!(partition.node(1), NodeRole::Neighbor);
    assert_eq!(partition.node(3), NodeRole::Neighbor);
    assert_eq!(partition.node(4), NodeRole::Dimmed);
    assert_eq!(partition.edge(0), EdgeRole::Outgoing);
    assert_eq!(partition.edge(2), EdgeRole::Dimmed);
    assert_eq!(partition.edge(3), EdgeRole::Incoming);
    assert_eq!(partition.neighbor_count(), 3);

    interaction.click(0);
    assert_eq!(interaction.focus(), None);

    let viewport = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
    let mut controller = ViewportController::new(ScaleRange::GRAPH);
    let bounds = simulation.bounds().expect("graph has bodies");
    assert!(controller.fit_to_content(bounds, viewport));
    while controller.advance(0.05) {}

    for body in simulation.bodies() {
        let screen = controller.world_to_screen(viewport, body.position);
        assert!(viewport.expand(1.0).contains(screen));

        let anchor = Rect::from_center_size(screen, Vec2::splat(26.0));
        let size = vec2(220.0, 90.0);
        let top_left = place_tooltip(anchor, size, viewport);
        assert!(viewport.contains_rect(Rect::from_min_size(top_left, size)));
    }
}

#[test]
fn radial_tree_puts_subfield_leaves_on_the_outer_ring() {
    let domain = HierarchyNode::new("domains/3", "Physical Sciences").with_children(vec![
        HierarchyNode::new("fields/17", "Computer Science").with_children(vec![
            HierarchyNode::new("subfields/1702", "Artificial Intelligence"),
            HierarchyNode::new("subfields/1705", "Computer Networks"),
        ]),
        HierarchyNode::new("fields/31", "Physics").with_children(vec![HierarchyNode::new(
            "subfields/3107",
            "Atomic Physics",
        )]),
    ]);
    let config = RadialConfig::for_viewport(1200.0, 900.0);

    let layout = radial_layout(&domain, config);
    let again = radial_layout(&domain, config);

    assert_eq!(layout, again);
    assert_eq!(layout.nodes.len(), 6);
    assert_eq!(layout.links.len(), 5);
    assert_eq!(layout.position(0), Vec2::ZERO);
    for node in layout.nodes.iter().filter(|node| node.is_leaf()) {
        assert!((node.radius - config.drawing_radius()).abs() < 1e-3);
    }

    let center = pos2(600.0, 450.0);
    for index in 0..layout.nodes.len() {
        let world = layout.position(index);
        assert!(world.length() <= config.size * 0.5);
        assert!((center + world).x.is_finite());
    }
}
