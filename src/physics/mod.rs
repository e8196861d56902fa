mod forces;
mod quadtree;

use std::f32::consts::PI;

use eframe::egui::{Rect, Vec2, vec2};
use log::debug;

use forces::{
    LinkParams, accumulate_charge, apply_centering, apply_links, collect_close_pairs,
    separate_pairs,
};
use quadtree::QuadNode;

pub const SETTLE_ITERATIONS: usize = 120;

const INITIAL_RADIUS: f32 = 10.0;
const DRAG_ALPHA_TARGET: f32 = 0.3;
const ALPHA_DECAY_STEPS: f32 = 300.0;
/// Upper bound on collision passes inside one step.
const STEP_COLLISION_PASSES: usize = 16;
/// Upper bound on the cleanup passes once a layout comes to rest.
const REST_COLLISION_PASSES: usize = 500;
/// Overlap still accepted, as a share of the minimum distance.
const COLLISION_TOLERANCE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set while the user drags the node; wins over the simulated position.
    pub pinned: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub center: Vec2,
    pub charge: bool,
    pub charge_strength: f32,
    pub theta: f32,
    pub links: bool,
    pub link_distance: f32,
    pub centering: bool,
    pub collision: bool,
    pub node_radius: f32,
    pub collision_padding: f32,
    pub collision_iterations: usize,
    pub velocity_decay: f32,
    pub alpha_min: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            charge: true,
            charge_strength: -20.0,
            theta: 0.9,
            links: true,
            link_distance: 100.0,
            centering: true,
            collision: true,
            node_radius: 13.0,
            collision_padding: 27.0,
            collision_iterations: 2,
            velocity_decay: 0.4,
            alpha_min: 0.001,
        }
    }
}

impl SimulationConfig {
    pub fn collision_radius(&self) -> f32 {
        self.node_radius + self.collision_padding
    }
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    pairs: Vec<(usize, usize)>,
}

pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Body>,
    links: Vec<LinkParams>,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    running: bool,
    scratch: Scratch,
}

impl Simulation {
    /// Bodies start on a phyllotaxis spiral around the configured center.
    pub fn new(node_count: usize, edges: &[(usize, usize)], config: SimulationConfig) -> Self {
        let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
        let bodies = (0..node_count)
            .map(|index| {
                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * golden_angle;
                Body {
                    position: config.center + vec2(angle.cos(), angle.sin()) * radius,
                    velocity: Vec2::ZERO,
                    pinned: None,
                }
            })
            .collect();

        let mut degree = vec![0usize; node_count];
        let valid_edges = edges
            .iter()
            .copied()
            .filter(|&(source, target)| {
                source < node_count && target < node_count && source != target
            })
            .collect::<Vec<_>>();
        for &(source, target) in &valid_edges {
            degree[source] += 1;
            degree[target] += 1;
        }

        let links = valid_edges
            .into_iter()
            .map(|(source, target)| {
                let source_degree = degree[source] as f32;
                let target_degree = degree[target] as f32;
                LinkParams {
                    source,
                    target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        Self {
            alpha_decay: 1.0 - config.alpha_min.powf(1.0 / ALPHA_DECAY_STEPS),
            config,
            bodies,
            links,
            alpha: 1.0,
            alpha_target: 0.0,
            running: node_count > 0,
            scratch: Scratch::default(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.bodies.get(index).map(|body| body.position)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// One relaxation step: charge, links, integration + centering, collisions.
    pub fn step(&mut self) {
        if self.bodies.is_empty() {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;
        let config = self.config;

        if config.charge && config.charge_strength != 0.0 {
            self.apply_charge(config.charge_strength * alpha, config.theta);
        }

        if config.links {
            apply_links(&mut self.bodies, &self.links, config.link_distance, alpha);
        }

        let keep = 1.0 - config.velocity_decay;
        for body in &mut self.bodies {
            if let Some(pinned) = body.pinned {
                body.position = pinned;
                body.velocity = Vec2::ZERO;
            } else {
                body.velocity *= keep;
                body.position += body.velocity;
            }
        }

        if config.centering {
            apply_centering(&mut self.bodies, config.center);
        }

        self.resolve_collisions(config.collision_iterations, STEP_COLLISION_PASSES);
    }

    fn refresh_positions(&mut self) {
        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.bodies.iter().map(|body| body.position));
    }

    fn apply_charge(&mut self, strength: f32, theta: f32) {
        self.refresh_positions();
        let Some(tree) = QuadNode::build(&self.scratch.positions) else {
            return;
        };

        for (index, body) in self.bodies.iter_mut().enumerate() {
            accumulate_charge(
                &tree,
                index,
                &self.scratch.positions,
                strength,
                theta,
                &mut body.velocity,
            );
        }
    }

    /// Relaxes overlaps for at least `min_passes`, then until none is left or `max_passes` ran.
    fn resolve_collisions(&mut self, min_passes: usize, max_passes: usize) {
        if !self.config.collision || self.config.collision_radius() <= 0.0 {
            return;
        }
        let min_distance = self.config.collision_radius() * 2.0;
        let tolerance = min_distance * COLLISION_TOLERANCE;

        for pass in 0..max_passes.max(1) {
            self.refresh_positions();
            let Some(tree) = QuadNode::build(&self.scratch.positions) else {
                return;
            };

            self.scratch.pairs.clear();
            collect_close_pairs(
                &tree,
                &tree,
                true,
                min_distance * min_distance,
                &mut self.scratch.pairs,
            );
            let worst = separate_pairs(&mut self.bodies, &self.scratch.pairs, min_distance);
            if pass + 1 >= min_passes && worst <= tolerance {
                return;
            }
        }
        debug!("collisions left unresolved after {max_passes} passes");
    }

    /// Synchronous fixed-budget run used before the first paint.
    pub fn settle(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
        self.resolve_collisions(1, REST_COLLISION_PASSES);
        debug!(
            "settled {} bodies in {iterations} steps, alpha {:.4}",
            self.bodies.len(),
            self.alpha
        );
    }

    /// Per-frame entry point. Returns whether another frame is wanted.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.step();
        if self.alpha < self.config.alpha_min {
            self.running = false;
            self.resolve_collisions(1, REST_COLLISION_PASSES);
        }
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reheat(&mut self) {
        self.alpha_target = DRAG_ALPHA_TARGET;
        self.running = !self.bodies.is_empty();
    }

    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.pinned = Some(position);
            body.position = position;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.pinned = None;
        }
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.bodies
            .get(index)
            .is_some_and(|body| body.pinned.is_some())
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = self.bodies.first()?.position;
        let rect = self
            .bodies
            .iter()
            .fold(Rect::from_min_max(first.to_pos2(), first.to_pos2()), |rect, body| {
                rect.union(Rect::from_min_max(
                    body.position.to_pos2(),
                    body.position.to_pos2(),
                ))
            });
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(count: usize) -> Vec<(usize, usize)> {
        (0..count).map(|index| (index, (index + 1) % count)).collect()
    }

    fn centroid(simulation: &Simulation) -> Vec2 {
        simulation
            .bodies()
            .iter()
            .fold(Vec2::ZERO, |sum, body| sum + body.position)
            / simulation.bodies().len() as f32
    }

    #[test]
    fn empty_simulation_is_a_no_op() {
        let mut simulation = Simulation::new(0, &[], SimulationConfig::default());
        simulation.settle(SETTLE_ITERATIONS);

        assert!(simulation.bodies().is_empty());
        assert!(!simulation.tick());
        assert!(simulation.bounds().is_none());
    }

    #[test]
    fn centering_alone_moves_centroid_to_center() {
        let config = SimulationConfig {
            center: vec2(400.0, 300.0),
            charge: false,
            links: false,
            collision: false,
            ..SimulationConfig::default()
        };
        let mut simulation = Simulation::new(17, &[], config);
        simulation.settle(SETTLE_ITERATIONS);

        assert!((centroid(&simulation) - config.center).length() < 1e-2);
    }

    fn star(count: usize) -> Vec<(usize, usize)> {
        (1..count).map(|leaf| (leaf, 0)).collect()
    }

    fn assert_no_overlap(simulation: &Simulation) {
        let min_distance = simulation.config().collision_radius() * 2.0;
        let bodies = simulation.bodies();
        for first in 0..bodies.len() {
            for second in (first + 1)..bodies.len() {
                let distance = (bodies[first].position - bodies[second].position).length();
                assert!(
                    distance >= min_distance * 0.95,
                    "bodies {first} and {second} overlap: {distance}"
                );
            }
        }
    }

    #[test]
    fn settled_nodes_do_not_overlap() {
        let mut simulation = Simulation::new(24, &ring(24), SimulationConfig::default());
        simulation.settle(SETTLE_ITERATIONS);

        assert_no_overlap(&simulation);
    }

    #[test]
    fn settled_star_does_not_overlap() {
        let mut simulation = Simulation::new(150, &star(150), SimulationConfig::default());
        simulation.settle(SETTLE_ITERATIONS);

        assert_no_overlap(&simulation);
    }

    #[test]
    fn settled_dense_graph_does_not_overlap() {
        let count = 200;
        let edges = (0..count)
            .flat_map(|index| {
                [7, 13, 31].map(|step| (index, (index * step + step / 2) % count))
            })
            .collect::<Vec<_>>();
        let mut simulation = Simulation::new(count, &edges, SimulationConfig::default());
        simulation.settle(SETTLE_ITERATIONS);

        assert_no_overlap(&simulation);
    }

    #[test]
    fn cooled_live_layout_does_not_overlap() {
        let mut simulation = Simulation::new(100, &star(100), SimulationConfig::default());
        let mut frames = 0;
        while simulation.tick() {
            frames += 1;
            assert!(frames < 10_000, "simulation never cooled");
        }

        assert_no_overlap(&simulation);
    }

    #[test]
    fn isolated_nodes_still_get_finite_positions() {
        let mut simulation = Simulation::new(5, &[], SimulationConfig::default());
        simulation.settle(SETTLE_ITERATIONS);

        for body in simulation.bodies() {
            assert!(body.position.x.is_finite() && body.position.y.is_finite());
        }
    }

    #[test]
    fn pinned_body_keeps_its_position() {
        let mut simulation = Simulation::new(6, &ring(6), SimulationConfig::default());
        simulation.pin(2, vec2(500.0, -40.0));
        simulation.settle(30);

        assert_eq!(simulation.position(2), Some(vec2(500.0, -40.0)));
        simulation.unpin(2);
        assert!(!simulation.is_pinned(2));
    }

    #[test]
    fn ticking_stops_once_alpha_cools() {
        let mut simulation = Simulation::new(3, &ring(3), SimulationConfig::default());
        let mut frames = 0;
        while simulation.tick() {
            frames += 1;
            assert!(frames < 1_000, "simulation never cooled");
        }

        assert!(simulation.alpha() < simulation.config().alpha_min);
        assert!(!simulation.is_running());
    }

    #[test]
    fn reheat_restarts_a_stopped_simulation() {
        let mut simulation = Simulation::new(3, &ring(3), SimulationConfig::default());
        simulation.stop();
        assert!(!simulation.tick());

        simulation.reheat();
        assert!(simulation.tick());
        simulation.cool();
        assert!(simulation.is_running());
    }

    #[test]
    fn invalid_edges_are_ignored() {
        let simulation = Simulation::new(3, &[(0, 0), (0, 7), (1, 2)], SimulationConfig::default());
        assert_eq!(simulation.link_count(), 1);
    }
}
