use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::Body;
use super::quadtree::QuadNode;

const MIN_DISTANCE_SQ: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
pub(super) struct LinkParams {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

/// Deterministic stand-in direction for coincident points.
pub(super) fn jiggle(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

fn charge_from(point: Vec2, other: Vec2, weight: f32, strength: f32, jitter: (usize, usize)) -> Vec2 {
    let mut delta = other - point;
    if delta.length_sq() <= f32::EPSILON {
        delta = jiggle(jitter.0, jitter.1);
    }
    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    delta * (strength * weight / distance_sq)
}

/// Adds the many-body velocity change for `index`. `strength` already carries alpha.
pub(super) fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    velocity: &mut Vec2,
) {
    if node.count == 0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            *velocity += charge_from(point, positions[other], 1.0, strength, (index, other));
        }
        return;
    }

    let distance_sq = (node.center_of_mass - point).length_sq();
    let far_enough = !node.bounds.contains(point)
        && node.bounds.width() * node.bounds.width() < theta * theta * distance_sq;

    if far_enough {
        *velocity += charge_from(
            point,
            node.center_of_mass,
            node.count as f32,
            strength,
            (index, node.count),
        );
        return;
    }

    for child in node.children() {
        accumulate_charge(child, index, positions, strength, theta, velocity);
    }
}

/// Springs pull the predicted positions of both ends toward `distance`.
pub(super) fn apply_links(bodies: &mut [Body], links: &[LinkParams], distance: f32, alpha: f32) {
    for link in links {
        let source = bodies[link.source];
        let target = bodies[link.target];

        let mut delta =
            (target.position + target.velocity) - (source.position + source.velocity);
        if delta.length_sq() <= f32::EPSILON {
            delta = jiggle(link.source, link.target) * 1e-3;
        }
        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * link.strength);

        bodies[link.target].velocity -= correction * link.bias;
        bodies[link.source].velocity += correction * (1.0 - link.bias);
    }
}

/// Translates free bodies so the centroid of all bodies lands on `center`.
pub(super) fn apply_centering(bodies: &mut [Body], center: Vec2) {
    let free = bodies.iter().filter(|body| body.pinned.is_none()).count();
    if free == 0 {
        return;
    }

    let centroid = bodies
        .iter()
        .fold(Vec2::ZERO, |sum, body| sum + body.position)
        / bodies.len() as f32;
    let shift = (center - centroid) * (bodies.len() as f32 / free as f32);

    for body in bodies.iter_mut().filter(|body| body.pinned.is_none()) {
        body.position += shift;
    }
}

pub(super) fn collect_close_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    max_distance_sq: f32,
    pairs: &mut Vec<(usize, usize)>,
) {
    if node_a.bounds.gap_sq(node_b.bounds) > max_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    pairs.push((from, to));
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    pairs.push((from, to));
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (offset, child_a) in children.iter().enumerate() {
            collect_close_pairs(child_a, child_a, true, max_distance_sq, pairs);
            for child_b in &children[offset + 1..] {
                collect_close_pairs(child_a, child_b, false, max_distance_sq, pairs);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            collect_close_pairs(child, node_b, false, max_distance_sq, pairs);
        }
    } else {
        for child in node_b.children() {
            collect_close_pairs(node_a, child, false, max_distance_sq, pairs);
        }
    }
}

/// Pushes overlapping circles apart in place and drops the velocity that closes them.
/// Pinned bodies never move. Returns the largest overlap seen before correction.
pub(super) fn separate_pairs(bodies: &mut [Body], pairs: &[(usize, usize)], min_distance: f32) -> f32 {
    let mut worst = 0.0_f32;
    for &(first, second) in pairs {
        let delta = bodies[first].position - bodies[second].position;
        let distance = delta.length();
        if distance >= min_distance {
            continue;
        }

        let direction = if distance > 1e-4 {
            delta / distance
        } else {
            jiggle(first, second)
        };
        let overlap = min_distance - distance;
        if bodies[first].pinned.is_some() && bodies[second].pinned.is_some() {
            continue;
        }
        worst = worst.max(overlap);

        let closing = (bodies[first].velocity - bodies[second].velocity).dot(direction).min(0.0);
        match (bodies[first].pinned.is_some(), bodies[second].pinned.is_some()) {
            (false, false) => {
                bodies[first].position += direction * (overlap * 0.5);
                bodies[second].position -= direction * (overlap * 0.5);
                bodies[first].velocity -= direction * (closing * 0.5);
                bodies[second].velocity += direction * (closing * 0.5);
            }
            (true, false) => {
                bodies[second].position -= direction * overlap;
                bodies[second].velocity += direction * closing;
            }
            (false, true) => {
                bodies[first].position += direction * overlap;
                bodies[first].velocity -= direction * closing;
            }
            (true, true) => {}
        }
    }
    worst
}
