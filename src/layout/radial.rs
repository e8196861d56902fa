use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use eframe::egui::{Vec2, vec2};

use crate::openalex::HierarchyNode;

const SAME_PARENT_SEPARATION: f32 = 1.0;
const COUSIN_SEPARATION: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialConfig {
    /// Side of the square drawing area in world units.
    pub size: f32,
    /// Room kept free outside the outermost ring for labels.
    pub label_margin: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            size: 2400.0,
            label_margin: 360.0,
        }
    }
}

impl RadialConfig {
    pub fn drawing_radius(&self) -> f32 {
        (self.size * 0.5 - self.label_margin).max(0.0)
    }

    /// Fills the smaller side of a viewport, shrinking the label margin on small screens.
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let defaults = Self::default();
        let size = width.min(height).max(0.0);
        Self {
            size,
            label_margin: defaults.label_margin.min(size * 0.3),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialNode {
    pub id: String,
    pub display_name: String,
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub angle: f32,
    pub radius: f32,
}

impl RadialNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadialLayout {
    /// Pre-order; index 0 is the root when the layout is not empty.
    pub nodes: Vec<RadialNode>,
    pub links: Vec<(usize, usize)>,
    pub angular_unit: f32,
    pub max_depth: usize,
}

pub fn radial_layout(root: &HierarchyNode, config: RadialConfig) -> RadialLayout {
    let mut nodes = Vec::with_capacity(root.node_count());
    flatten(root, 0, None, &mut nodes);

    let mut links = Vec::with_capacity(nodes.len().saturating_sub(1));
    for (index, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent {
            links.push((parent, index));
        }
    }

    let leaves = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_leaf())
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let separation = |a: usize, b: usize| {
        if nodes[a].parent == nodes[b].parent {
            SAME_PARENT_SEPARATION
        } else {
            COUSIN_SEPARATION
        }
    };

    let mut offsets = Vec::with_capacity(leaves.len());
    let mut cursor = 0.0_f32;
    for (position, &leaf) in leaves.iter().enumerate() {
        if position > 0 {
            cursor += separation(leaves[position - 1], leaf);
        }
        offsets.push(cursor);
    }

    let (Some(&first), Some(&last)) = (leaves.first(), leaves.last()) else {
        return RadialLayout::default();
    };
    let wrap_gap = separation(last, first);
    let total = cursor + wrap_gap;
    let angular_unit = TAU / total;

    for (&leaf, offset) in leaves.iter().zip(offsets) {
        nodes[leaf].angle = (offset + wrap_gap * 0.5) * angular_unit;
    }

    for index in (0..nodes.len()).rev() {
        if nodes[index].is_leaf() {
            continue;
        }
        let sum = nodes[index]
            .children
            .iter()
            .map(|&child| nodes[child].angle)
            .sum::<f32>();
        nodes[index].angle = sum / nodes[index].children.len() as f32;
    }

    let max_depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0);
    let drawing_radius = config.drawing_radius();
    for node in &mut nodes {
        node.radius = if max_depth == 0 {
            0.0
        } else {
            node.depth as f32 / max_depth as f32 * drawing_radius
        };
    }

    RadialLayout {
        nodes,
        links,
        angular_unit,
        max_depth,
    }
}

fn flatten(
    node: &HierarchyNode,
    depth: usize,
    parent: Option<usize>,
    out: &mut Vec<RadialNode>,
) -> usize {
    let index = out.len();
    out.push(RadialNode {
        id: node.id.clone(),
        display_name: node.display_name.clone(),
        depth,
        parent,
        children: Vec::with_capacity(node.children.len()),
        angle: 0.0,
        radius: 0.0,
    });

    let mut children = node.children.iter().collect::<Vec<_>>();
    children.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.id.cmp(&b.id))
    });

    for child in children {
        let child_index = flatten(child, depth + 1, Some(index), out);
        out[index].children.push(child_index);
    }

    index
}

/// Angle 0 points up and grows clockwise in screen space.
pub fn polar_to_cartesian(angle: f32, radius: f32) -> Vec2 {
    let rotated = angle - FRAC_PI_2;
    vec2(rotated.cos(), rotated.sin()) * radius
}

/// Labels on the left half are flipped so they read left to right.
pub fn label_is_flipped(angle: f32) -> bool {
    angle >= PI
}

impl RadialLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec2 {
        self.nodes
            .get(index)
            .map(|node| polar_to_cartesian(node.angle, node.radius))
            .unwrap_or(Vec2::ZERO)
    }

    /// Control points of the radial bump curve from `parent` to `child`.
    pub fn link_curve(&self, parent: usize, child: usize) -> [Vec2; 4] {
        let (Some(source), Some(target)) = (self.nodes.get(parent), self.nodes.get(child)) else {
            return [Vec2::ZERO; 4];
        };
        let middle = (source.radius + target.radius) * 0.5;
        [
            polar_to_cartesian(source.angle, source.radius),
            polar_to_cartesian(source.angle, middle),
            polar_to_cartesian(target.angle, middle),
            polar_to_cartesian(target.angle, target.radius),
        ]
    }

    /// Ancestors up to the root plus every descendant of `index`.
    pub fn lineage(&self, index: usize) -> HashSet<usize> {
        let mut related = HashSet::new();
        if index >= self.nodes.len() {
            return related;
        }

        let mut cursor = Some(index);
        while let Some(current) = cursor {
            related.insert(current);
            cursor = self.nodes[current].parent;
        }

        let mut stack = self.nodes[index].children.clone();
        while let Some(current) = stack.pop() {
            if related.insert(current) {
                stack.extend(self.nodes[current].children.iter().copied());
            }
        }

        related
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }
}
