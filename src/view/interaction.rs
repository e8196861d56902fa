use std::collections::HashSet;

use eframe::egui::Color32;

pub const REFERENCE_EDGE_COLOR: Color32 = Color32::from_rgb(0xbd, 0x93, 0x61);
pub const CITATION_EDGE_COLOR: Color32 = Color32::from_rgb(0x26, 0xa6, 0x9a);
pub const DIMMED_OPACITY: f32 = 0.15;

/// Click selection plus the node under the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    active: Option<usize>,
    hovered: Option<usize>,
}

impl InteractionState {
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Hover wins while the pointer is over a node, otherwise the selection.
    pub fn focus(&self) -> Option<usize> {
        self.hovered.or(self.active)
    }

    pub fn is_idle(&self) -> bool {
        self.focus().is_none()
    }

    pub fn hover(&mut self, node: Option<usize>) {
        self.hovered = node;
    }

    pub fn click(&mut self, node: usize) {
        if self.active == Some(node) {
            self.active = None;
        } else {
            self.active = Some(node);
        }
    }

    pub fn click_outside(&mut self) {
        self.active = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// Nothing is focused.
    Idle,
    Active,
    Neighbor,
    Dimmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRole {
    Idle,
    /// Focus is the source: the focused work references the target.
    Outgoing,
    /// Focus is the target: the source cites the focused work.
    Incoming,
    Dimmed,
}

impl NodeRole {
    pub fn opacity(self) -> f32 {
        match self {
            Self::Dimmed => DIMMED_OPACITY,
            _ => 1.0,
        }
    }
}

impl EdgeRole {
    pub fn color(self, base: Color32) -> Color32 {
        match self {
            Self::Idle => base,
            Self::Outgoing => REFERENCE_EDGE_COLOR,
            Self::Incoming => CITATION_EDGE_COLOR,
            Self::Dimmed => base.gamma_multiply(DIMMED_OPACITY),
        }
    }

    pub fn is_highlighted(self) -> bool {
        matches!(self, Self::Outgoing | Self::Incoming)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HighlightPartition {
    pub focus: Option<usize>,
    pub nodes: Vec<NodeRole>,
    pub edges: Vec<EdgeRole>,
    pub outgoing: HashSet<usize>,
    pub incoming: HashSet<usize>,
}

impl HighlightPartition {
    pub fn idle(node_count: usize, edge_count: usize) -> Self {
        Self {
            focus: None,
            nodes: vec![NodeRole::Idle; node_count],
            edges: vec![EdgeRole::Idle; edge_count],
            outgoing: HashSet::new(),
            incoming: HashSet::new(),
        }
    }

    pub fn compute(focus: Option<usize>, edges: &[(usize, usize)], node_count: usize) -> Self {
        let Some(focus) = focus.filter(|&index| index < node_count) else {
            return Self::idle(node_count, edges.len());
        };

        let mut outgoing = HashSet::new();
        let mut incoming = HashSet::new();
        let edge_roles = edges
            .iter()
            .map(|&(source, target)| {
                if source == focus && target != focus {
                    outgoing.insert(target);
                    EdgeRole::Outgoing
                } else if target == focus && source != focus {
                    incoming.insert(source);
                    EdgeRole::Incoming
                } else {
                    EdgeRole::Dimmed
                }
            })
            .collect();

        let nodes = (0..node_count)
            .map(|index| {
                if index == focus {
                    NodeRole::Active
                } else if outgoing.contains(&index) || incoming.contains(&index) {
                    NodeRole::Neighbor
                } else {
                    NodeRole::Dimmed
                }
            })
            .collect();

        Self {
            focus: Some(focus),
            nodes,
            edges: edge_roles,
            outgoing,
            incoming,
        }
    }

    pub fn node(&self, index: usize) -> NodeRole {
        self.nodes.get(index).copied().unwrap_or(NodeRole::Idle)
    }

    pub fn edge(&self, index: usize) -> EdgeRole {
        self.edges.get(index).copied().unwrap_or(EdgeRole::Idle)
    }

    pub fn neighbor_count(&self) -> usize {
        self.outgoing.union(&self.incoming).count()
    }
}
