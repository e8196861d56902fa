use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, PI};

use eframe::egui::epaint::{CubicBezierShape, TextShape};
use eframe::egui::{self, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};
use openalex_graphs::HierarchyNode;
use openalex_graphs::layout::{RadialConfig, RadialLayout, label_is_flipped, radial_layout};
use openalex_graphs::view::{ScaleRange, ViewTransform, ViewportController};

use super::render_utils::{Palette, draw_background};

const NODE_RADIUS: f32 = 2.5;
const HOVER_RADIUS: f32 = 9.0;
const LABEL_OFFSET: f32 = 10.0;
const DIMMED: f32 = 0.2;

/// A clicked subfield together with the names of its ancestors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct SubfieldPick {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) field: Option<String>,
    pub(super) domain: Option<String>,
}

pub(super) struct RadialView {
    root: HierarchyNode,
    layout: RadialLayout,
    viewport: ViewportController,
    hovered: Option<usize>,
    lineage: HashSet<usize>,
    screen_positions: Vec<Pos2>,
}

impl RadialView {
    pub(super) fn new(root: HierarchyNode) -> Self {
        let layout = radial_layout(&root, RadialConfig::default());
        Self {
            root,
            layout,
            viewport: ViewportController::new(ScaleRange::RADIAL),
            hovered: None,
            lineage: HashSet::new(),
            screen_positions: Vec::new(),
        }
    }

    pub(super) fn root_id(&self) -> &str {
        &self.root.id
    }

    fn relayout(&mut self, rect: Rect) {
        let config = RadialConfig::for_viewport(rect.width(), rect.height());
        self.layout = radial_layout(&self.root, config);
        self.viewport.set_transform(ViewTransform {
            translate: rect.size() * 0.5,
            scale: 1.0,
        });
        self.set_hovered(None);
    }

    fn set_hovered(&mut self, hovered: Option<usize>) {
        if self.hovered == hovered {
            return;
        }
        self.hovered = hovered;
        self.lineage = hovered
            .map(|index| self.layout.lineage(index))
            .unwrap_or_default();
    }

    fn pick(&self, index: usize) -> Option<SubfieldPick> {
        let node = self.layout.nodes.get(index)?;
        if !node.is_leaf() || node.id.is_empty() || node.parent.is_none() {
            return None;
        }

        let field = node.parent.and_then(|parent| self.layout.nodes.get(parent));
        let domain = field
            .and_then(|field| field.parent)
            .and_then(|parent| self.layout.nodes.get(parent));
        Some(SubfieldPick {
            id: node.id.clone(),
            name: node.display_name.clone(),
            field: field.map(|field| field.display_name.clone()),
            domain: domain.map(|domain| domain.display_name.clone()),
        })
    }

    fn hovered_index(&self, pointer: Option<Pos2>) -> Option<usize> {
        let pointer = pointer?;
        self.screen_positions
            .iter()
            .enumerate()
            .map(|(index, position)| (index, position.distance(pointer)))
            .filter(|(_, distance)| *distance <= HOVER_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    fn handle_zoom_and_pan(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let pointer = response.hover_pos().unwrap_or_else(|| rect.center());
                let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
                self.viewport.zoom_at(pointer, factor, rect);
            }
        }

        if response.dragged() {
            self.viewport.pan_by(response.drag_delta());
        }
    }

    /// Draws the tree and returns the subfield leaf clicked this frame.
    pub(super) fn draw(&mut self, ui: &mut Ui) -> Option<SubfieldPick> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let palette = Palette::for_visuals(ui.visuals());

        if self.viewport.observe_viewport(rect.size()) {
            self.relayout(rect);
        }

        self.handle_zoom_and_pan(ui, rect, &response);
        let dt = ui.input(|input| input.stable_dt);
        if self.viewport.advance(dt) {
            ui.ctx().request_repaint();
        }

        let transform = self.viewport.transform();
        draw_background(&painter, rect, transform, &palette);

        if self.layout.is_empty() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No fields in this domain",
                FontId::proportional(16.0),
                palette.text,
            );
            return None;
        }

        self.screen_positions.clear();
        self.screen_positions.extend(
            (0..self.layout.nodes.len())
                .map(|index| transform.world_to_screen(rect, self.layout.position(index))),
        );

        let hovered = self.hovered_index(response.hover_pos());
        self.set_hovered(hovered);
        if hovered.is_some_and(|index| self.layout.nodes[index].is_leaf()) {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        self.draw_links(&painter, rect, transform, &palette);
        self.draw_nodes(&painter, &palette);
        self.draw_labels(&painter, transform, &palette);

        if response.clicked() {
            return hovered.and_then(|index| self.pick(index));
        }
        None
    }

    fn opacity(&self, index: usize) -> f32 {
        if self.hovered.is_none() || self.lineage.contains(&index) {
            1.0
        } else {
            DIMMED
        }
    }

    fn draw_links(&self, painter: &egui::Painter, rect: Rect, transform: ViewTransform, palette: &Palette) {
        for &(parent, child) in &self.layout.links {
            let in_lineage = self.lineage.contains(&parent) && self.lineage.contains(&child);
            let (color, width) = if in_lineage {
                (palette.accent, 3.0)
            } else if self.hovered.is_some() {
                (palette.link.gamma_multiply(DIMMED), 1.5)
            } else {
                (palette.link, 1.5)
            };

            let points = self
                .layout
                .link_curve(parent, child)
                .map(|world| transform.world_to_screen(rect, world));
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new(width, color),
            ));
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, palette: &Palette) {
        for (index, node) in self.layout.nodes.iter().enumerate() {
            let base = if self.lineage.contains(&index) {
                palette.accent
            } else if node.is_leaf() {
                palette.leaf_node
            } else {
                palette.internal_node
            };
            painter.circle_filled(
                self.screen_positions[index],
                NODE_RADIUS,
                base.gamma_multiply(self.opacity(index)),
            );
        }
    }

    fn draw_labels(&self, painter: &egui::Painter, transform: ViewTransform, palette: &Palette) {
        let font = FontId::proportional((12.0 * transform.scale.sqrt()).clamp(9.0, 22.0));

        for (index, node) in self.layout.nodes.iter().enumerate() {
            if node.display_name.is_empty() {
                continue;
            }

            let color = if self.lineage.contains(&index) {
                palette.accent
            } else {
                palette.text.gamma_multiply(self.opacity(index))
            };
            let galley = painter.layout_no_wrap(node.display_name.clone(), font.clone(), color);
            let size = galley.size();

            let flipped = label_is_flipped(node.angle);
            let rotation = node.angle - FRAC_PI_2 + if flipped { PI } else { 0.0 };
            let along = vec2(rotation.cos(), rotation.sin());
            let across = vec2(-rotation.sin(), rotation.cos());

            // Leaves label outward, internal nodes inward, whichever side they are on.
            let starts_at_anchor = flipped != node.is_leaf();
            let offset = if starts_at_anchor { LABEL_OFFSET } else { -LABEL_OFFSET };
            let anchor = self.screen_positions[index] + along * offset;
            let top_left = if starts_at_anchor {
                anchor - across * (size.y * 0.5)
            } else {
                anchor - along * size.x - across * (size.y * 0.5)
            };

            painter.add(TextShape::new(top_left, galley, color).with_angle(rotation));
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Vec2;

    use super::*;

    fn tree() -> HierarchyNode {
        HierarchyNode::new("domains/3", "Physical Sciences").with_children(vec![
            HierarchyNode::new("fields/31", "Physics").with_children(vec![
                HierarchyNode::new("subfields/3107", "Optics"),
            ]),
        ])
    }

    #[test]
    fn clicking_a_leaf_names_its_ancestors() {
        let view = RadialView::new(tree());
        let leaf = view
            .layout
            .index_of("subfields/3107")
            .expect("leaf is laid out");

        assert_eq!(
            view.pick(leaf),
            Some(SubfieldPick {
                id: "subfields/3107".to_owned(),
                name: "Optics".to_owned(),
                field: Some("Physics".to_owned()),
                domain: Some("Physical Sciences".to_owned()),
            })
        );
        assert_eq!(view.pick(0), None);
    }

    #[test]
    fn hovering_caches_the_lineage() {
        let mut view = RadialView::new(tree());
        view.set_hovered(Some(1));
        assert_eq!(view.lineage.len(), 3);
        assert_eq!(view.opacity(2), 1.0);

        view.set_hovered(None);
        assert!(view.lineage.is_empty());
    }

    #[test]
    fn hover_hits_nearest_node_within_reach() {
        let mut view = RadialView::new(tree());
        view.screen_positions = vec![Pos2::new(0.0, 0.0), Pos2::new(20.0, 0.0)];
        assert_eq!(view.hovered_index(Some(Pos2::new(18.0, 2.0))), Some(1));
        assert_eq!(view.hovered_index(Some(Pos2::new(10.0, 0.0))), None);
        assert_eq!(view.hovered_index(None), None);
    }

    #[test]
    fn relayout_centers_the_tree() {
        let mut view = RadialView::new(tree());
        let rect = Rect::from_min_size(Pos2::new(0.0, 40.0), Vec2::new(1000.0, 800.0));
        view.relayout(rect);

        assert_eq!(view.viewport.transform().translate, vec2(500.0, 400.0));
        assert_eq!(view.viewport.transform().world_to_screen(rect, Vec2::ZERO), rect.center());
    }
}
