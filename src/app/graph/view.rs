use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};
use openalex_graphs::view::{EdgeRole, NodeRole};

use super::super::render_utils::{
    Palette, blend_color, draw_background, draw_directed_edge, draw_tooltip, edge_visible,
};
use super::WorksGraphView;
use super::build::tooltip_lines;

const DEFAULT_EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(92, 92, 92, 153);

impl WorksGraphView {
    pub(in crate::app) fn draw(&mut self, ui: &mut Ui) {
        let toolbar = self.draw_toolbar(ui);

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let palette = Palette::for_visuals(ui.visuals());

        if self.viewport.observe_viewport(rect.size()) {
            self.needs_fit = true;
        }
        if self.needs_fit
            && let Some(bounds) = self.simulation.bounds()
            && self.viewport.fit_to_content(bounds, rect)
        {
            self.needs_fit = false;
        }
        if let Some(action) = toolbar {
            self.apply_toolbar(action, rect);
        }

        self.handle_graph_zoom(ui, rect, &response);
        let dt = ui.input(|input| input.stable_dt).min(0.1);
        let mut animating = self.viewport.advance(dt);

        self.update_screen_space(rect);
        self.handle_pointer(ui, rect, &response);

        animating |= self.simulation.tick();
        if animating || self.dragging.is_some() {
            ui.ctx().request_repaint();
        }

        self.update_screen_space(rect);
        draw_background(&painter, rect, self.viewport.transform(), &palette);

        if self.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No works found for this topic",
                FontId::proportional(16.0),
                palette.text,
            );
            return;
        }

        self.draw_edges(&painter, rect);
        self.draw_nodes(&painter, &palette);
        self.draw_legends(&painter, rect, &palette);

        if let Some(target) = self.tooltip_target()
            && let (Some(position), Some(work)) = (
                self.scratch.screen_positions.get(target).copied(),
                self.graph.nodes.get(target),
            )
        {
            let radius = self.scratch.screen_radius;
            let anchor = Rect::from_center_size(position, vec2(radius, radius) * 2.0);
            draw_tooltip(&painter, anchor, rect, &tooltip_lines(work), &palette);
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, rect: Rect) {
        let positions = &self.scratch.screen_positions;
        let radius = self.scratch.screen_radius;
        let scale_width = self.viewport.transform().scale.sqrt().clamp(0.6, 2.0);

        // Highlighted edges last so they sit on top of dimmed ones.
        for highlighted_pass in [false, true] {
            for (edge_index, &(source, target)) in self.graph.edges.iter().enumerate() {
                let role = self.partition.edge(edge_index);
                if role.is_highlighted() != highlighted_pass {
                    continue;
                }

                let (Some(&start), Some(&end)) = (positions.get(source), positions.get(target))
                else {
                    continue;
                };
                if !edge_visible(rect, start, end, radius) {
                    continue;
                }

                let width = match role {
                    EdgeRole::Outgoing | EdgeRole::Incoming => 2.0,
                    _ => 1.5,
                } * scale_width;
                let color = role.color(DEFAULT_EDGE_COLOR);
                draw_directed_edge(painter, start, end, radius, Stroke::new(width, color));
            }
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, palette: &Palette) {
        let radius = self.scratch.screen_radius;

        for (index, work) in self.graph.nodes.iter().enumerate() {
            if !self.scratch.visible_mask.get(index).copied().unwrap_or(false) {
                continue;
            }

            let position = self.scratch.screen_positions[index];
            let role = self.partition.node(index);
            let mut fill = work.work_type.color();
            if role == NodeRole::Active {
                fill = blend_color(fill, Color32::WHITE, 0.15);
            }
            let opacity = role.opacity();

            painter.circle_filled(position, radius, fill.gamma_multiply(opacity));
            let outline_width = if role == NodeRole::Active { 3.0 } else { 1.5 };
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(outline_width, palette.node_outline.gamma_multiply(opacity)),
            );
            if self.simulation.is_pinned(index) {
                painter.circle_stroke(
                    position,
                    radius + 3.0,
                    Stroke::new(1.0, palette.accent.gamma_multiply(opacity)),
                );
            }
        }
    }
}
