use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::render_utils::circle_visible;
use super::{MIN_HIT_RADIUS, NODE_RADIUS, WorksGraphView};

impl WorksGraphView {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = response.hover_pos().unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.viewport.zoom_at(pointer, zoom_factor, rect);
    }

    pub(in crate::app) fn update_screen_space(&mut self, rect: Rect) {
        let transform = self.viewport.transform();
        self.scratch.screen_radius = NODE_RADIUS * transform.scale;

        self.scratch.screen_positions.clear();
        self.scratch.screen_positions.extend(
            self.simulation
                .bodies()
                .iter()
                .map(|body| transform.world_to_screen(rect, body.position)),
        );

        let radius = self.scratch.screen_radius;
        self.scratch.visible_mask.clear();
        self.scratch.visible_mask.extend(
            self.scratch
                .screen_positions
                .iter()
                .map(|position| circle_visible(rect, *position, radius)),
        );
    }

    pub(in crate::app) fn node_at(&self, pointer: Option<Pos2>) -> Option<usize> {
        let pointer = pointer?;
        let hit_radius = self.scratch.screen_radius.max(MIN_HIT_RADIUS);
        self.scratch
            .screen_positions
            .iter()
            .enumerate()
            .filter(|(index, _)| self.scratch.visible_mask.get(*index).copied().unwrap_or(false))
            .filter_map(|(index, position)| {
                let distance = position.distance(pointer);
                (distance <= hit_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Node drag pins the body and reheats the layout; background drag pans.
    pub(in crate::app) fn handle_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let hovered = if self.dragging.is_some() {
            self.dragging
        } else {
            self.node_at(response.hover_pos())
        };
        self.interaction.hover(hovered);

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.dragging.is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let press_origin = ui.input(|input| input.pointer.press_origin());
            if let Some(index) = self.node_at(press_origin) {
                self.dragging = Some(index);
                self.simulation
                    .pin(index, self.simulation.position(index).unwrap_or_default());
                self.simulation.reheat();
            }
        }

        if let Some(index) = self.dragging {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let world = self.viewport.screen_to_world(rect, pointer);
                self.simulation.pin(index, world);
            }
        } else if response.dragged() {
            self.viewport.pan_by(response.drag_delta());
        }

        if response.drag_stopped()
            && let Some(index) = self.dragging.take()
        {
            self.simulation.unpin(index);
            self.simulation.cool();
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            match hovered {
                Some(index) => self.interaction.click(index),
                None => self.interaction.click_outside(),
            }
        }

        self.refresh_partition();
    }
}
