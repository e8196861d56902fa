use eframe::egui::{self, Align2, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Ui, pos2, vec2};
use openalex_graphs::color::WorkType;
use openalex_graphs::view::{CITATION_EDGE_COLOR, REFERENCE_EDGE_COLOR};
use openalex_graphs::view::viewport::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

use super::super::render_utils::Palette;
use super::{ToolbarAction, WorksGraphView};

const LEGEND_MARGIN: f32 = 12.0;
const LEGEND_PADDING: f32 = 10.0;
const ROW_HEIGHT: f32 = 20.0;
const LEGEND_WIDTH: f32 = 190.0;

impl WorksGraphView {
    pub(in crate::app) fn draw_toolbar(&self, ui: &mut Ui) -> Option<ToolbarAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.heading(format!("Top {} Works", self.work_count()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Fit").on_hover_text("Fit the graph to the view").clicked() {
                    action = Some(ToolbarAction::Fit);
                }
                if ui.button("-").on_hover_text("Zoom out").clicked() {
                    action = Some(ToolbarAction::ZoomOut);
                }
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    action = Some(ToolbarAction::ZoomIn);
                }
            });
        });
        action
    }

    pub(in crate::app) fn apply_toolbar(&mut self, action: ToolbarAction, rect: Rect) {
        match action {
            ToolbarAction::ZoomIn => self.viewport.zoom_by(ZOOM_IN_FACTOR, rect),
            ToolbarAction::ZoomOut => self.viewport.zoom_by(ZOOM_OUT_FACTOR, rect),
            ToolbarAction::Fit => {
                if let Some(bounds) = self.simulation.bounds() {
                    self.viewport.fit_to_content(bounds, rect);
                }
            }
        }
    }

    pub(in crate::app) fn draw_legends(&self, painter: &Painter, rect: Rect, palette: &Palette) {
        let types_top = rect.top() + LEGEND_MARGIN;
        let types = legend_box(
            painter,
            pos2(rect.right() - LEGEND_MARGIN - LEGEND_WIDTH, types_top),
            "Work Types",
            WorkType::ALL.len(),
            palette,
        );
        for (row, work_type) in WorkType::ALL.iter().enumerate() {
            let center = row_anchor(types, row);
            painter.circle_filled(center, 6.0, work_type.color());
            painter.circle_stroke(center, 6.0, Stroke::new(1.0, palette.node_outline));
            legend_label(painter, center, work_type.legend_label(), palette);
        }

        let connections = legend_box(
            painter,
            pos2(types.left(), types.bottom() + LEGEND_MARGIN),
            "Connection Types",
            2,
            palette,
        );
        for (row, (label, color)) in [("Reference", REFERENCE_EDGE_COLOR), ("Citation", CITATION_EDGE_COLOR)]
            .into_iter()
            .enumerate()
        {
            let center = row_anchor(connections, row);
            painter.line_segment(
                [center - vec2(8.0, 0.0), center + vec2(8.0, 0.0)],
                Stroke::new(2.0, color),
            );
            legend_label(painter, center, label, palette);
        }
    }
}

fn legend_box(painter: &Painter, top_left: Pos2, title: &str, rows: usize, palette: &Palette) -> Rect {
    let height = LEGEND_PADDING * 2.0 + ROW_HEIGHT * (rows + 1) as f32;
    let frame = Rect::from_min_size(top_left, vec2(LEGEND_WIDTH, height));
    painter.rect_filled(frame, 6.0, palette.tooltip_fill.gamma_multiply(0.92));
    painter.rect_stroke(frame, 6.0, Stroke::new(1.0, palette.tooltip_border), StrokeKind::Inside);
    painter.text(
        frame.left_top() + vec2(LEGEND_PADDING, LEGEND_PADDING),
        Align2::LEFT_TOP,
        title,
        FontId::proportional(13.0),
        palette.text,
    );
    frame
}

fn row_anchor(frame: Rect, row: usize) -> Pos2 {
    frame.left_top()
        + vec2(
            LEGEND_PADDING + 8.0,
            LEGEND_PADDING + ROW_HEIGHT * (row + 1) as f32 + ROW_HEIGHT * 0.5,
        )
}

fn legend_label(painter: &Painter, anchor: Pos2, text: &str, palette: &Palette) {
    painter.text(
        anchor + vec2(16.0, 0.0),
        Align2::LEFT_CENTER,
        text,
        FontId::proportional(12.0),
        palette.text,
    );
}
