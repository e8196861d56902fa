use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Rect, ScrollArea, Sense, Stroke, Ui, pos2, vec2,
};
use openalex_graphs::chart::{
    AXIS_TICKS, BAR_HEIGHT, BAR_SPACING, Bar, LinearScale, ScatterPoint, bars_height, format_tick,
    nearest_point,
};
use openalex_graphs::util::format_count;

use super::super::render_utils::{Palette, draw_tooltip};

const DOT_COLOR: Color32 = Color32::from_rgb(70, 130, 180);
const BAR_COLOR: Color32 = Color32::from_rgb(0x19, 0x76, 0xd2);
const BAR_HOVER_COLOR: Color32 = Color32::from_rgb(0x21, 0x96, 0xf3);
const DOT_RADIUS: f32 = 5.0;
const BAR_LABEL_WIDTH: f32 = 250.0;
const BAR_VALUE_WIDTH: f32 = 80.0;
const BAR_AXIS_HEIGHT: f32 = 60.0;

struct Margins {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

const SCATTER_MARGINS: Margins = Margins {
    top: 20.0,
    right: 20.0,
    bottom: 50.0,
    left: 70.0,
};

fn axis_text(painter: &Painter, position: egui::Pos2, anchor: Align2, text: String, palette: &Palette) {
    painter.text(position, anchor, text, FontId::proportional(11.0), palette.text);
}

/// Works count against citations, one dot per author.
pub(super) fn draw_authors_scatter(ui: &mut Ui, points: &[ScatterPoint], hovered: &mut Option<usize>) {
    ui.heading(format!("Top {} Authors", points.len()));

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    let palette = Palette::for_visuals(ui.visuals());
    if points.is_empty() {
        axis_text(&painter, rect.center(), Align2::CENTER_CENTER, "No authors found".to_owned(), &palette);
        return;
    }

    let plot = Rect::from_min_max(
        rect.min + vec2(SCATTER_MARGINS.left, SCATTER_MARGINS.top),
        rect.max - vec2(SCATTER_MARGINS.right, SCATTER_MARGINS.bottom),
    );
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return;
    }

    let x_scale = LinearScale::from_zero(
        points.iter().map(|point| point.works as f32),
        (plot.left(), plot.right()),
    );
    let y_scale = LinearScale::from_zero(
        points.iter().map(|point| point.citations as f32),
        (plot.bottom(), plot.top()),
    );

    let axis = Stroke::new(1.0, palette.text);
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);
    for tick in x_scale.ticks(AXIS_TICKS) {
        let x = x_scale.map(tick);
        painter.line_segment([pos2(x, plot.bottom()), pos2(x, plot.bottom() + 6.0)], axis);
        axis_text(&painter, pos2(x, plot.bottom() + 9.0), Align2::CENTER_TOP, format_tick(tick), &palette);
    }
    for tick in y_scale.ticks(AXIS_TICKS) {
        let y = y_scale.map(tick);
        painter.line_segment([pos2(plot.left() - 6.0, y), pos2(plot.left(), y)], axis);
        axis_text(&painter, pos2(plot.left() - 9.0, y), Align2::RIGHT_CENTER, format_tick(tick), &palette);
    }
    axis_text(
        &painter,
        pos2(plot.center().x, plot.bottom() + 32.0),
        Align2::CENTER_TOP,
        "Number of Works".to_owned(),
        &palette,
    );
    axis_text(
        &painter,
        pos2(rect.left() + 4.0, plot.top() - 14.0),
        Align2::LEFT_TOP,
        "Number of Citations".to_owned(),
        &palette,
    );

    let screen = points
        .iter()
        .map(|point| {
            (
                x_scale.map(point.works as f32),
                y_scale.map(point.citations as f32),
            )
        })
        .collect::<Vec<_>>();

    *hovered = response
        .hover_pos()
        .and_then(|pointer| nearest_point(screen.iter().copied(), (pointer.x, pointer.y), DOT_RADIUS * 2.0));

    for (index, &(x, y)) in screen.iter().enumerate() {
        let opacity = match *hovered {
            Some(active) if active == index => 1.0,
            Some(_) => 0.2,
            None => 0.7,
        };
        painter.circle_filled(pos2(x, y), DOT_RADIUS, DOT_COLOR.gamma_multiply(opacity));
    }

    if let Some(index) = *hovered {
        let (x, y) = screen[index];
        let point = &points[index];
        draw_tooltip(
            &painter,
            Rect::from_center_size(pos2(x, y), vec2(DOT_RADIUS, DOT_RADIUS) * 2.0),
            rect,
            &[
                point.label.clone(),
                format!("Works: {}", format_count(point.works)),
                format!("Citations: {}", format_count(point.citations)),
            ],
            &palette,
        );
    }
}

/// Horizontal bars, largest first, with a fixed count axis above a scrolling body.
pub(super) fn draw_institution_bars(ui: &mut Ui, bars: &[Bar], hovered: &mut Option<usize>) {
    let palette = Palette::for_visuals(ui.visuals());
    if bars.is_empty() {
        ui.label("No institutions found");
        return;
    }

    let width = ui.available_width();
    let plot_width = (width - BAR_LABEL_WIDTH - BAR_VALUE_WIDTH).max(40.0);
    let max_count = bars.iter().map(|bar| bar.count).max().unwrap_or(0);

    let (axis_rect, _) = ui.allocate_exact_size(vec2(width, BAR_AXIS_HEIGHT), Sense::hover());
    let painter = ui.painter_at(axis_rect);
    let origin_x = axis_rect.left() + BAR_LABEL_WIDTH;
    let scale = LinearScale::new((0.0, max_count as f32), (origin_x, origin_x + plot_width));
    let axis_y = axis_rect.bottom() - 5.0;
    let axis = Stroke::new(1.0, palette.text);

    painter.line_segment([pos2(origin_x, axis_y), pos2(origin_x + plot_width, axis_y)], axis);
    for tick in scale.ticks(AXIS_TICKS) {
        let x = scale.map(tick);
        painter.line_segment([pos2(x, axis_y - 6.0), pos2(x, axis_y)], axis);
        axis_text(&painter, pos2(x, axis_y - 9.0), Align2::CENTER_BOTTOM, format_tick(tick), &palette);
    }
    axis_text(
        &painter,
        pos2(origin_x + plot_width * 0.5, axis_rect.top() + 4.0),
        Align2::CENTER_TOP,
        "Number of Works".to_owned(),
        &palette,
    );

    let viewport = ui.max_rect();
    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        let (body, response) = ui.allocate_exact_size(vec2(width, bars_height(bars.len())), Sense::hover());
        let painter = ui.painter_at(body);
        let scale = LinearScale::new(
            (0.0, max_count as f32),
            (body.left() + BAR_LABEL_WIDTH, body.left() + BAR_LABEL_WIDTH + plot_width),
        );

        let rows = bars
            .iter()
            .enumerate()
            .map(|(index, _)| {
                let top = body.top() + index as f32 * (BAR_HEIGHT + BAR_SPACING);
                Rect::from_min_max(
                    pos2(scale.map(0.0), top),
                    pos2(scale.map(bars[index].count as f32).max(scale.map(0.0) + 1.0), top + BAR_HEIGHT),
                )
            })
            .collect::<Vec<_>>();

        *hovered = response
            .hover_pos()
            .and_then(|pointer| rows.iter().position(|row| row.contains(pointer)));

        for (index, (bar, row)) in bars.iter().zip(&rows).enumerate() {
            let fill = if *hovered == Some(index) { BAR_HOVER_COLOR } else { BAR_COLOR };
            painter.rect_filled(*row, 0.0, fill);
            axis_text(
                &painter,
                pos2(body.left() + BAR_LABEL_WIDTH - 8.0, row.center().y),
                Align2::RIGHT_CENTER,
                bar.label.clone(),
                &palette,
            );
            painter.text(
                pos2(row.right() + 5.0, row.center().y),
                Align2::LEFT_CENTER,
                format_count(bar.count),
                FontId::proportional(11.0),
                Color32::GRAY,
            );
        }

        if let Some(index) = *hovered {
            let bar = &bars[index];
            draw_tooltip(
                &painter,
                rows[index],
                viewport.intersect(body),
                &[bar.full_label.clone(), format!("Works: {}", format_count(bar.count))],
                &palette,
            );
        }
    });
}
