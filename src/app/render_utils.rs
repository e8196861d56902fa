use eframe::egui::{
    Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2, Visuals, vec2,
};
use openalex_graphs::view::{ViewTransform, place_tooltip};

#[derive(Clone, Copy)]
pub(super) struct Palette {
    pub(super) background: Color32,
    pub(super) grid: Color32,
    pub(super) text: Color32,
    pub(super) link: Color32,
    pub(super) internal_node: Color32,
    pub(super) leaf_node: Color32,
    pub(super) accent: Color32,
    pub(super) node_outline: Color32,
    pub(super) tooltip_fill: Color32,
    pub(super) tooltip_border: Color32,
}

impl Palette {
    pub(super) fn for_visuals(visuals: &Visuals) -> Self {
        if visuals.dark_mode {
            Self {
                background: Color32::from_rgb(19, 23, 29),
                grid: Color32::from_rgba_unmultiplied(60, 70, 80, 70),
                text: Color32::from_gray(232),
                link: Color32::from_rgba_unmultiplied(153, 153, 153, 150),
                internal_node: Color32::from_gray(170),
                leaf_node: Color32::from_gray(120),
                accent: Color32::from_rgb(0x6d, 0x84, 0xf0),
                node_outline: Color32::from_gray(30),
                tooltip_fill: Color32::from_rgb(32, 37, 45),
                tooltip_border: Color32::from_gray(80),
            }
        } else {
            Self {
                background: Color32::from_rgb(250, 250, 250),
                grid: Color32::from_rgba_unmultiplied(180, 186, 194, 70),
                text: Color32::from_gray(30),
                link: Color32::from_rgba_unmultiplied(153, 153, 153, 150),
                internal_node: Color32::from_gray(0x55),
                leaf_node: Color32::from_gray(0x99),
                accent: Color32::from_rgb(0x38, 0x51, 0xdd),
                node_outline: Color32::WHITE,
                tooltip_fill: Color32::WHITE,
                tooltip_border: Color32::from_gray(0xdd),
            }
        }
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(
    painter: &Painter,
    rect: Rect,
    transform: ViewTransform,
    palette: &Palette,
) {
    painter.rect_filled(rect, 0.0, palette.background);

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.translate;
    let stroke = Stroke::new(1.0, palette.grid);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

/// Edge from `start` to `end` that stops at the target circle, with an arrow head.
pub(super) fn draw_directed_edge(
    painter: &Painter,
    start: Pos2,
    end: Pos2,
    target_radius: f32,
    stroke: Stroke,
) {
    let delta = end - start;
    let length = delta.length();
    if length <= target_radius + 1.0 {
        return;
    }

    let direction = delta / length;
    let tip = end - direction * target_radius;
    let head = (stroke.width * 3.5).clamp(4.0, 10.0);
    let base = tip - direction * head;
    let normal = vec2(-direction.y, direction.x) * (head * 0.5);

    painter.line_segment([start, base], stroke);
    painter.add(Shape::convex_polygon(
        vec![tip, base + normal, base - normal],
        stroke.color,
        Stroke::NONE,
    ));
}

/// Lays out `lines` and draws them in a box next to `anchor`, kept inside `viewport`.
pub(super) fn draw_tooltip(
    painter: &Painter,
    anchor: Rect,
    viewport: Rect,
    lines: &[String],
    palette: &Palette,
) {
    const PADDING: Vec2 = Vec2::splat(8.0);
    const MAX_WIDTH: f32 = 280.0;

    let galley = painter.layout(
        lines.join("\n"),
        FontId::proportional(13.0),
        palette.text,
        MAX_WIDTH,
    );
    let size = galley.size() + PADDING * 2.0;
    let top_left = place_tooltip(anchor, size, viewport);
    let frame = Rect::from_min_size(top_left, size);

    painter.rect_filled(frame, 5.0, palette.tooltip_fill);
    painter.rect_stroke(
        frame,
        5.0,
        Stroke::new(1.0, palette.tooltip_border),
        StrokeKind::Inside,
    );
    painter.galley(top_left + PADDING, galley, palette.text);
}
