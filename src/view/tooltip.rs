use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub const TOOLTIP_OFFSET: f32 = 15.0;
pub const TOOLTIP_GUTTER: f32 = 20.0;
pub const TOOLTIP_INSET: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
    Centered,
}

fn choose_side(space_before: f32, space_after: f32, extent: f32) -> Side {
    if space_after >= extent + TOOLTIP_GUTTER {
        Side::After
    } else if space_before >= extent + TOOLTIP_GUTTER {
        Side::Before
    } else {
        Side::Centered
    }
}

fn place_axis(side: Side, anchor_min: f32, anchor_max: f32, extent: f32) -> f32 {
    match side {
        Side::After => anchor_max + TOOLTIP_OFFSET,
        Side::Before => anchor_min - TOOLTIP_OFFSET - extent,
        Side::Centered => (anchor_min + anchor_max) * 0.5 - extent * 0.5,
    }
}

/// Keeps `[value, value + extent]` inside `[min, max]` with the inset; the lower edge wins
/// when the range is too small.
fn clamp_axis(value: f32, extent: f32, min: f32, max: f32) -> f32 {
    let upper = max - TOOLTIP_INSET - extent;
    let lower = min + TOOLTIP_INSET;
    value.min(upper).max(lower)
}

/// Top-left corner for a tooltip of `size` next to `anchor`, all in screen space.
pub fn place_tooltip(anchor: Rect, size: Vec2, viewport: Rect) -> Pos2 {
    let measured = size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0;
    let size = if measured { size } else { Vec2::ZERO };

    let (horizontal, vertical) = if measured {
        (
            choose_side(
                anchor.min.x - viewport.min.x,
                viewport.max.x - anchor.max.x,
                size.x,
            ),
            choose_side(
                anchor.min.y - viewport.min.y,
                viewport.max.y - anchor.max.y,
                size.y,
            ),
        )
    } else {
        (Side::After, Side::After)
    };

    let x = place_axis(horizontal, anchor.min.x, anchor.max.x, size.x);
    let y = place_axis(vertical, anchor.min.y, anchor.max.y, size.y);

    pos2(
        clamp_axis(x, size.x, viewport.min.x, viewport.max.x),
        clamp_axis(y, size.y, viewport.min.y, viewport.max.y),
    )
}
