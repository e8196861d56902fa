use eframe::egui::{Pos2, Rect, Vec2};

pub const ZOOM_DURATION_SECS: f32 = 0.3;
pub const FIT_DURATION_SECS: f32 = 0.2;
pub const FIT_PADDING: f32 = 50.0;
pub const FIT_FACTOR: f32 = 0.9;
pub const ZOOM_IN_FACTOR: f32 = 1.3;
pub const ZOOM_OUT_FACTOR: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub const GRAPH: Self = Self { min: 0.1, max: 8.0 };
    pub const RADIAL: Self = Self { min: 0.9, max: 10.0 };

    pub fn clamp(self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.min;
        }
        scale.max(self.min).min(self.max)
    }
}

/// `screen = viewport.min + translate + world * scale`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn world_to_screen(self, viewport: Rect, world: Vec2) -> Pos2 {
        viewport.min + self.translate + world * self.scale
    }

    pub fn screen_to_world(self, viewport: Rect, screen: Pos2) -> Vec2 {
        (screen - viewport.min - self.translate) / self.scale
    }

    pub fn world_rect_to_screen(self, viewport: Rect, world: Rect) -> Rect {
        Rect::from_min_max(
            self.world_to_screen(viewport, world.min.to_vec2()),
            self.world_to_screen(viewport, world.max.to_vec2()),
        )
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            translate: self.translate + (other.translate - self.translate) * t,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }

    /// Scales by `factor` around `anchor` (viewport-local), keeping the world point under it fixed.
    fn zoomed_around(self, anchor: Vec2, factor: f32, range: ScaleRange) -> Self {
        let world = (anchor - self.translate) / self.scale;
        let scale = range.clamp(self.scale * factor);
        Self {
            translate: anchor - world * scale,
            scale,
        }
    }
}

pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.max(0.0).min(1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

/// Transform that centers `bounds` padded by [`FIT_PADDING`] inside a viewport of `size`.
pub fn fit_transform(bounds: Rect, size: Vec2, range: ScaleRange) -> Option<ViewTransform> {
    if size.x <= 0.0 || size.y <= 0.0 || !bounds.is_finite() || bounds.is_negative() {
        return None;
    }

    let padded = bounds.expand(FIT_PADDING);
    let scale = range.clamp((size.x / padded.width()).min(size.y / padded.height()) * FIT_FACTOR);
    Some(ViewTransform {
        translate: size * 0.5 - padded.center().to_vec2() * scale,
        scale,
    })
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: ViewTransform,
    to: ViewTransform,
    elapsed: f32,
    duration: f32,
}

#[derive(Clone, Debug)]
pub struct ViewportController {
    transform: ViewTransform,
    range: ScaleRange,
    transition: Option<Transition>,
    last_size: Option<Vec2>,
}

impl ViewportController {
    pub fn new(range: ScaleRange) -> Self {
        Self {
            transform: ViewTransform {
                scale: range.clamp(1.0),
                ..ViewTransform::default()
            },
            range,
            transition: None,
            last_size: None,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn range(&self) -> ScaleRange {
        self.range
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Where the view is heading, or the current transform when idle.
    pub fn target(&self) -> ViewTransform {
        self.transition
            .map(|transition| transition.to)
            .unwrap_or(self.transform)
    }

    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transition = None;
        self.transform = ViewTransform {
            scale: self.range.clamp(transform.scale),
            ..transform
        };
    }

    fn animate_to(&mut self, to: ViewTransform, duration: f32) {
        self.transition = Some(Transition {
            from: self.transform,
            to,
            elapsed: 0.0,
            duration,
        });
    }

    /// Zoom buttons: animated zoom around the viewport center.
    pub fn zoom_by(&mut self, factor: f32, viewport: Rect) {
        if viewport.width() <= 0.0 || viewport.height() <= 0.0 {
            return;
        }
        let target = self
            .target()
            .zoomed_around(viewport.size() * 0.5, factor, self.range);
        self.animate_to(target, ZOOM_DURATION_SECS);
    }

    /// Wheel zoom around the pointer, applied immediately.
    pub fn zoom_at(&mut self, pointer: Pos2, factor: f32, viewport: Rect) {
        self.transition = None;
        self.transform = self
            .transform
            .zoomed_around(pointer - viewport.min, factor, self.range);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.transition = None;
        self.transform.translate += delta;
    }

    /// Returns false when there is nothing to fit or nowhere to fit it.
    pub fn fit_to_content(&mut self, bounds: Rect, viewport: Rect) -> bool {
        let Some(target) = fit_transform(bounds, viewport.size(), self.range) else {
            return false;
        };
        self.animate_to(target, FIT_DURATION_SECS);
        true
    }

    /// Advances a running transition by `dt` seconds. Returns whether one is still running.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(mut transition) = self.transition else {
            return false;
        };

        transition.elapsed += dt.max(0.0);
        let progress = if transition.duration > 0.0 {
            transition.elapsed / transition.duration
        } else {
            1.0
        };

        if progress >= 1.0 {
            self.transform = transition.to;
            self.transition = None;
            return false;
        }

        self.transform = transition
            .from
            .lerp(transition.to, ease_cubic_in_out(progress));
        self.transition = Some(transition);
        true
    }

    /// Remembers the viewport size and reports whether it changed since the last frame.
    pub fn observe_viewport(&mut self, size: Vec2) -> bool {
        if size.x <= 0.0 || size.y <= 0.0 {
            return false;
        }
        let changed = self
            .last_size
            .is_none_or(|last| (last - size).length_sq() > 0.25);
        self.last_size = Some(size);
        changed
    }

    pub fn world_to_screen(&self, viewport: Rect, world: Vec2) -> Pos2 {
        self.transform.world_to_screen(viewport, world)
    }

    pub fn screen_to_world(&self, viewport: Rect, screen: Pos2) -> Vec2 {
        self.transform.screen_to_world(viewport, screen)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(800.0, 600.0))
    }

    fn finish(controller: &mut ViewportController) {
        let mut guard = 0;
        while controller.advance(0.016) {
            guard += 1;
            assert!(guard < 100);
        }
    }

    #[test]
    fn zoom_by_keeps_viewport_center_fixed() {
        let mut controller = ViewportController::new(ScaleRange::GRAPH);
        controller.set_transform(ViewTransform {
            translate: vec2(30.0, -20.0),
            scale: 1.5,
        });
        let center = viewport().center();
        let world_before = controller.screen_to_world(viewport(), center);

        controller.zoom_by(ZOOM_IN_FACTOR, viewport());
        assert!(controller.is_animating());
        finish(&mut controller);

        let world_after = controller.screen_to_world(viewport(), center);
        assert!((world_before - world_after).length() < 1e-3);
        assert!((controller.transform().scale - 1.95).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut controller = ViewportController::new(ScaleRange::RADIAL);
        for _ in 0..20 {
            controller.zoom_at(pos2(400.0, 300.0), ZOOM_OUT_FACTOR, viewport());
        }
        assert_eq!(controller.transform().scale, 0.9);

        for _ in 0..40 {
            controller.zoom_at(pos2(400.0, 300.0), ZOOM_IN_FACTOR, viewport());
        }
        assert_eq!(controller.transform().scale, 10.0);
    }

    #[test]
    fn wheel_zoom_keeps_pointer_fixed() {
        let mut controller = ViewportController::new(ScaleRange::GRAPH);
        let pointer = pos2(250.0, 410.0);
        let before = controller.screen_to_world(viewport(), pointer);
        controller.zoom_at(pointer, 2.0, viewport());
        let after = controller.screen_to_world(viewport(), pointer);

        assert!(!controller.is_animating());
        assert!((before - after).length() < 1e-4);
    }

    #[test]
    fn pan_adds_to_translate() {
        let mut controller = ViewportController::new(ScaleRange::GRAPH);
        controller.pan_by(vec2(12.0, -3.0));
        controller.pan_by(vec2(1.0, 1.0));
        assert_eq!(controller.transform().translate, vec2(13.0, -2.0));
    }

    #[test]
    fn fit_centers_padded_bounds() {
        let bounds = Rect::from_min_max(pos2(-200.0, -100.0), pos2(200.0, 100.0));
        let transform = fit_transform(bounds, vec2(800.0, 600.0), ScaleRange::GRAPH)
            .expect("fit for non-empty input");

        // padded box is 500 x 300
        assert!((transform.scale - 1.6 * FIT_FACTOR).abs() < 1e-5);
        let screen = transform.world_rect_to_screen(
            Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)),
            bounds,
        );
        assert!((screen.center() - pos2(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn fit_ignores_degenerate_input() {
        let mut controller = ViewportController::new(ScaleRange::GRAPH);
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0));

        assert!(!controller.fit_to_content(bounds, Rect::from_min_size(Pos2::ZERO, Vec2::ZERO)));
        assert!(!controller.fit_to_content(Rect::NOTHING, viewport()));
        assert_eq!(controller.transform(), ViewTransform::default());

        assert!(controller.fit_to_content(bounds, viewport()));
        finish(&mut controller);
        assert_eq!(
            controller.transform(),
            fit_transform(bounds, viewport().size(), ScaleRange::GRAPH).expect("fit")
        );
    }

    #[test]
    fn transitions_ease_monotonically() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-6);
        let mut last = 0.0;
        for step in 1..=20 {
            let value = ease_cubic_in_out(step as f32 / 20.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn resize_is_reported_once() {
        let mut controller = ViewportController::new(ScaleRange::GRAPH);
        assert!(controller.observe_viewport(vec2(800.0, 600.0)));
        assert!(!controller.observe_viewport(vec2(800.0, 600.0)));
        assert!(controller.observe_viewport(vec2(1024.0, 600.0)));
        assert!(!controller.observe_viewport(Vec2::ZERO));
    }
}
