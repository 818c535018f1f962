use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::api::config::ViewportConfig;
use crate::api::types::Point2D;

/// Pan/zoom applied to the scene graph: `screen = world * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn translate(&self) -> DVec2 {
        DVec2::new(self.translate_x, self.translate_y)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Pan/zoom state for one view.
/// Scale stays inside the configured range after every update; gestures
/// beyond the bounds are clamped, never rejected.
#[derive(Debug, Clone)]
pub struct Viewport {
    transform: ViewTransform,
    config: ViewportConfig,
    /// Visible area in screen pixels.
    size: DVec2,
}

impl Viewport {
    pub fn new(config: ViewportConfig, width: f64, height: f64) -> Self {
        let mut viewport = Self {
            transform: ViewTransform::IDENTITY,
            config,
            size: DVec2::ZERO,
        };
        viewport.resize(width, height);
        viewport.constrain();
        viewport
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Replace the whole transform (e.g. restored from the host).
    /// A non-finite translate is ignored.
    pub fn set_transform(&mut self, transform: ViewTransform) {
        if !transform.translate().is_finite() {
            return;
        }
        self.transform = transform;
        self.constrain();
    }

    /// Resize the visible area (e.g. on window resize).
    /// A non-finite size is ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        let size = DVec2::new(width, height);
        if !size.is_finite() {
            return;
        }
        self.size = size;
        self.constrain();
    }

    /// Zoom to an absolute scale, keeping the viewport center fixed.
    pub fn zoom_to(&mut self, scale: f64) {
        self.zoom_toward(self.size / 2.0, scale);
    }

    /// Multiply the scale by `factor`, anchored at a screen point.
    pub fn zoom_by(&mut self, factor: f64, anchor: Point2D) {
        self.zoom_toward(anchor, self.transform.scale * factor);
    }

    /// Zoom toward a screen point (keeps the world point under it fixed).
    pub fn zoom_toward(&mut self, anchor: Point2D, scale: f64) {
        if !scale.is_finite() || !anchor.is_finite() {
            return;
        }
        let world = self.screen_to_world(anchor);
        let scale = scale.clamp(self.config.min_scale, self.config.max_scale);
        let translate = anchor - world * scale;
        self.transform = ViewTransform {
            translate_x: translate.x,
            translate_y: translate.y,
            scale,
        };
        self.constrain();
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, delta: DVec2) {
        if !delta.is_finite() {
            return;
        }
        self.transform.translate_x += delta.x;
        self.transform.translate_y += delta.y;
        self.constrain();
    }

    pub fn screen_to_world(&self, screen: Point2D) -> Point2D {
        (screen - self.transform.translate()) / self.transform.scale
    }

    pub fn world_to_screen(&self, world: Point2D) -> Point2D {
        world * self.transform.scale + self.transform.translate()
    }

    /// World point at the middle of the viewport. New systems are placed here.
    pub fn world_center(&self) -> Point2D {
        self.screen_to_world(self.size / 2.0)
    }

    /// World-space rectangle currently visible: (min, max).
    pub fn visible_world_rect(&self) -> (Point2D, Point2D) {
        (
            self.screen_to_world(DVec2::ZERO),
            self.screen_to_world(self.size),
        )
    }

    /// Clamp scale, then keep the visible area inside the translate extent.
    fn constrain(&mut self) {
        let t = &mut self.transform;
        if !t.scale.is_finite() {
            t.scale = 1.0;
        }
        t.scale = t.scale.clamp(self.config.min_scale, self.config.max_scale);

        if let Some([min, max]) = self.config.translate_extent {
            t.translate_x = clamp_axis(t.translate_x, t.scale, self.size.x, min[0], max[0]);
            t.translate_y = clamp_axis(t.translate_y, t.scale, self.size.y, min[1], max[1]);
        }
    }
}

/// Constrain one translate component so the visible world span stays inside
/// `[lo, hi]`, centering it when it is wider than the extent.
fn clamp_axis(translate: f64, scale: f64, screen_len: f64, lo: f64, hi: f64) -> f64 {
    let visible_lo = -translate / scale;
    let visible_hi = (screen_len - translate) / scale;
    let d_lo = visible_lo - lo;
    let d_hi = visible_hi - hi;
    let shift = if d_hi > d_lo {
        (d_lo + d_hi) / 2.0
    } else if d_lo < 0.0 {
        d_lo
    } else if d_hi > 0.0 {
        d_hi
    } else {
        0.0
    };
    translate + shift * scale
}
