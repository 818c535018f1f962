use glam::DVec2;

use crate::api::config::EngineConfig;
use crate::api::error::ConfigError;
use crate::api::types::{NodeKey, Point2D};
use crate::core::chart::Chart;
use crate::core::orbit::OrbitalModel;
use crate::core::time::TimeDriver;
use crate::input::queue::InputEvent;
use crate::renderer::instance::BodyBuffer;
use crate::renderer::viewport::{ViewTransform, Viewport};
use crate::systems::layout::{build_body_buffer, layout_system, FrameLayout, PlacedBody};

/// Close-up of a single system drawn at the middle of a fixed view box.
/// Runs its own clock, so several previews never interfere with each other
/// or with the map.
pub struct SystemPreview {
    model: OrbitalModel,
    clock: TimeDriver,
    viewport: Viewport,
    system: NodeKey,
    center: Point2D,
    layout: FrameLayout,
    bodies: BodyBuffer,
}

impl SystemPreview {
    pub fn new(config: &EngineConfig, system: NodeKey) -> Result<Self, ConfigError> {
        config.validate()?;
        let [w, h] = config.preview_size;
        Ok(Self {
            model: OrbitalModel::new(config.orbit),
            clock: TimeDriver::new(config.preview_time_scale),
            viewport: Viewport::new(config.preview_view, w, h),
            system,
            center: DVec2::new(w, h) / 2.0,
            layout: FrameLayout::new(),
            bodies: BodyBuffer::new(),
        })
    }

    pub fn system(&self) -> NodeKey {
        self.system
    }

    pub fn start(&mut self, timestamp_ms: f64) {
        self.clock.start(timestamp_ms);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Recompute the previewed system from the current snapshot.
    /// Returns `false` when stopped or when the system no longer exists.
    pub fn frame(&mut self, chart: &Chart, timestamp_ms: f64) -> bool {
        let Some(elapsed) = self.clock.tick(timestamp_ms) else {
            return false;
        };
        let Some(system) = chart.system(self.system) else {
            log::warn!("preview of missing system {:?}", self.system);
            self.layout.clear();
            self.bodies.clear();
            return false;
        };
        layout_system(&system, self.center, &self.model, elapsed, &mut self.layout);
        build_body_buffer(&self.layout, &self.model, &mut self.bodies);
        true
    }

    /// Pan and zoom only; drags and resizes do not apply to the fixed view box.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pan { dx, dy } => self.viewport.pan_by(DVec2::new(dx, dy)),
            InputEvent::Zoom { factor, x, y } => self.viewport.zoom_by(factor, DVec2::new(x, y)),
            _ => {}
        }
    }

    /// Body under a screen point, for selecting a planet or moon to edit.
    pub fn pick(&self, screen: Point2D) -> Option<&PlacedBody> {
        let world = self.viewport.screen_to_world(screen);
        self.layout.pick(world, &self.model)
    }

    pub fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn bodies(&self) -> &BodyBuffer {
        &self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SystemNode;
    use crate::systems::layout::BodyKind;

    fn chart() -> (Chart, NodeKey) {
        let system = SystemNode::empty("far", Point2D::new(-9000.0, 4000.0)).with_planet("p", &["m"]);
        Chart::new().with_system(&system)
    }

    #[test]
    fn draws_system_at_view_center() {
        let (chart, key) = chart();
        let mut preview = SystemPreview::new(&EngineConfig::default(), key).unwrap();
        preview.start(0.0);
        assert!(preview.frame(&chart, 1000.0));
        assert_eq!(preview.layout().bodies[0].position, Point2D::new(450.0, 300.0));
        assert_eq!(preview.layout().elapsed, 0.5);
    }

    #[test]
    fn zoom_uses_preview_bounds() {
        let (_, key) = chart();
        let mut preview = SystemPreview::new(&EngineConfig::default(), key).unwrap();
        preview.handle(InputEvent::Zoom { factor: 100.0, x: 450.0, y: 300.0 });
        assert_eq!(preview.transform().scale, 2.5);
        preview.handle(InputEvent::Zoom { factor: 0.001, x: 450.0, y: 300.0 });
        assert_eq!(preview.transform().scale, 0.7);
    }

    #[test]
    fn missing_system_clears_frame() {
        let (chart, key) = chart();
        let mut preview = SystemPreview::new(&EngineConfig::default(), key).unwrap();
        preview.start(0.0);
        preview.frame(&chart, 10.0);
        assert!(!preview.frame(&Chart::new(), 20.0));
        assert!(preview.layout().bodies.is_empty());
    }

    #[test]
    fn pick_selects_planet() {
        let (chart, key) = chart();
        let mut preview = SystemPreview::new(&EngineConfig::default(), key).unwrap();
        preview.start(0.0);
        preview.frame(&chart, 0.0);
        let planet = preview.layout().bodies[1];
        let screen = planet.position; // identity transform
        let hit = preview.pick(screen).unwrap();
        assert_eq!(hit.kind, BodyKind::Planet);
    }

    #[test]
    fn preview_clock_is_independent() {
        let (chart, key) = chart();
        let config = EngineConfig::default();
        let mut one = SystemPreview::new(&config, key).unwrap();
        let mut two = SystemPreview::new(&config, key).unwrap();
        one.start(0.0);
        two.start(0.0);
        two.stop();
        assert!(one.frame(&chart, 2000.0));
        assert!(!two.frame(&chart, 2000.0));
        assert_eq!(one.layout().elapsed, 1.0);
    }
}
