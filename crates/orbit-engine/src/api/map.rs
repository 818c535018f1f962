use glam::DVec2;

use crate::api::config::EngineConfig;
use crate::api::error::{ConfigError, SnapshotError};
use crate::api::types::{NodeKey, Point2D, PositionUpdate};
use crate::core::chart::Chart;
use crate::core::extent::SystemShape;
use crate::core::orbit::OrbitalModel;
use crate::core::overlap::OverlapResolver;
use crate::core::scene::SystemNode;
use crate::core::time::TimeDriver;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::instance::BodyBuffer;
use crate::renderer::viewport::{ViewTransform, Viewport};
use crate::systems::layout::{build_body_buffer, layout_chart, FrameLayout, PlacedBody};

/// The full star map: every system at its stored position, pan/zoom over
/// the whole plane, drag-to-move with overlap resolution.
pub struct OrbitMap {
    config: EngineConfig,
    model: OrbitalModel,
    resolver: OverlapResolver,
    clock: TimeDriver,
    viewport: Viewport,
    chart: Chart,
    input: InputQueue,
    layout: FrameLayout,
    bodies: BodyBuffer,
    /// Corrected positions waiting for the host to persist.
    updates: Vec<PositionUpdate>,
}

impl OrbitMap {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            model: OrbitalModel::new(config.orbit),
            resolver: OverlapResolver::new(config.orbit, config.resolver),
            clock: TimeDriver::new(config.map_time_scale),
            viewport: Viewport::new(config.map_view, 0.0, 0.0),
            chart: Chart::new(),
            input: InputQueue::new(),
            layout: FrameLayout::new(),
            bodies: BodyBuffer::new(),
            updates: Vec::new(),
            config,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(EngineConfig::from_json(json)?)
    }

    // -- Snapshot --

    /// Replace the entity snapshot (after a load or an external mutation).
    pub fn load(&mut self, chart: Chart) {
        self.chart = chart;
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        self.chart = Chart::from_json(json)?;
        Ok(())
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    // -- Clock --

    /// (Re)start the animation clock at a host timestamp (ms).
    pub fn start(&mut self, timestamp_ms: f64) {
        self.clock.start(timestamp_ms);
    }

    /// Cancel the animation. Later frames leave the layout untouched.
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Run one animation frame: apply queued input, advance the clock and
    /// recompute every body. Returns `false` when the clock is stopped.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        for event in self.input.drain() {
            self.handle(event);
        }
        let Some(elapsed) = self.clock.tick(timestamp_ms) else {
            return false;
        };
        layout_chart(&self.chart, &self.model, elapsed, &mut self.layout);
        build_body_buffer(&self.layout, &self.model, &mut self.bodies);
        true
    }

    // -- Input --

    /// Queue an event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply one discrete event immediately.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::DragEnd { system, dx, dy } => {
                // Keys are only valid for the snapshot they came from.
                let Some(key) = self.chart.system_by_id(&system).map(|s| s.key()) else {
                    log::warn!("drag of unknown system {system:?} ignored");
                    return;
                };
                self.drag_end(key, DVec2::new(dx, dy));
            }
            InputEvent::Pan { dx, dy } => self.viewport.pan_by(DVec2::new(dx, dy)),
            InputEvent::Zoom { factor, x, y } => self.viewport.zoom_by(factor, DVec2::new(x, y)),
            InputEvent::Resize { width, height } => self.viewport.resize(width, height),
            InputEvent::Custom { .. } => {}
        }
    }

    /// Drop a dragged system: convert the screen delta to world units,
    /// resolve overlap against every other system, and queue the result.
    pub fn drag_end(&mut self, system: NodeKey, screen_delta: DVec2) -> Option<Point2D> {
        if !screen_delta.is_finite() {
            log::warn!("drag of {system:?} ignored: non-finite delta");
            return None;
        }
        let Some(target) = self.chart.system(system) else {
            log::warn!("drag of unknown system {system:?} ignored");
            return None;
        };
        let proposed = target.position() + screen_delta / self.viewport.scale();
        let others = self.chart.systems().filter(|s| s.key() != system);
        let resolved = self.resolver.resolve(&target, others, proposed);
        self.commit_position(system, resolved);
        Some(resolved)
    }

    /// Create an empty system at the visual center of the viewport, nudged
    /// clear of existing systems. The position update is queued.
    pub fn place_new_system(&mut self, id: &str) -> Result<(NodeKey, Point2D), SnapshotError> {
        if id.is_empty() {
            return Err(SnapshotError::EmptySystemId {
                index: self.chart.system_count(),
            });
        }
        if self.chart.system_by_id(id).is_some() {
            return Err(SnapshotError::DuplicateSystemId { id: id.to_string() });
        }
        let center = self.world_center();
        if !center.is_finite() {
            return Err(SnapshotError::NonFinitePosition {
                id: id.to_string(),
                x: center.x,
                y: center.y,
            });
        }
        let draft = SystemNode::empty(id, center);
        let position = self.resolver.resolve(&draft, self.chart.systems(), center);

        let (chart, key) = self.chart.with_system(&SystemNode::empty(id, position));
        self.chart = chart;
        self.queue_update(key, id, position);
        Ok((key, position))
    }

    /// Append a planet; the grown system is pushed clear of its neighbours
    /// if its larger extent now overlaps them.
    pub fn add_planet(&mut self, system: NodeKey, id: &str) -> Option<NodeKey> {
        let Some((chart, planet)) = self.chart.with_planet(system, id) else {
            log::warn!("planet {id:?} not added: {system:?} is not a system");
            return None;
        };
        self.chart = chart;

        let target = self.chart.system(system)?;
        let current = target.position();
        let others = self.chart.systems().filter(|s| s.key() != system);
        let resolved = self.resolver.resolve(&target, others, current);
        if resolved != current {
            self.commit_position(system, resolved);
        }
        Some(planet)
    }

    /// Append a moon to a planet. Extent grows; the system is not moved.
    pub fn add_moon(&mut self, planet: NodeKey, id: &str) -> Option<NodeKey> {
        let Some((chart, moon)) = self.chart.with_moon(planet, id) else {
            log::warn!("moon {id:?} not added: {planet:?} is not a planet");
            return None;
        };
        self.chart = chart;
        Some(moon)
    }

    fn commit_position(&mut self, system: NodeKey, position: Point2D) {
        let Some(chart) = self.chart.with_system_position(system, position) else {
            return;
        };
        self.chart = chart;
        let id = self.chart.node_id(system).unwrap_or_default().to_string();
        self.queue_update(system, &id, position);
    }

    fn queue_update(&mut self, system: NodeKey, id: &str, position: Point2D) {
        log::debug!("system {id} moved to ({:.1}, {:.1})", position.x, position.y);
        self.updates.push(PositionUpdate {
            system,
            id: id.to_string(),
            position,
        });
    }

    /// Take the corrected positions for persistence.
    pub fn drain_updates(&mut self) -> Vec<PositionUpdate> {
        std::mem::take(&mut self.updates)
    }

    pub fn pending_updates(&self) -> &[PositionUpdate] {
        &self.updates
    }

    // -- View --

    /// World point at the middle of the viewport, or the configured
    /// fallback before the host has reported a size.
    pub fn world_center(&self) -> Point2D {
        let size = self.viewport.size();
        if !(size.x > 0.0 && size.y > 0.0) {
            let [x, y] = self.config.fallback_center;
            return Point2D::new(x, y);
        }
        self.viewport.world_center()
    }

    pub fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn bodies(&self) -> &BodyBuffer {
        &self.bodies
    }

    pub fn model(&self) -> &OrbitalModel {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Body under a screen point in the last computed frame.
    pub fn pick(&self, screen: Point2D) -> Option<&PlacedBody> {
        let world = self.viewport.screen_to_world(screen);
        self.layout.pick(world, &self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::layout::BodyKind;

    fn map_with(json: &str) -> OrbitMap {
        let mut map = OrbitMap::new(EngineConfig::default()).unwrap();
        map.load_json(json).unwrap();
        map
    }

    const TWO_SYSTEMS: &str = r#"[
        { "id": "a", "x": 0, "y": 0 },
        { "id": "b", "x": 1000, "y": 0, "planets": [{ "id": "b1", "moons": [{ "id": "b1m" }] }] }
    ]"#;

    #[test]
    fn rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.map_time_scale = -1.0;
        assert!(OrbitMap::new(config).is_err());
    }

    #[test]
    fn frame_requires_running_clock() {
        let mut map = map_with(TWO_SYSTEMS);
        assert!(!map.frame(16.0));
        assert!(map.layout().bodies.is_empty());

        map.start(0.0);
        assert!(map.frame(16.0));
        assert_eq!(map.layout().bodies.len(), 4);
        assert_eq!(map.bodies().instance_count(), 4);
    }

    #[test]
    fn stop_freezes_layout() {
        let mut map = map_with(TWO_SYSTEMS);
        map.start(0.0);
        map.frame(1000.0);
        let before = map.layout().bodies.clone();
        map.stop();
        assert!(!map.frame(5000.0));
        assert_eq!(map.layout().bodies, before);
        assert_eq!(map.elapsed(), 1.0);
    }

    #[test]
    fn drag_end_scales_delta_and_queues_update() {
        let mut map = map_with(TWO_SYSTEMS);
        map.handle(InputEvent::Resize { width: 800.0, height: 600.0 });
        map.viewport_mut().zoom_to(2.0);
        let a = map.chart().system_by_id("a").unwrap().key();

        map.handle(InputEvent::DragEnd {
            system: "a".into(),
            dx: -400.0,
            dy: 200.0,
        });
        let pos = map.chart().system(a).unwrap().position();
        assert_eq!(pos, Point2D::new(-200.0, 100.0));

        let updates = map.drain_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, "a");
        assert_eq!(updates[0].position, pos);
        assert!(map.pending_updates().is_empty());
    }

    #[test]
    fn drag_onto_neighbour_is_resolved() {
        let mut map = map_with(TWO_SYSTEMS);
        map.handle(InputEvent::Resize { width: 800.0, height: 600.0 });
        let chart = map.chart().clone();
        let a = chart.system_by_id("a").unwrap();
        let b = chart.system_by_id("b").unwrap();

        map.handle(InputEvent::DragEnd {
            system: "a".into(),
            dx: 1000.0,
            dy: 0.0,
        });
        let moved = map.chart().system(a.key()).unwrap().position();
        let needed = map.resolver.extent(&a) + map.resolver.extent(&b);
        assert!(moved.distance(b.position()) >= needed);
        // The snapshot held before the drag is unchanged.
        assert_eq!(a.position(), Point2D::ZERO);
    }

    #[test]
    fn unknown_drag_target_is_ignored() {
        let mut map = map_with(TWO_SYSTEMS);
        assert!(map.drag_end(NodeKey(999), DVec2::ONE).is_none());
        let planet = map.chart().system_by_id("b").unwrap().planets().next().unwrap().key;
        assert!(map.drag_end(planet, DVec2::ONE).is_none());
        assert!(map.pending_updates().is_empty());
    }

    #[test]
    fn queued_drag_follows_id_across_reload() {
        let mut map = map_with(r#"[{ "id": "a", "x": 0, "y": 0 }, { "id": "b", "x": 1000, "y": 0 }]"#);
        map.push_input(InputEvent::DragEnd {
            system: "b".into(),
            dx: 100.0,
            dy: 0.0,
        });
        map.load_json(r#"[{ "id": "b", "x": 1000, "y": 0 }, { "id": "a", "x": 0, "y": 0 }]"#)
            .unwrap();
        map.frame(0.0);

        let updates = map.drain_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, "b");
        assert_eq!(updates[0].position, Point2D::new(1100.0, 0.0));
        assert_eq!(map.chart().system_by_id("a").unwrap().position(), Point2D::ZERO);
    }

    #[test]
    fn queued_drag_of_removed_system_is_dropped() {
        let mut map = map_with(TWO_SYSTEMS);
        map.push_input(InputEvent::DragEnd {
            system: "b".into(),
            dx: 100.0,
            dy: 0.0,
        });
        map.load_json(r#"[{ "id": "a", "x": 0, "y": 0 }]"#).unwrap();
        map.frame(0.0);
        assert!(map.pending_updates().is_empty());
    }

    #[test]
    fn non_finite_resize_keeps_placement_finite() {
        let mut map = OrbitMap::new(EngineConfig::default()).unwrap();
        map.handle(InputEvent::Resize {
            width: f64::NAN,
            height: 600.0,
        });
        let (_, pos) = map.place_new_system("x").unwrap();
        assert!(pos.is_finite());
        assert_eq!(pos, Point2D::new(480.0, 380.0));

        map.handle(InputEvent::Resize {
            width: 800.0,
            height: 600.0,
        });
        map.handle(InputEvent::Resize {
            width: f64::INFINITY,
            height: 600.0,
        });
        assert_eq!(map.viewport().size(), DVec2::new(800.0, 600.0));
    }

    #[test]
    fn nan_translate_keeps_placement_finite() {
        let mut map = OrbitMap::new(EngineConfig::default()).unwrap();
        map.handle(InputEvent::Resize {
            width: 800.0,
            height: 600.0,
        });
        map.viewport_mut().set_transform(ViewTransform {
            translate_x: f64::NAN,
            translate_y: 0.0,
            scale: 1.0,
        });
        let (_, pos) = map.place_new_system("x").unwrap();
        assert_eq!(pos, Point2D::new(400.0, 300.0));
        assert!(map.chart().systems().all(|s| s.position().is_finite()));
    }

    #[test]
    fn new_system_lands_at_view_center() {
        let mut map = OrbitMap::new(EngineConfig::default()).unwrap();
        map.handle(InputEvent::Resize { width: 800.0, height: 600.0 });
        map.viewport_mut().set_transform(ViewTransform {
            translate_x: 100.0,
            translate_y: 50.0,
            scale: 2.0,
        });
        let (key, pos) = map.place_new_system("first").unwrap();
        assert_eq!(pos, Point2D::new(150.0, 125.0));
        assert_eq!(map.chart().system(key).unwrap().position(), pos);
        assert_eq!(map.drain_updates()[0].id, "first");
    }

    #[test]
    fn new_system_avoids_existing_ones() {
        let mut map = map_with(r#"[{ "id": "a", "x": 480, "y": 380 }]"#);
        let (_, pos) = map.place_new_system("b").unwrap();
        // Both empty: 96 + 96
        assert!(pos.distance(Point2D::new(480.0, 380.0)) >= 192.0);
    }

    #[test]
    fn new_system_uses_fallback_before_resize() {
        let mut map = OrbitMap::new(EngineConfig::default()).unwrap();
        let (_, pos) = map.place_new_system("x").unwrap();
        assert_eq!(pos, Point2D::new(480.0, 380.0));
        assert!(matches!(
            map.place_new_system("x"),
            Err(SnapshotError::DuplicateSystemId { .. })
        ));
    }

    #[test]
    fn growing_system_is_pushed_clear() {
        let mut map = map_with(
            r#"[{ "id": "a", "x": 0, "y": 0 }, { "id": "b", "x": 250, "y": 0 }]"#,
        );
        let a = map.chart().system_by_id("a").unwrap().key();
        assert!(map.add_planet(a, "a1").is_some());
        let updates = map.drain_updates();
        assert_eq!(updates.len(), 1);
        let b = map.chart().system_by_id("b").unwrap();
        let a_ref = map.chart().system(a).unwrap();
        let needed = map.resolver.extent(&a_ref) + map.resolver.extent(&b);
        assert!(a_ref.position().distance(b.position()) >= needed);
    }

    #[test]
    fn planet_with_room_does_not_move() {
        let mut map = map_with(r#"[{ "id": "a", "x": 0, "y": 0 }]"#);
        let a = map.chart().system_by_id("a").unwrap().key();
        let planet = map.add_planet(a, "a1").unwrap();
        assert!(map.pending_updates().is_empty());
        assert!(map.add_moon(planet, "a1m").is_some());
        assert!(map.add_moon(a, "bad").is_none());
        assert_eq!(map.chart().system(a).unwrap().max_moon_count(), 1);
    }

    #[test]
    fn queued_input_applies_on_frame() {
        let mut map = map_with(TWO_SYSTEMS);
        map.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        map.push_input(InputEvent::Zoom { factor: 10.0, x: 400.0, y: 300.0 });
        map.push_input(InputEvent::Pan { dx: 5.0, dy: 0.0 });
        map.start(0.0);
        map.frame(16.0);
        assert_eq!(map.transform().scale, 5.0);
    }

    #[test]
    fn pick_through_viewport() {
        let mut map = map_with(TWO_SYSTEMS);
        map.handle(InputEvent::Resize { width: 800.0, height: 600.0 });
        map.start(0.0);
        map.frame(0.0);
        let hit = map.pick(Point2D::new(0.0, 0.0)).unwrap();
        assert_eq!(hit.kind, BodyKind::System);
        assert_eq!(Some(hit.key), map.chart().system_by_id("a").map(|s| s.key()));
    }
}
