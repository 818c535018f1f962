use crate::api::config::OrbitConfig;
use crate::api::types::{NodeKey, Point2D};
use crate::core::chart::{Chart, SystemRef};
use crate::core::extent::SystemShape;
use crate::core::orbit::{OrbitalModel, Tier};
use crate::renderer::instance::{BodyBuffer, BodyInstance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    System,
    Planet,
    Moon,
}

impl BodyKind {
    fn code(self) -> f32 {
        match self {
            BodyKind::System => 0.0,
            BodyKind::Planet => 1.0,
            BodyKind::Moon => 2.0,
        }
    }
}

/// A body's world position for one frame, with the orbit it travels on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBody {
    pub key: NodeKey,
    pub kind: BodyKind,
    pub sibling_index: usize,
    pub position: Point2D,
    pub orbit_center: Point2D,
    /// 0 for systems.
    pub orbit_radius: f64,
}

/// Every body's position at one instant. Rebuilt from scratch each frame.
#[derive(Debug, Clone, Default)]
pub struct FrameLayout {
    pub elapsed: f64,
    pub bodies: Vec<PlacedBody>,
}

impl FrameLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn get(&self, key: NodeKey) -> Option<&PlacedBody> {
        self.bodies.iter().find(|b| b.key == key)
    }

    /// Body whose icon contains a world point. Smaller bodies win, then
    /// the closest center.
    pub fn pick(&self, world: Point2D, model: &OrbitalModel) -> Option<&PlacedBody> {
        let config = model.config();
        let mut best: Option<(&PlacedBody, f64, f64)> = None;
        for body in &self.bodies {
            let half_size = icon_half_size(body.kind, config);
            let dist = body.position.distance(world);
            if dist > half_size {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_size, best_dist)) => {
                    half_size < best_size || (half_size == best_size && dist < best_dist)
                }
            };
            if better {
                best = Some((body, half_size, dist));
            }
        }
        best.map(|(body, _, _)| body)
    }
}

fn icon_half_size(kind: BodyKind, config: &OrbitConfig) -> f64 {
    match kind {
        BodyKind::System => config.star_icon_half_size,
        BodyKind::Planet => config.planet.icon_half_size,
        BodyKind::Moon => config.moon.icon_half_size,
    }
}

/// Place every system of the chart at its stored position.
pub fn layout_chart(chart: &Chart, model: &OrbitalModel, elapsed: f64, out: &mut FrameLayout) {
    out.clear();
    out.elapsed = elapsed;
    for system in chart.systems() {
        push_system(&system, system.position(), model, elapsed, out);
    }
}

/// Place one system with its star drawn at `center` (the preview ignores
/// the stored map position).
pub fn layout_system(
    system: &SystemRef<'_>,
    center: Point2D,
    model: &OrbitalModel,
    elapsed: f64,
    out: &mut FrameLayout,
) {
    out.clear();
    out.elapsed = elapsed;
    push_system(system, center, model, elapsed, out);
}

fn push_system(
    system: &SystemRef<'_>,
    center: Point2D,
    model: &OrbitalModel,
    elapsed: f64,
    out: &mut FrameLayout,
) {
    out.bodies.push(PlacedBody {
        key: system.key(),
        kind: BodyKind::System,
        sibling_index: 0,
        position: center,
        orbit_center: center,
        orbit_radius: 0.0,
    });

    for planet in system.planets() {
        let orbit = model.compute_orbit(Tier::Planet, planet.sibling_index, planet.id);
        let planet_pos = orbit.position_at(center, elapsed);
        out.bodies.push(PlacedBody {
            key: planet.key,
            kind: BodyKind::Planet,
            sibling_index: planet.sibling_index,
            position: planet_pos,
            orbit_center: center,
            orbit_radius: orbit.radius,
        });

        for moon in system.moons(planet.key) {
            let orbit = model.compute_orbit(Tier::Moon, moon.sibling_index, moon.id);
            out.bodies.push(PlacedBody {
                key: moon.key,
                kind: BodyKind::Moon,
                sibling_index: moon.sibling_index,
                position: orbit.position_at(planet_pos, elapsed),
                orbit_center: planet_pos,
                orbit_radius: orbit.radius,
            });
        }
    }
}

/// Pack a layout into the flat renderer buffer.
pub fn build_body_buffer(layout: &FrameLayout, model: &OrbitalModel, buffer: &mut BodyBuffer) {
    buffer.clear();
    let config = model.config();
    for body in &layout.bodies {
        let half_size = icon_half_size(body.kind, config);
        buffer.push(BodyInstance {
            x: body.position.x as f32,
            y: body.position.y as f32,
            half_size: half_size as f32,
            kind: body.kind.code(),
            sibling_index: body.sibling_index as f32,
            orbit_x: body.orbit_center.x as f32,
            orbit_y: body.orbit_center.y as f32,
            orbit_radius: body.orbit_radius as f32,
        });
    }
}
