//! Circular orbit parameters derived from identity and sibling rank.
//!
//! Nothing here carries state between frames: every position is a pure
//! function of (tier, sibling index, id, elapsed seconds).

use std::f64::consts::TAU;

use glam::DVec2;

use crate::api::config::{OrbitConfig, TierConfig};
use crate::core::hash::hash_for;

/// Nesting level of an orbiting body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Orbits a system's star.
    Planet,
    /// Orbits a planet.
    Moon,
}

/// Fixed orbit of one body around its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Distance from the parent center.
    pub radius: f64,
    /// Seconds per revolution (never below the tier's floor).
    pub period_seconds: f64,
    /// Angle at t = 0, in radians.
    pub initial_phase: f64,
    /// +1 or -1.
    pub direction: f64,
}

impl OrbitParams {
    pub fn angular_velocity(&self) -> f64 {
        TAU / self.period_seconds
    }

    /// Orbital angle after `t` seconds of simulated time.
    pub fn angle_at(&self, t: f64) -> f64 {
        self.initial_phase + self.direction * self.angular_velocity() * t
    }

    /// Offset from the parent center after `t` seconds.
    pub fn offset_at(&self, t: f64) -> DVec2 {
        let angle = self.angle_at(t);
        DVec2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// World position after `t` seconds, orbiting `center`.
    pub fn position_at(&self, center: DVec2, t: f64) -> DVec2 {
        center + self.offset_at(t)
    }
}

/// Evaluates orbits for every tier from one set of layout constants.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalModel {
    config: OrbitConfig,
}

impl OrbitalModel {
    pub fn new(config: OrbitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn tier(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Planet => &self.config.planet,
            Tier::Moon => &self.config.moon,
        }
    }

    /// Orbit radius alone, for callers that only need geometry.
    pub fn radius(&self, tier: Tier, sibling_index: usize) -> f64 {
        let c = self.tier(tier);
        c.base_radius + sibling_index as f64 * c.radius_step
    }

    pub fn compute_orbit(&self, tier: Tier, sibling_index: usize, id: &str) -> OrbitParams {
        let c = self.tier(tier);
        let index = sibling_index as f64;
        // One hash feeds both jitter and phase.
        let h = hash_for(id, sibling_index);

        let jitter = (h - 0.5) * c.jitter_range;
        let period_seconds = (c.base_period + index * c.period_step + jitter).max(c.period_floor);

        let even = sibling_index % 2 == 0;
        let direction = if even != c.counter_rotate { 1.0 } else { -1.0 };

        OrbitParams {
            radius: self.radius(tier, sibling_index),
            period_seconds,
            initial_phase: h * TAU,
            direction,
        }
    }
}

impl Default for OrbitalModel {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}
