use crate::api::config::OrbitConfig;
use crate::api::types::Point2D;
use crate::core::scene::SystemNode;

/// What collision layout needs to know about a system.
/// Implemented by owned snapshots and by chart views alike.
pub trait SystemShape {
    fn id(&self) -> &str;
    fn position(&self) -> Point2D;
    fn planet_count(&self) -> usize;
    /// Largest moon count over all planets (0 when there are none).
    fn max_moon_count(&self) -> usize;
}

impl SystemShape for SystemNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point2D {
        self.position
    }

    fn planet_count(&self) -> usize {
        self.children.len()
    }

    fn max_moon_count(&self) -> usize {
        self.children.iter().map(|p| p.children.len()).max().unwrap_or(0)
    }
}

impl<T: SystemShape + ?Sized> SystemShape for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn position(&self) -> Point2D {
        (**self).position()
    }

    fn planet_count(&self) -> usize {
        (**self).planet_count()
    }

    fn max_moon_count(&self) -> usize {
        (**self).max_moon_count()
    }
}

/// Enclosing-circle radius of a whole system: star, outermost planet orbit,
/// and the widest moon orbit around any planet.
///
/// Conservative rather than tight; it only feeds collision separation.
pub fn system_extent<S: SystemShape + ?Sized>(system: &S, config: &OrbitConfig) -> f64 {
    let planets = system.planet_count();
    if planets == 0 {
        return config.star_icon_half_size + config.margin;
    }

    let outer_planet_orbit =
        config.planet.base_radius + (planets - 1) as f64 * config.planet.radius_step;

    // Moon orbit extent grows with count, so the busiest planet bounds them all.
    let moons = system.max_moon_count();
    let max_moon_extent = if moons > 0 {
        config.moon.base_radius + (moons - 1) as f64 * config.moon.radius_step
    } else {
        0.0
    };

    outer_planet_orbit
        + config.planet.icon_half_size
        + max_moon_extent
        + config.moon.icon_half_size
        + config.margin
}
