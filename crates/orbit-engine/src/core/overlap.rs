//! Best-effort separation of top-level systems.
//!
//! Iterative relaxation: each pass pushes the proposed position out of every
//! system it overlaps. Residual overlap after the iteration bound is accepted.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::api::config::{OrbitConfig, ResolverConfig};
use crate::api::types::Point2D;
use crate::core::extent::{system_extent, SystemShape};
use crate::core::hash::stable_hash;

/// Relation between the working position and an obstacle center.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Separation {
    /// Distinct centers: unit direction from the obstacle to the position.
    Apart { distance: f64, direction: DVec2 },
    /// Exactly the same center. Direction must come from somewhere else.
    Coincident,
}

fn separation(obstacle: DVec2, position: DVec2) -> Separation {
    let delta = position - obstacle;
    let distance = delta.length();
    if distance == 0.0 {
        Separation::Coincident
    } else {
        Separation::Apart {
            distance,
            direction: delta / distance,
        }
    }
}

/// Deterministic escape direction for two systems sharing a center.
fn coincident_direction(target_id: &str, other_id: &str) -> DVec2 {
    let angle = stable_hash(&format!("{target_id}:{other_id}")) * TAU;
    DVec2::new(angle.cos(), angle.sin())
}

struct Obstacle<'a> {
    id: &'a str,
    center: DVec2,
    radius: f64,
}

/// Outcome of one resolution, for callers that want more than the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveReport {
    pub position: Point2D,
    /// Passes actually run (0 when there was nothing to check).
    pub iterations: u32,
    /// Whether any overlap survives at the returned position.
    pub residual_overlap: bool,
}

/// Pushes a system away from its neighbours until their extents stop overlapping.
#[derive(Debug, Clone, Copy)]
pub struct OverlapResolver {
    orbit: OrbitConfig,
    max_iterations: u32,
}

impl OverlapResolver {
    pub fn new(orbit: OrbitConfig, resolver: ResolverConfig) -> Self {
        Self {
            orbit,
            max_iterations: resolver.max_iterations,
        }
    }

    pub fn extent<S: SystemShape + ?Sized>(&self, system: &S) -> f64 {
        system_extent(system, &self.orbit)
    }

    /// Corrected position for `target` near `proposed`.
    pub fn resolve<T, I>(&self, target: &T, others: I, proposed: Point2D) -> Point2D
    where
        T: SystemShape + ?Sized,
        I: IntoIterator,
        I::Item: SystemShape,
    {
        self.resolve_report(target, others, proposed).position
    }

    pub fn resolve_report<T, I>(&self, target: &T, others: I, proposed: Point2D) -> ResolveReport
    where
        T: SystemShape + ?Sized,
        I: IntoIterator,
        I::Item: SystemShape,
    {
        let target_id = target.id();
        let others: Vec<I::Item> = others.into_iter().collect();
        let obstacles: Vec<Obstacle<'_>> = others
            .iter()
            .filter(|o| o.id() != target_id)
            .map(|o| Obstacle {
                id: o.id(),
                center: o.position(),
                radius: self.extent(o),
            })
            .collect();

        let target_radius = self.extent(target);
        let mut position = proposed;
        let mut iterations = 0;

        if !obstacles.is_empty() {
            for _ in 0..self.max_iterations {
                iterations += 1;
                let mut overlapped = false;
                for obstacle in &obstacles {
                    let min_distance = target_radius + obstacle.radius;
                    let (distance, direction) = match separation(obstacle.center, position) {
                        Separation::Apart { distance, direction } => (distance, direction),
                        Separation::Coincident => {
                            (0.0, coincident_direction(target_id, obstacle.id))
                        }
                    };
                    if distance < min_distance {
                        overlapped = true;
                        position += direction * (min_distance - distance + 1.0);
                    }
                }
                if !overlapped {
                    break;
                }
            }
        }

        let residual_overlap = obstacles
            .iter()
            .any(|o| position.distance(o.center) < target_radius + o.radius);
        if residual_overlap {
            log::debug!(
                "system {target_id}: overlap remains after {iterations} iterations at ({:.1}, {:.1})",
                position.x,
                position.y
            );
        }

        ResolveReport {
            position,
            iterations,
            residual_overlap,
        }
    }
}

impl Default for OverlapResolver {
    fn default() -> Self {
        Self::new(OrbitConfig::default(), ResolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SystemNode;

    /// Empty systems whose extent is exactly 100.
    fn hundred_config() -> OrbitConfig {
        OrbitConfig {
            star_icon_half_size: 68.0,
            margin: 32.0,
            ..OrbitConfig::default()
        }
    }

    fn resolver() -> OverlapResolver {
        OverlapResolver::new(hundred_config(), ResolverConfig::default())
    }

    #[test]
    fn no_others_returns_input_exactly() {
        let r = OverlapResolver::default();
        let target = SystemNode::empty("t", Point2D::ZERO);
        let others: Vec<SystemNode> = Vec::new();
        let p = Point2D::new(12.345, -67.89);
        let report = r.resolve_report(&target, &others, p);
        assert_eq!(report.position, p);
        assert_eq!(report.iterations, 0);
        assert!(!report.residual_overlap);
    }

    #[test]
    fn coincident_systems_separate() {
        let r = resolver();
        let a = SystemNode::empty("a", Point2D::new(0.0, 0.0));
        let b = SystemNode::empty("b", Point2D::new(50.0, 0.0));
        assert_eq!(r.extent(&a), 100.0);

        let out = r.resolve(&b, [&a], a.position);
        assert!(out.distance(a.position) >= 200.0, "distance {}", out.distance(a.position));
    }

    #[test]
    fn partial_overlap_pushes_along_center_line() {
        let r = resolver();
        let a = SystemNode::empty("a", Point2D::ZERO);
        let b = SystemNode::empty("b", Point2D::ZERO);
        let out = r.resolve(&b, [&a], Point2D::new(50.0, 0.0));
        // pushed by 200 - 50 + 1
        assert!((out.x - 201.0).abs() < 1e-9);
        assert!(out.y.abs() < 1e-9);
    }

    #[test]
    fn coincident_tiebreak_is_deterministic() {
        let r = resolver();
        let a = SystemNode::empty("a", Point2D::new(10.0, 10.0));
        let b = SystemNode::empty("b", Point2D::ZERO);
        let first = r.resolve(&b, [&a], a.position);
        let second = r.resolve(&b, [&a], a.position);
        assert_eq!(first, second);
    }

    #[test]
    fn non_overlapping_proposal_is_kept() {
        let r = resolver();
        let a = SystemNode::empty("a", Point2D::ZERO);
        let b = SystemNode::empty("b", Point2D::ZERO);
        let p = Point2D::new(500.0, 0.0);
        let report = r.resolve_report(&b, [&a], p);
        assert_eq!(report.position, p);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn target_is_not_its_own_obstacle() {
        let r = resolver();
        let b = SystemNode::empty("b", Point2D::ZERO);
        let p = Point2D::new(1.0, 1.0);
        assert_eq!(r.resolve(&b, [&b], p), p);
    }

    #[test]
    fn clears_a_ring_of_neighbours() {
        let r = resolver();
        let others: Vec<SystemNode> = (0..4)
            .map(|i| {
                let angle = i as f64 * TAU / 4.0;
                SystemNode::empty(format!("n{i}"), DVec2::new(angle.cos(), angle.sin()) * 150.0)
            })
            .collect();
        let target = SystemNode::empty("t", Point2D::ZERO);
        let report = r.resolve_report(&target, &others, Point2D::new(5.0, 3.0));
        if !report.residual_overlap {
            for o in &others {
                assert!(report.position.distance(o.position) >= 200.0);
            }
        }
        assert!(report.iterations <= 8);
        assert!(report.position.is_finite());
    }

    #[test]
    fn larger_systems_need_more_room() {
        let r = OverlapResolver::default();
        let big = SystemNode::empty("big", Point2D::ZERO)
            .with_planet("p0", &["m0", "m1"])
            .with_planet("p1", &[]);
        let small = SystemNode::empty("small", Point2D::ZERO);
        let out = r.resolve(&small, [&big], Point2D::new(10.0, 0.0));
        let needed = r.extent(&big) + r.extent(&small);
        assert!(out.distance(big.position) >= needed);
    }
}
