//! Distance calculation for DRC
//!
//! Traces are checked as sampled point sets. Each set carries a precomputed
//! AABB so distant pairs are rejected before the point-by-point scan.

use crate::draw::geometry::{PinRef, Vector2};

/// A trace reduced to its curve samples, with AABB for fast rejection
#[derive(Clone, Debug)]
pub struct SampledTrace {
    pub id: String,
    pub from: PinRef,
    pub to: PinRef,
    pub points: Vec<Vector2>,
    pub aabb_min: Vector2,
    pub aabb_max: Vector2,
}

impl SampledTrace {
    pub fn new(id: String, from: PinRef, to: PinRef, points: Vec<Vector2>) -> Self {
        let mut aabb_min = Vector2::new(f64::MAX, f64::MAX);
        let mut aabb_max = Vector2::new(f64::MIN, f64::MIN);
        for p in &points {
            aabb_min.x = aabb_min.x.min(p.x);
            aabb_min.y = aabb_min.y.min(p.y);
            aabb_max.x = aabb_max.x.max(p.x);
            aabb_max.y = aabb_max.y.max(p.y);
        }
        Self {
            id,
            from,
            to,
            points,
            aabb_min,
            aabb_max,
        }
    }

    /// True if the two traces share an endpoint pin
    pub fn is_connected_to(&self, other: &SampledTrace) -> bool {
        self.from == other.from || self.from == other.to || self.to == other.from || self.to == other.to
    }

    pub fn has_endpoint(&self, pin: &PinRef) -> bool {
        &self.from == pin || &self.to == pin
    }

    /// Fast AABB-to-AABB distance (lower bound)
    pub fn aabb_distance(&self, other: &SampledTrace) -> f64 {
        let dx = (self.aabb_min.x.max(other.aabb_min.x) - self.aabb_max.x.min(other.aabb_max.x)).max(0.0);
        let dy = (self.aabb_min.y.max(other.aabb_min.y) - self.aabb_max.y.min(other.aabb_max.y)).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Lower bound on the distance from `p` to any sample
    pub fn aabb_point_distance(&self, p: Vector2) -> f64 {
        let dx = (self.aabb_min.x - p.x).max(p.x - self.aabb_max.x).max(0.0);
        let dy = (self.aabb_min.y - p.y).max(p.y - self.aabb_max.y).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Strictly closer than `min_distance`
pub fn within_clearance(a: Vector2, b: Vector2, min_distance: f64) -> bool {
    a.distance_squared(b) < min_distance * min_distance
}

/// First sample pair, in scan order, closer than `clearance`
pub fn first_collision(a: &[Vector2], b: &[Vector2], clearance: f64) -> Option<(Vector2, Vector2)> {
    for &pa in a {
        for &pb in b {
            if within_clearance(pa, pb, clearance) {
                return Some((pa, pb));
            }
        }
    }
    None
}

/// First sample closer than `clearance` to `p`
pub fn first_point_near(points: &[Vector2], p: Vector2, clearance: f64) -> Option<Vector2> {
    points.iter().copied().find(|&q| within_clearance(q, p, clearance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled(id: &str, points: Vec<Vector2>) -> SampledTrace {
        SampledTrace::new(id.to_string(), PinRef::new(id, "a"), PinRef::new(id, "b"), points)
    }

    #[test]
    fn test_aabb_distance() {
        let a = sampled("a", vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)]);
        let b = sampled("b", vec![Vector2::new(2.0, 0.0), Vector2::new(3.0, 1.0)]);
        assert!((a.aabb_distance(&b) - 1.0).abs() < 0.01);
        assert_eq!(a.aabb_distance(&a), 0.0);
        assert!((a.aabb_point_distance(Vector2::new(4.0, 5.0)) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_within_clearance_is_strict() {
        assert!(within_clearance(Vector2::ZERO, Vector2::new(0.0, 9.99), 10.0));
        assert!(!within_clearance(Vector2::ZERO, Vector2::new(0.0, 10.0), 10.0));
    }

    #[test]
    fn test_first_collision_scan_order() {
        let a = [Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)];
        let b = [Vector2::new(10.0, 1.0), Vector2::new(0.0, 1.0)];
        // a[0] is checked against all of b before a[1]
        assert_eq!(first_collision(&a, &b, 2.0), Some((a[0], b[1])));
        assert_eq!(first_collision(&a, &b, 0.5), None);
    }
}
