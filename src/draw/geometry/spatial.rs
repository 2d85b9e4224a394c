//! Spatial indexing for hit testing
//!
//! Resolved pins go into an R-tree so pointer queries stay cheap on large
//! boards. Traces are hit-tested by sampling their curve.

use super::board::{Board, ResolvedPin};
use super::types::{PinRef, Trace, Vector2};
use crate::draw::curve::CubicBezier;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Pin wrapper for R-tree spatial indexing
#[derive(Clone, Debug)]
pub struct IndexedPin {
    pub pin: ResolvedPin,
}

impl RTreeObject for IndexedPin {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pin.position.as_array())
    }
}

impl PointDistance for IndexedPin {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.pin.position.distance_squared(Vector2::new(point[0], point[1]))
    }
}

/// R-tree over every resolvable pin of one board snapshot
pub struct PinIndex {
    tree: RTree<IndexedPin>,
}

impl PinIndex {
    pub fn build(board: &Board) -> Self {
        let pins: Vec<IndexedPin> = board
            .resolved_pins()
            .into_iter()
            .map(|pin| IndexedPin { pin })
            .collect();
        Self {
            tree: RTree::bulk_load(pins),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Closest pin strictly within `radius` of `point`, skipping `exclude`
    pub fn pin_at(&self, point: Vector2, radius: f64, exclude: Option<&PinRef>) -> Option<&ResolvedPin> {
        let query = point.as_array();
        let r2 = radius * radius;
        self.tree
            .locate_within_distance(query, r2)
            .filter(|p| p.distance_2(&query) < r2)
            .filter(|p| exclude.map_or(true, |ex| &p.pin.pin_ref != ex))
            .min_by(|a, b| a.distance_2(&query).total_cmp(&b.distance_2(&query)))
            .map(|p| &p.pin)
    }
}

/// Topmost (last drawn) trace passing strictly within `radius` of `point`
///
/// Each curve is checked at `samples + 1` uniform parameter steps.
pub fn trace_at<'a>(board: &'a Board, point: Vector2, radius: f64, samples: usize) -> Option<&'a Trace> {
    let r2 = radius * radius;
    let samples = samples.max(1);
    board.traces().iter().rev().find(|trace| {
        let Some((start, end)) = board.trace_endpoints(trace) else {
            return false;
        };
        let curve = CubicBezier::for_trace(start, end, Some(trace));
        (0..=samples).any(|i| {
            let t = i as f64 / samples as f64;
            curve.point_at(t).distance_squared(point) < r2
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::library::FootprintLibrary;
    use crate::draw::geometry::types::Component;
    use std::sync::Arc;

    fn board() -> Board {
        Board::new(
            Arc::new(FootprintLibrary::builtin()),
            vec![
                Component::part("R1", "resistor", Vector2::new(0.0, 0.0)),
                Component::part("R2", "resistor", Vector2::new(0.0, 200.0)),
            ],
            vec![Trace::new("t1", PinRef::new("R1", "2"), PinRef::new("R2", "2"))],
        )
    }

    #[test]
    fn test_pin_at() {
        let board = board();
        let index = PinIndex::build(&board);
        assert_eq!(index.len(), 4);

        let hit = index.pin_at(Vector2::new(30.0, 20.0), 15.0, None).unwrap();
        assert_eq!(hit.pin_ref, PinRef::new("R1", "1"));

        let excluded = PinRef::new("R1", "1");
        assert!(index.pin_at(Vector2::new(30.0, 20.0), 15.0, Some(&excluded)).is_none());
        assert!(index.pin_at(Vector2::new(500.0, 500.0), 15.0, None).is_none());
    }

    #[test]
    fn test_trace_at() {
        let board = board();
        // The trace runs vertically from (127, 25.4) to (127, 225.4)
        assert_eq!(trace_at(&board, Vector2::new(130.0, 125.0), 25.0, 20).map(|t| t.id.as_str()), Some("t1"));
        assert!(trace_at(&board, Vector2::new(400.0, 125.0), 25.0, 20).is_none());
    }
}
