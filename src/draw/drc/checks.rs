//! Clearance checks
//!
//! Trace-vs-trace and trace-vs-pad tests. Each check stops at the first
//! colliding sample, so one pair yields at most one violation.

use super::distance::{first_collision, first_point_near, SampledTrace};
use super::types::{DrcViolation, ViolationKind};
use crate::draw::geometry::ResolvedPin;

/// Check if two traces should be DRC-checked against each other
///
/// Traces meeting at a shared pin touch by construction.
pub fn should_check_pair(a: &SampledTrace, b: &SampledTrace) -> bool {
    !a.is_connected_to(b)
}

/// Clearance between two traces; marker at the midpoint of the first hit
pub fn check_trace_pair(a: &SampledTrace, b: &SampledTrace, clearance: f64) -> Option<DrcViolation> {
    if !should_check_pair(a, b) {
        return None;
    }
    if a.aabb_distance(b) >= clearance {
        return None;
    }

    let (pa, pb) = first_collision(&a.points, &b.points, clearance)?;
    Some(DrcViolation {
        kind: ViolationKind::TraceTrace {
            trace_a: a.id.clone(),
            trace_b: b.id.clone(),
        },
        location: pa.midpoint(pb),
        distance: pa.distance(pb),
    })
}

/// Clearance between a trace and the pads of one component
///
/// Pins that are endpoints of the trace are skipped. Pins are visited in
/// footprint order and the first colliding sample is reported.
pub fn check_trace_pads(trace: &SampledTrace, pins: &[ResolvedPin], clearance: f64) -> Option<DrcViolation> {
    pins.iter()
        .filter(|pin| !trace.has_endpoint(&pin.pin_ref))
        .filter(|pin| trace.aabb_point_distance(pin.position) < clearance)
        .find_map(|pin| {
            first_point_near(&trace.points, pin.position, clearance).map(|pt| DrcViolation {
                kind: ViolationKind::TracePad {
                    trace: trace.id.clone(),
                    pin: pin.pin_ref.clone(),
                },
                location: pt,
                distance: pt.distance(pin.position),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::{PinRef, PinType, Vector2};

    fn line(id: &str, from: PinRef, to: PinRef, y: f64) -> SampledTrace {
        let points = (0..15).map(|i| Vector2::new(i as f64 * 10.0, y)).collect();
        SampledTrace::new(id.to_string(), from, to, points)
    }

    fn pad(component: &str, pin: &str, x: f64, y: f64) -> ResolvedPin {
        ResolvedPin {
            pin_ref: PinRef::new(component, pin),
            position: Vector2::new(x, y),
            pin_type: PinType::Io,
            on_junction: false,
        }
    }

    #[test]
    fn test_connected_pair_is_skipped() {
        let shared = PinRef::new("J1", "p1");
        let a = line("a", PinRef::new("A", "1"), shared.clone(), 0.0);
        let b = line("b", shared, PinRef::new("B", "1"), 0.0);
        assert!(check_trace_pair(&a, &b, 11.43).is_none());
    }

    #[test]
    fn test_close_pair_reports_midpoint() {
        let a = line("a", PinRef::new("A", "1"), PinRef::new("A", "2"), 0.0);
        let b = line("b", PinRef::new("B", "1"), PinRef::new("B", "2"), 10.0);
        let v = check_trace_pair(&a, &b, 11.43).expect("expected violation");
        assert_eq!(v.location, Vector2::new(0.0, 5.0));
        assert_eq!(v.trace_ids(), vec!["a", "b"]);

        let far = line("c", PinRef::new("C", "1"), PinRef::new("C", "2"), 15.0);
        assert!(check_trace_pair(&a, &far, 11.43).is_none());
    }

    #[test]
    fn test_own_endpoint_pad_is_ignored() {
        let a = line("a", PinRef::new("A", "1"), PinRef::new("A", "2"), 0.0);
        let own = [pad("A", "1", 0.0, 0.0)];
        assert!(check_trace_pads(&a, &own, 11.43).is_none());

        let foreign = [pad("A", "1", 0.0, 0.0), pad("X", "1", 72.0, 3.0)];
        let v = check_trace_pads(&a, &foreign, 11.43).expect("expected pad violation");
        assert_eq!(v.location, Vector2::new(70.0, 0.0));
        match v.kind {
            ViolationKind::TracePad { pin, .. } => assert_eq!(pin, PinRef::new("X", "1")),
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
