//! Cubic Bezier model of a routed trace
//!
//! Control points are either derived automatically along the dominant axis
//! between the two pins, or taken from the trace's manual offsets. Offsets
//! are stored relative to their pin, so a handle travels with its endpoint
//! when a component moves.
//!
//! Sampling is uniform in the curve parameter, not in arc length.

use crate::draw::geometry::{Trace, Vector2};
use serde::Serialize;

/// Fraction of the pin-to-pin delta used as automatic tangent length
pub const AUTO_TENSION_FACTOR: f64 = 0.45;
/// Minimum automatic tangent length, keeps close pins visibly curved
pub const MIN_TENSION: f64 = 30.0;

/// Interior control points of a trace curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPoints {
    pub c1: Vector2,
    pub c2: Vector2,
}

/// Automatic tangent vector for a start/end pair
///
/// Points along whichever axis has the larger delta (horizontal on ties),
/// zero on the other axis.
pub fn auto_tangent(start: Vector2, end: Vector2) -> Vector2 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx.abs() >= dy.abs() {
        Vector2::new(tension(dx), 0.0)
    } else {
        Vector2::new(0.0, tension(dy))
    }
}

fn tension(delta: f64) -> f64 {
    // sign(0) is 0: coincident pins get no automatic tangent
    let sign = if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else {
        0.0
    };
    sign * (delta.abs() * AUTO_TENSION_FACTOR).max(MIN_TENSION)
}

/// Control points for a curve from `start` to `end`
pub fn control_points(start: Vector2, end: Vector2, trace: Option<&Trace>) -> ControlPoints {
    let c1_offset = trace.and_then(|t| t.c1_offset);
    let c2_offset = trace.and_then(|t| t.c2_offset);

    // Only derive the automatic tangent when a side actually needs it
    let auto = if c1_offset.is_none() || c2_offset.is_none() {
        auto_tangent(start, end)
    } else {
        Vector2::ZERO
    };

    ControlPoints {
        c1: start + c1_offset.unwrap_or(auto),
        c2: end + c2_offset.unwrap_or(-auto),
    }
}

/// Point on the curve at parameter `t` in [0, 1]
pub fn point_at(t: f64, start: Vector2, end: Vector2, trace: Option<&Trace>) -> Vector2 {
    CubicBezier::for_trace(start, end, trace).point_at(t)
}

/// Path descriptor for a trace curve
pub fn path_descriptor(start: Vector2, end: Vector2, trace: Option<&Trace>) -> CubicBezier {
    CubicBezier::for_trace(start, end, trace)
}

/// Cubic Bezier segment: start, two control points, end
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicBezier {
    pub start: Vector2,
    pub c1: Vector2,
    pub c2: Vector2,
    pub end: Vector2,
}

impl CubicBezier {
    pub fn new(start: Vector2, c1: Vector2, c2: Vector2, end: Vector2) -> Self {
        Self { start, c1, c2, end }
    }

    pub fn for_trace(start: Vector2, end: Vector2, trace: Option<&Trace>) -> Self {
        let ControlPoints { c1, c2 } = control_points(start, end, trace);
        Self { start, c1, c2, end }
    }

    pub fn control_points(&self) -> ControlPoints {
        ControlPoints {
            c1: self.c1,
            c2: self.c2,
        }
    }

    /// Bernstein-basis evaluation; the endpoints are returned verbatim
    pub fn point_at(&self, t: f64) -> Vector2 {
        if t <= 0.0 {
            return self.start;
        }
        if t >= 1.0 {
            return self.end;
        }

        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let t2 = t * t;
        let a = mt2 * mt;
        let b = 3.0 * mt2 * t;
        let c = 3.0 * mt * t2;
        let d = t2 * t;

        Vector2::new(
            a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
            a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
        )
    }

    /// `count` points at uniform parameter steps, both endpoints included
    pub fn sample(&self, count: usize) -> Vec<Vector2> {
        match count {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let last = (count - 1) as f64;
                (0..count).map(|i| self.point_at(i as f64 / last)).collect()
            }
        }
    }

    /// Axis-aligned bounds of the control polygon [min_x, min_y, max_x, max_y]
    ///
    /// The curve lies inside its control polygon's hull, so this is a
    /// conservative envelope.
    pub fn bounds(&self) -> [f64; 4] {
        let pts = [self.start, self.c1, self.c2, self.end];
        let mut b = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
        for p in pts {
            b[0] = b[0].min(p.x);
            b[1] = b[1].min(p.y);
            b[2] = b[2].max(p.x);
            b[3] = b[3].max(p.y);
        }
        b
    }

    /// SVG path data (`M ... C ...`)
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x, self.start.y, self.c1.x, self.c1.y, self.c2.x, self.c2.y, self.end.x, self.end.y
        )
    }
}
