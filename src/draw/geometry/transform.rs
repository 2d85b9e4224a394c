//! Component-local to board-global coordinate transform
//!
//! Pins are rotated about the footprint center, then translated by the
//! component position. Nothing here is cached: callers recompute after
//! every edit.

use super::types::{normalize_rotation, Component, Footprint, PinTemplate, Vector2};

/// Rotate `v` by `degrees` (counter-clockwise in a y-up frame, clockwise on screen)
pub fn rotate(v: Vector2, degrees: f64) -> Vector2 {
    let rad = normalize_rotation(degrees).to_radians();
    let (sin, cos) = rad.sin_cos();
    Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Board-global position of `pin` on `component`
///
/// Falls back to the raw component position when the footprint could not
/// be resolved (e.g. a placement that is still being dragged in).
pub fn global_pos(component: &Component, pin: &PinTemplate, footprint: Option<&Footprint>) -> Vector2 {
    let Some(footprint) = footprint else {
        return component.position;
    };

    let rotation = component.normalized_rotation();
    if rotation == 0.0 {
        return component.position + pin.local_pos;
    }

    let center = footprint.center();
    let local = pin.local_pos - center;
    let rotated = rotate(local, rotation);

    component.position + rotated + center
}

/// Component position that puts the footprint's first pin on `target`
///
/// Used when placing or dragging a part so that the pin, not the outline
/// corner, lands on the snapped grid point.
pub fn position_for_pin_target(footprint: Option<&Footprint>, target: Vector2, rotation: f64) -> Vector2 {
    let Some(footprint) = footprint else {
        return target;
    };
    let Some(first_pin) = footprint.pins.first() else {
        return target;
    };

    let center = footprint.center();
    let rotated = rotate(first_pin.local_pos - center, rotation);
    target - (rotated + center)
}

/// Snap a coordinate to the grid
pub fn snap(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Snap a point; junctions use half the grid so they can sit between pins
pub fn snap_point(p: Vector2, grid_unit: f64, is_junction: bool) -> Vector2 {
    let grid = if is_junction { grid_unit / 2.0 } else { grid_unit };
    Vector2::new(snap(p.x, grid), snap(p.y, grid))
}
