// Coordinate transform and curve model against worked examples
use circuitflow::draw::curve::{control_points, path_descriptor, point_at};
use circuitflow::draw::geometry::{
    global_pos, Component, Footprint, PackageShape, PinRef, PinTemplate, PinType, Trace, Vector2,
};

fn square_footprint() -> Footprint {
    Footprint {
        id: "square".to_string(),
        name: "Square".to_string(),
        width: 50.0,
        height: 50.0,
        pins: vec![PinTemplate {
            id: "1".to_string(),
            name: "1".to_string(),
            local_pos: Vector2::new(10.0, 10.0),
            pin_type: PinType::Io,
            decoration: None,
        }],
        value_kind: None,
        shape: PackageShape::Rect,
    }
}

fn assert_close(actual: Vector2, expected: Vector2) {
    assert!(
        actual.distance(expected) < 1e-9,
        "expected ({}, {}), got ({}, {})",
        expected.x,
        expected.y,
        actual.x,
        actual.y
    );
}

#[test]
fn test_pin_position_unrotated_and_quarter_turn() {
    let footprint = square_footprint();
    let pin = &footprint.pins[0];

    let component = Component::part("U1", "square", Vector2::ZERO);
    assert_eq!(global_pos(&component, pin, Some(&footprint)), Vector2::new(10.0, 10.0));

    let rotated = component.with_rotation(90.0);
    assert_close(global_pos(&rotated, pin, Some(&footprint)), Vector2::new(40.0, 10.0));
}

#[test]
fn test_rotation_is_periodic() {
    let footprint = square_footprint();
    let pin = &footprint.pins[0];
    let base = Component::part("U1", "square", Vector2::new(30.0, -20.0));

    for angle in [0.0, 45.0, 90.0, 180.0, 270.0] {
        let a = global_pos(&base.clone().with_rotation(angle), pin, Some(&footprint));
        let b = global_pos(&base.clone().with_rotation(angle + 360.0), pin, Some(&footprint));
        let c = global_pos(&base.clone().with_rotation(angle - 720.0), pin, Some(&footprint));
        assert_close(a, b);
        assert_close(a, c);
    }
}

#[test]
fn test_unresolved_footprint_falls_back_to_position() {
    let footprint = square_footprint();
    let component = Component::part("U1", "missing", Vector2::new(7.0, 8.0)).with_rotation(90.0);
    assert_eq!(global_pos(&component, &footprint.pins[0], None), Vector2::new(7.0, 8.0));
}

#[test]
fn test_horizontal_auto_control_points() {
    let cp = control_points(Vector2::ZERO, Vector2::new(100.0, 0.0), None);
    assert_eq!(cp.c1, Vector2::new(45.0, 0.0));
    assert_eq!(cp.c2, Vector2::new(55.0, 0.0));
}

#[test]
fn test_short_vertical_span_uses_tension_floor() {
    let cp = control_points(Vector2::ZERO, Vector2::new(5.0, -20.0), None);
    assert_eq!(cp.c1, Vector2::new(0.0, -30.0));
    assert_eq!(cp.c2, Vector2::new(5.0, 10.0));
}

#[test]
fn test_manual_offsets_override_one_side() {
    let mut trace = Trace::new("t1", PinRef::new("A", "1"), PinRef::new("B", "1"));
    trace.c1_offset = Some(Vector2::new(0.0, 40.0));

    let cp = control_points(Vector2::ZERO, Vector2::new(100.0, 0.0), Some(&trace));
    assert_eq!(cp.c1, Vector2::new(0.0, 40.0));
    assert_eq!(cp.c2, Vector2::new(55.0, 0.0));
}

#[test]
fn test_curve_hits_endpoints_exactly() {
    let start = Vector2::new(12.345, -67.891);
    let end = Vector2::new(-98.76, 54.321);
    let mut trace = Trace::new("t1", PinRef::new("A", "1"), PinRef::new("B", "1"));
    trace.c1_offset = Some(Vector2::new(33.3, 11.1));
    trace.c2_offset = Some(Vector2::new(-7.7, 123.4));

    for t in [None, Some(&trace)] {
        assert_eq!(point_at(0.0, start, end, t), start);
        assert_eq!(point_at(1.0, start, end, t), end);
    }
}

#[test]
fn test_path_descriptor_matches_control_points() {
    let start = Vector2::ZERO;
    let end = Vector2::new(100.0, 0.0);
    let curve = path_descriptor(start, end, None);
    assert_eq!(curve.start, start);
    assert_eq!(curve.c1, Vector2::new(45.0, 0.0));
    assert_eq!(curve.c2, Vector2::new(55.0, 0.0));
    assert_eq!(curve.end, end);
    assert_eq!(curve.point_at(0.5), point_at(0.5, start, end, None));
    assert!(curve.to_svg_path().starts_with("M "));
}
