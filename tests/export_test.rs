// G-code and SVG export over a small two-part board
use circuitflow::draw::curve::point_at;
use circuitflow::draw::geometry::{Board, Component, FootprintLibrary, PinRef, Trace, Vector2};
use circuitflow::export::{gcode_to_file, gcode_to_string, svg_to_file, svg_to_string, GcodeOptions};
use std::sync::Arc;

fn sample_board() -> Board {
    let mut r1 = Component::part("R1", "resistor", Vector2::new(0.0, 0.0));
    r1.name = "R1 <load>".to_string();
    let components = vec![
        r1,
        Component::part("R2", "resistor", Vector2::new(0.0, 254.0)),
        Component::junction("J1", Vector2::new(241.3, 114.3)),
    ];
    let traces = vec![
        Trace::new("t1", PinRef::new("R1", "2"), PinRef::new("J1", "p1")),
        Trace::new("t2", PinRef::new("J1", "p1"), PinRef::new("R2", "2")),
        Trace::new("dangling", PinRef::new("R1", "1"), PinRef::new("gone", "1")),
    ];
    Board::new(Arc::new(FootprintLibrary::builtin()), components, traces)
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("circuitflow_{}_{}", std::process::id(), name))
}

#[test]
fn test_gcode_structure() {
    let board = sample_board();
    let gcode = gcode_to_string(&board, &GcodeOptions::default());

    assert!(gcode.starts_with("(CircuitFlow GRBL Export)\n"));
    assert!(gcode.ends_with("M30 (End Program)"));

    let drilling = gcode.find("(Drilling Pads)").expect("drilling section");
    let milling = gcode.find("(Milling Traces)").expect("milling section");
    assert!(drilling < milling);

    // Two resistors with two pins each; the junction is not drilled
    let plunges = gcode[drilling..milling].matches("G1 Z-0.1 F200").count();
    assert_eq!(plunges, 4);

    assert!(gcode.contains("(Trace t1)"));
    assert!(gcode.contains("(Trace t2)"));
    assert!(!gcode.contains("(Trace dangling)"));
}

#[test]
fn test_gcode_follows_curve_model() {
    let board = sample_board();
    let options = GcodeOptions::with_steps(4);
    let gcode = gcode_to_string(&board, &options);

    let trace = board.trace("t1").expect("t1");
    let (start, end) = board.trace_endpoints(trace).expect("endpoints");
    let mid = point_at(0.5, start, end, Some(trace));
    assert!(gcode.contains(&format!("G1 X{:.3} Y{:.3}", mid.x, mid.y)));
    assert!(gcode.contains(&format!("G1 X{:.3} Y{:.3}", end.x, end.y)));

    let section = &gcode[gcode.find("(Trace t1)").expect("t1 block")..];
    let moves = section
        .lines()
        .skip(3)
        .take_while(|l| l.starts_with("G1 X"))
        .count();
    assert_eq!(moves, 4);
}

#[test]
fn test_svg_contains_traces_and_escaped_labels() {
    let svg = svg_to_string(&sample_board()).expect("svg");
    assert!(svg.starts_with("<svg "));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<path ").count(), 2);
    assert!(svg.contains("R1 &lt;load&gt;"));
    assert!(!svg.contains("<load>"));
}

#[test]
fn test_svg_empty_board_is_none() {
    let board = Board::new(Arc::new(FootprintLibrary::builtin()), Vec::new(), Vec::new());
    assert!(svg_to_string(&board).is_none());

    let path = temp_path("empty.svg");
    assert!(svg_to_file(&board, &path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_exports_write_files() {
    let board = sample_board();

    let gcode_path = temp_path("board.nc");
    gcode_to_file(&board, &GcodeOptions::default(), &gcode_path).expect("gcode written");
    let written = std::fs::read_to_string(&gcode_path).expect("read gcode");
    assert_eq!(written, gcode_to_string(&board, &GcodeOptions::default()));

    let svg_path = temp_path("board.svg");
    svg_to_file(&board, &svg_path).expect("svg written");
    let written = std::fs::read_to_string(&svg_path).expect("read svg");
    assert_eq!(Some(written), svg_to_string(&board));

    let _ = std::fs::remove_file(gcode_path);
    let _ = std::fs::remove_file(svg_path);
}
