// Project files: structural validation at the load boundary and save/load
use circuitflow::draw::drc::{run_drc, DesignRules};
use circuitflow::draw::geometry::{ComponentKind, ContinuityMode, FootprintLibrary, Vector2};
use circuitflow::project::{load_project_file, load_project_str, save_project_file, save_project_string, Project};
use circuitflow::ProjectError;
use std::sync::Arc;

const SAMPLE: &str = r##"{
    "components": [
        {"id": "R1", "name": "R1", "kind": "part", "footprintId": "resistor",
         "position": {"x": 0, "y": 0}, "rotation": 90, "value": "4k7"},
        {"id": "J1", "kind": "junction", "continuity": "linear",
         "position": {"x": 241.3, "y": 12.7}}
    ],
    "traces": [
        {"id": "t1", "from": {"componentId": "R1", "pinId": "2"},
         "to": {"componentId": "J1", "pinId": "p1"},
         "width": 6, "color": "#ef4444", "c1Offset": {"x": 10, "y": -5}},
        {"id": "t2", "from": {"componentId": "J1", "pinId": "p1"},
         "to": {"componentId": "R9", "pinId": "1"},
         "width": 8, "color": "#FCD34D"}
    ]
}"##;

#[test]
fn test_sample_project_parses() {
    let project = load_project_str(SAMPLE).expect("valid project");
    assert_eq!(project.format, "CircuitFlow JSON");
    assert_eq!(project.components.len(), 2);
    assert_eq!(project.traces.len(), 2);

    let r1 = &project.components[0];
    assert_eq!(r1.rotation, 90.0);
    assert_eq!(r1.value.as_deref(), Some("4k7"));
    assert!(matches!(&r1.kind, ComponentKind::Part { footprint_id } if footprint_id == "resistor"));

    let j1 = &project.components[1];
    assert_eq!(j1.continuity(), Some(ContinuityMode::Linear));
    assert!(j1.name.is_empty());

    assert_eq!(project.traces[0].c1_offset, Some(Vector2::new(10.0, -5.0)));
    assert_eq!(project.traces[0].c2_offset, None);
}

#[test]
fn test_dangling_reference_reaches_engine() {
    // t2 points at a component that does not exist; loading still succeeds
    let board = load_project_str(SAMPLE)
        .expect("valid project")
        .into_board(Arc::new(FootprintLibrary::builtin()));
    let t2 = board.trace("t2").expect("t2");
    assert!(board.trace_endpoints(t2).is_none());

    let report = run_drc(&board, &DesignRules::default());
    assert!(!report.is_invalid("t2"));
}

#[test]
fn test_missing_and_mistyped_fields_are_rejected() {
    let err = load_project_str(r#"{"traces": []}"#).unwrap_err();
    assert!(matches!(err, ProjectError::MissingField { ref field } if field == "components"));

    let err = load_project_str(r#"{"components": [], "traces": "none"}"#).unwrap_err();
    assert!(matches!(err, ProjectError::WrongFieldType { ref field, .. } if field == "traces"));

    let err = load_project_str("[]").unwrap_err();
    assert!(matches!(err, ProjectError::WrongFieldType { .. }));

    let err = load_project_str("{not json").unwrap_err();
    assert!(matches!(err, ProjectError::InvalidJson { .. }));

    let err = load_project_str(r#"{"components": [{"id": 3}], "traces": []}"#).unwrap_err();
    assert!(matches!(err, ProjectError::Malformed { .. }));
}

#[test]
fn test_save_then_load_file() {
    let project = load_project_str(SAMPLE).expect("valid project");
    let path = std::env::temp_dir().join(format!("circuitflow_{}_project.json", std::process::id()));

    save_project_file(&project, &path).expect("saved");
    let reloaded = load_project_file(&path).expect("reloaded");
    assert_eq!(reloaded, project);

    let text = save_project_string(&project);
    assert!(text.contains("\"format\": \"CircuitFlow JSON\""));
    assert!(text.contains("\"c1Offset\""));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_missing_file_reports_path() {
    let err = load_project_file("/nonexistent/circuitflow/board.json").unwrap_err();
    assert!(format!("{:#}", err).contains("board.json"));
}

#[test]
fn test_empty_project() {
    let project = Project::new(Vec::new(), Vec::new());
    let text = save_project_string(&project);
    assert_eq!(load_project_str(&text).expect("empty project"), project);
}

#[test]
fn test_browser_editor_file_loads_and_saves_as_current_version() {
    let legacy = r##"{
        "format": "CircuitFlow JSON",
        "version": "1.0",
        "components": [
            {"id": "comp_1", "footprintId": "resistor", "name": "RES1",
             "position": {"x": 0, "y": 0}, "rotation": 0},
            {"id": "comp_junc_2", "footprintId": "PIN", "name": "J2",
             "position": {"x": 241.3, "y": 12.7}, "rotation": 0},
            {"id": "comp_3", "footprintId": "resistor", "name": "RES3",
             "position": {"x": 0, "y": 254}, "rotation": 0}
        ],
        "traces": [
            {"id": "trace_a", "fromPinId": "comp_1_2", "toPinId": "comp_junc_2_p1",
             "width": 8, "color": "#FCD34D"},
            {"id": "trace_b", "fromPinId": "comp_junc_2_p1", "toPinId": "comp_3_2",
             "width": 8, "color": "#FCD34D"}
        ],
        "timestamp": "2025-01-01T00:00:00.000Z"
    }"##;

    let project = load_project_str(legacy).expect("version 1.0 project");
    assert_eq!(project.version, "2.0");
    assert_eq!(project.components[1].continuity(), Some(ContinuityMode::Smooth));

    let board = project.clone().into_board(Arc::new(FootprintLibrary::builtin()));
    for trace in board.traces() {
        assert!(board.trace_endpoints(trace).is_some(), "{} should resolve", trace.id);
    }

    let text = save_project_string(&project);
    assert!(text.contains("\"version\": \"2.0\""));
    assert!(!text.contains("fromPinId"));
    assert_eq!(load_project_str(&text).expect("reloaded"), project);
}
