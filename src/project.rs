//! Project persistence boundary
//!
//! Only structural validation happens here: the top level must carry
//! `components` and `traces` arrays. Anything that passes is handed to the
//! engine as-is; dangling references are the engine's business.
//!
//! Version 1.0 files from the browser editor are upgraded on load: their
//! junctions are `footprintId: "PIN"` parts and their trace ends are
//! composite `"<componentId>_<pinId>"` strings.

use crate::draw::geometry::{Board, Component, FootprintLibrary, Trace, JUNCTION_FOOTPRINT_ID};
use crate::error::{ProjectError, ProjectResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;

pub const PROJECT_FORMAT: &str = "CircuitFlow JSON";
pub const PROJECT_VERSION: &str = "2.0";

/// Junction footprint id used by version 1.0 files
const LEGACY_JUNCTION_FOOTPRINT_ID: &str = "PIN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub components: Vec<Component>,
    pub traces: Vec<Trace>,
}

fn default_format() -> String {
    PROJECT_FORMAT.to_string()
}

fn default_version() -> String {
    PROJECT_VERSION.to_string()
}

impl Project {
    pub fn new(components: Vec<Component>, traces: Vec<Trace>) -> Self {
        Self {
            format: default_format(),
            version: default_version(),
            components,
            traces,
        }
    }

    pub fn from_board(board: &Board) -> Self {
        Self::new(board.components().to_vec(), board.traces().to_vec())
    }

    pub fn into_board(self, library: Arc<FootprintLibrary>) -> Board {
        Board::new(library, self.components, self.traces)
    }
}

/// Parse a project, checking the top-level shape first
pub fn load_project_str(text: &str) -> ProjectResult<Project> {
    let mut value: Value =
        serde_json::from_str(text).map_err(|e| ProjectError::InvalidJson { reason: e.to_string() })?;

    let Some(object) = value.as_object_mut() else {
        return Err(ProjectError::wrong_type("<root>", "an object"));
    };
    for field in ["components", "traces"] {
        match object.get(field) {
            None => return Err(ProjectError::missing(field)),
            Some(v) if !v.is_array() => return Err(ProjectError::wrong_type(field, "an array")),
            Some(_) => {}
        }
    }

    let upgraded = upgrade_legacy(object);
    if upgraded > 0 {
        tracing::info!("[Project] Upgraded {} version 1.0 entries", upgraded);
        object.insert("version".to_string(), json!(PROJECT_VERSION));
    }

    let project: Project =
        serde_json::from_value(value).map_err(|e| ProjectError::Malformed { reason: e.to_string() })?;

    tracing::info!(
        "[Project] Parsed {} components, {} traces",
        project.components.len(),
        project.traces.len()
    );
    Ok(project)
}

/// Rewrite version 1.0 components and traces in place; returns how many
/// entries changed
fn upgrade_legacy(root: &mut Map<String, Value>) -> usize {
    let component_ids: Vec<String> = root
        .get("components")
        .and_then(Value::as_array)
        .map(|components| {
            components
                .iter()
                .filter_map(|c| c.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut upgraded = 0;

    if let Some(Value::Array(components)) = root.get_mut("components") {
        for component in components.iter_mut().filter_map(Value::as_object_mut) {
            if component.contains_key("kind") {
                continue;
            }
            let Some(footprint_id) = component.remove("footprintId") else {
                continue;
            };
            let junction_type = component.remove("junctionType");
            let is_junction = matches!(
                footprint_id.as_str(),
                Some(LEGACY_JUNCTION_FOOTPRINT_ID) | Some(JUNCTION_FOOTPRINT_ID)
            );
            if is_junction {
                component.insert("kind".to_string(), json!("junction"));
                if let Some(mode) = junction_type {
                    component.insert("continuity".to_string(), mode);
                }
            } else {
                component.insert("kind".to_string(), json!("part"));
                component.insert("footprintId".to_string(), footprint_id);
            }
            upgraded += 1;
        }
    }

    if let Some(Value::Array(traces)) = root.get_mut("traces") {
        for trace in traces.iter_mut().filter_map(Value::as_object_mut) {
            let mut changed = false;
            for (legacy, field) in [("fromPinId", "from"), ("toPinId", "to")] {
                if trace.contains_key(field) {
                    continue;
                }
                let Some(Value::String(composite)) = trace.remove(legacy) else {
                    continue;
                };
                let (component_id, pin_id) = split_composite_pin(&composite, &component_ids);
                trace.insert(
                    field.to_string(),
                    json!({ "componentId": component_id, "pinId": pin_id }),
                );
                changed = true;
            }
            if changed {
                upgraded += 1;
            }
        }
    }

    upgraded
}

/// Split `"<componentId>_<pinId>"`, preferring the longest known component
/// id since ids themselves contain underscores
fn split_composite_pin<'a>(composite: &'a str, component_ids: &[String]) -> (&'a str, &'a str) {
    let owner = component_ids
        .iter()
        .filter_map(|id| {
            let pin = composite.strip_prefix(id.as_str())?.strip_prefix('_')?;
            Some((id.len(), pin))
        })
        .max_by_key(|&(len, _)| len);

    match owner {
        Some((len, pin)) => (&composite[..len], pin),
        None => composite.rsplit_once('_').unwrap_or((composite, "")),
    }
}

pub fn save_project_string(project: &Project) -> String {
    // Plain data with string keys; serialization cannot fail
    serde_json::to_string_pretty(project).unwrap_or_default()
}

pub fn load_project_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Project> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(ProjectError::from)
        .with_context(|| format!("Failed to read project: {}", path.display()))?;
    load_project_str(&text).with_context(|| format!("Failed to load project: {}", path.display()))
}

pub fn save_project_file<P: AsRef<Path>>(project: &Project, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, save_project_string(project))
        .with_context(|| format!("Failed to write project: {}", path.display()))?;
    tracing::info!("[Project] Saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::{ComponentKind, ContinuityMode, PinRef, Vector2};

    #[test]
    fn test_missing_traces_rejected() {
        let err = load_project_str(r#"{"components": []}"#).unwrap_err();
        assert!(matches!(err, ProjectError::MissingField { ref field } if field == "traces"));
        assert!(err.to_string().contains("traces"));
    }

    #[test]
    fn test_non_array_rejected() {
        let err = load_project_str(r#"{"components": {}, "traces": []}"#).unwrap_err();
        assert!(matches!(err, ProjectError::WrongFieldType { .. }));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            load_project_str("{not json").unwrap_err(),
            ProjectError::InvalidJson { .. }
        ));
    }

    #[test]
    fn test_save_then_load_preserves_board() {
        let mut trace = Trace::new("t1", PinRef::new("R1", "1"), PinRef::new("J1", "p1"));
        trace.c1_offset = Some(Vector2::new(10.0, -5.0));
        let project = Project::new(
            vec![
                Component::part("R1", "resistor", Vector2::new(0.0, 0.0)).with_rotation(90.0),
                Component::junction("J1", Vector2::new(100.0, 50.0)),
            ],
            vec![trace],
        );

        let text = save_project_string(&project);
        assert!(text.contains("\"kind\": \"junction\""));
        assert!(text.contains("\"footprintId\": \"resistor\""));
        let loaded = load_project_str(&text).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_dangling_reference_passes_boundary() {
        let text = r##"{
            "components": [],
            "traces": [{
                "id": "t1",
                "from": {"componentId": "gone", "pinId": "1"},
                "to": {"componentId": "gone", "pinId": "2"},
                "width": 8,
                "color": "#FCD34D"
            }]
        }"##;
        let project = load_project_str(text).unwrap();
        assert_eq!(project.format, PROJECT_FORMAT);
        assert_eq!(project.traces.len(), 1);
    }

    #[test]
    fn test_split_composite_pin() {
        let ids = vec!["comp_1".to_string(), "comp_junc_2".to_string(), "comp".to_string()];
        assert_eq!(split_composite_pin("comp_1_p16", &ids), ("comp_1", "p16"));
        assert_eq!(split_composite_pin("comp_junc_2_p1", &ids), ("comp_junc_2", "p1"));
        assert_eq!(split_composite_pin("comp_9_A", &ids), ("comp_9", "A"));
        assert_eq!(split_composite_pin("orphan", &ids), ("orphan", ""));
    }

    #[test]
    fn test_version_one_file_is_upgraded() {
        let text = r##"{
            "format": "CircuitFlow JSON",
            "version": "1.0",
            "components": [
                {"id": "comp_1", "footprintId": "resistor", "name": "RES1",
                 "position": {"x": 0, "y": 0}, "rotation": 0, "value": "10k"},
                {"id": "comp_junc_2", "footprintId": "PIN", "name": "J2",
                 "position": {"x": 100, "y": 50}, "rotation": 0, "junctionType": "independent"}
            ],
            "traces": [{
                "id": "trace_1", "fromPinId": "comp_1_2", "toPinId": "comp_junc_2_p1",
                "width": 8, "color": "#FCD34D", "c1Offset": {"x": 5, "y": 0}
            }],
            "timestamp": "2025-01-01T00:00:00.000Z"
        }"##;
        let project = load_project_str(text).unwrap();
        assert_eq!(project.version, PROJECT_VERSION);
        assert!(matches!(&project.components[0].kind, ComponentKind::Part { footprint_id } if footprint_id == "resistor"));
        assert_eq!(project.components[1].continuity(), Some(ContinuityMode::Independent));
        assert_eq!(project.traces[0].from, PinRef::new("comp_1", "2"));
        assert_eq!(project.traces[0].to, PinRef::new("comp_junc_2", "p1"));
        assert_eq!(project.traces[0].c1_offset, Some(Vector2::new(5.0, 0.0)));
    }
}
