//! Board editing operations
//!
//! Each operation takes a published `Board` and returns a new one. Nothing
//! here mutates a snapshot in place, and operations that move pins run
//! continuity propagation before returning, so the caller publishes
//! components and traces together.

use crate::draw::continuity::{apply_continuity, drag_handle, ContinuityEdit};
use crate::draw::geometry::{
    normalize_rotation, position_for_pin_target, snap_point, Board, Component, ComponentKind, ContinuityMode,
    PinRef, Trace, TraceEnd, ValueKind, Vector2, JUNCTION_PIN_ID,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Trace not found: {0}")]
    TraceNotFound(String),

    #[error("Unknown footprint: {0}")]
    UnknownFootprint(String),

    #[error("Pin not found: {0}")]
    PinNotFound(PinRef),

    #[error("Component is locked: {0}")]
    Locked(String),

    #[error("Component is not a junction: {0}")]
    NotAJunction(String),

    #[error("A trace cannot start and end on the same pin")]
    SameEndpoint,

    #[error("Trace width must be positive, got {0}")]
    InvalidWidth(f64),
}

pub type EditResult<T> = std::result::Result<T, EditError>;

/// Smallest `{prefix}_{n}` not used by any component or trace
pub fn next_id(board: &Board, prefix: &str) -> String {
    let used: HashSet<&str> = board
        .components()
        .iter()
        .map(|c| c.id.as_str())
        .chain(board.traces().iter().map(|t| t.id.as_str()))
        .collect();
    (1..)
        .map(|n| format!("{}_{}", prefix, n))
        .find(|id| !used.contains(id.as_str()))
        .unwrap_or_else(|| prefix.to_string())
}

fn default_value(kind: Option<ValueKind>) -> Option<String> {
    match kind {
        Some(ValueKind::Resistance) => Some("10k".to_string()),
        Some(ValueKind::Capacitance) => Some("100nF".to_string()),
        _ => None,
    }
}

/// Place a library part so its first pin lands on the snapped `target`
pub fn place_component(
    board: &Board,
    footprint_id: &str,
    target: Vector2,
    grid_unit: f64,
) -> EditResult<(Board, String)> {
    let footprint = board
        .library()
        .get(footprint_id)
        .ok_or_else(|| EditError::UnknownFootprint(footprint_id.to_string()))?;

    let pin_target = snap_point(target, grid_unit, false);
    let position = position_for_pin_target(Some(footprint), pin_target, 0.0);

    let id = next_id(board, "comp");
    let prefix: String = footprint
        .name
        .split_whitespace()
        .next()
        .unwrap_or(footprint.id.as_str())
        .chars()
        .take(3)
        .collect::<String>()
        .to_uppercase();

    let mut component = Component::part(id.clone(), footprint_id, position);
    component.name = format!("{}{}", prefix, board.components().len() + 1);
    component.value = default_value(footprint.value_kind);

    let mut components = board.components().to_vec();
    components.push(component);
    tracing::debug!("[Edit] Placed {} '{}' at ({:.2}, {:.2})", footprint_id, id, position.x, position.y);
    Ok((board.with_components(components), id))
}

/// Move a component so its first pin lands on the snapped `pin_target`
///
/// Junctions snap to half the grid. Locked components are rejected.
pub fn move_component(board: &Board, component_id: &str, pin_target: Vector2, grid_unit: f64) -> EditResult<Board> {
    let component = board
        .component(component_id)
        .ok_or_else(|| EditError::ComponentNotFound(component_id.to_string()))?;
    if component.locked {
        return Err(EditError::Locked(component_id.to_string()));
    }

    let snapped = snap_point(pin_target, grid_unit, component.is_junction());
    let footprint = board.footprint_for(component);
    let position = position_for_pin_target(footprint, snapped, component.rotation);

    let components: Vec<Component> = board
        .components()
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if c.id == component_id {
                c.position = position;
            }
            c
        })
        .collect();

    let moved = board.with_components(components);
    Ok(apply_continuity(
        &moved,
        &ContinuityEdit::ComponentMoved {
            component_id: component_id.to_string(),
        },
    ))
}

fn map_component(
    board: &Board,
    component_id: &str,
    f: impl FnOnce(&mut Component) -> EditResult<()>,
) -> EditResult<Board> {
    let index = board
        .components()
        .iter()
        .position(|c| c.id == component_id)
        .ok_or_else(|| EditError::ComponentNotFound(component_id.to_string()))?;
    let mut components = board.components().to_vec();
    f(&mut components[index])?;
    Ok(board.with_components(components))
}

/// Rotate the given components by +90 degrees
pub fn rotate_components(board: &Board, ids: &[String]) -> EditResult<Board> {
    if let Some(missing) = ids.iter().find(|id| board.component(id).is_none()) {
        return Err(EditError::ComponentNotFound(missing.clone()));
    }
    let selected: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let components = board
        .components()
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if selected.contains(c.id.as_str()) {
                c.rotation = normalize_rotation(c.rotation + 90.0);
            }
            c
        })
        .collect();
    Ok(board.with_components(components))
}

pub fn set_continuity_mode(board: &Board, component_id: &str, mode: ContinuityMode) -> EditResult<Board> {
    map_component(board, component_id, |c| match &mut c.kind {
        ComponentKind::Junction { continuity } => {
            *continuity = mode;
            Ok(())
        }
        ComponentKind::Part { .. } => Err(EditError::NotAJunction(c.id.clone())),
    })
}

/// Fields of a component the inspector may change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the value
    pub value: Option<Option<String>>,
    pub locked: Option<bool>,
}

pub fn update_component(board: &Board, component_id: &str, update: ComponentUpdate) -> EditResult<Board> {
    map_component(board, component_id, |c| {
        if let Some(name) = update.name {
            c.name = name;
        }
        if let Some(value) = update.value {
            c.value = value;
        }
        if let Some(locked) = update.locked {
            c.locked = locked;
        }
        Ok(())
    })
}

/// Fields of a trace the inspector may change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceUpdate {
    pub width: Option<f64>,
    pub color: Option<String>,
    /// Drop both manual handles, returning to the automatic curve
    pub reset_handles: bool,
}

pub fn update_trace(board: &Board, trace_id: &str, update: TraceUpdate) -> EditResult<Board> {
    if let Some(width) = update.width {
        if !(width.is_finite() && width > 0.0) {
            return Err(EditError::InvalidWidth(width));
        }
    }
    let index = board
        .traces()
        .iter()
        .position(|t| t.id == trace_id)
        .ok_or_else(|| EditError::TraceNotFound(trace_id.to_string()))?;

    let mut traces = board.traces().to_vec();
    let trace = &mut traces[index];
    if let Some(width) = update.width {
        trace.width = width;
    }
    if let Some(color) = update.color {
        trace.color = color;
    }
    if update.reset_handles {
        trace.c1_offset = None;
        trace.c2_offset = None;
    }
    Ok(board.with_traces(traces))
}

/// Route a new trace between two resolvable pins
pub fn add_trace(board: &Board, from: PinRef, to: PinRef) -> EditResult<(Board, String)> {
    if from == to {
        return Err(EditError::SameEndpoint);
    }
    for pin in [&from, &to] {
        if board.pin_position(pin).is_none() {
            return Err(EditError::PinNotFound(pin.clone()));
        }
    }
    let id = next_id(board, "trace");
    let mut traces = board.traces().to_vec();
    traces.push(Trace::new(id.clone(), from, to));
    Ok((board.with_traces(traces), id))
}

/// Splice a junction into a trace at `point`
///
/// The trace is replaced by two segments that inherit its width and colour.
/// Returns the new board and the junction id.
pub fn split_trace(board: &Board, trace_id: &str, point: Vector2, grid_unit: f64) -> EditResult<(Board, String)> {
    let original = board
        .trace(trace_id)
        .ok_or_else(|| EditError::TraceNotFound(trace_id.to_string()))?
        .clone();

    let junction_id = next_id(board, "junc");
    let snapped = snap_point(point, grid_unit, true);
    let junction_fp = board.library().junction();
    let position = position_for_pin_target(Some(junction_fp), snapped, 0.0);

    let mut junction = Component::junction(junction_id.clone(), position);
    junction.name = format!("J{}", board.components().len() + 1);
    let mut components = board.components().to_vec();
    components.push(junction);
    let with_junction = board.with_components(components);

    let node = PinRef::new(junction_id.clone(), JUNCTION_PIN_ID);
    let first_id = next_id(&with_junction, "trace");
    let mut first = Trace::new(first_id, original.from.clone(), node.clone());
    first.width = original.width;
    first.color = original.color.clone();

    let mut traces: Vec<Trace> = board.traces().iter().filter(|t| t.id != trace_id).cloned().collect();
    traces.push(first);
    let staged = with_junction.with_traces(traces);

    let second_id = next_id(&staged, "trace");
    let mut second = Trace::new(second_id, node, original.to.clone());
    second.width = original.width;
    second.color = original.color;

    let mut traces = staged.traces().to_vec();
    traces.push(second);
    let split = staged.with_traces(traces);

    tracing::debug!("[Edit] Split '{}' at junction '{}'", trace_id, junction_id);
    let board = apply_continuity(
        &split,
        &ContinuityEdit::ComponentMoved {
            component_id: junction_id.clone(),
        },
    );
    Ok((board, junction_id))
}

/// Result of a delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// A lone junction with two traces was dissolved into one trace
    Merged { trace_id: String },
    Removed { components: usize, traces: usize },
}

/// Delete components and traces by id
///
/// Deleting a single junction that joins exactly two traces merges them:
/// the result runs from the far end of the first to the far end of the
/// second, takes the wider width and the first trace's colour. Otherwise
/// every listed entity and every trace attached to a deleted component is
/// removed.
pub fn delete(board: &Board, ids: &[String]) -> EditResult<(Board, DeleteOutcome)> {
    if let [only] = ids {
        if let Some(merged) = merge_junction(board, only) {
            return Ok(merged);
        }
    }

    let selected: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let components: Vec<Component> = board
        .components()
        .iter()
        .filter(|c| !selected.contains(c.id.as_str()))
        .cloned()
        .collect();
    let traces: Vec<Trace> = board
        .traces()
        .iter()
        .filter(|t| {
            !selected.contains(t.id.as_str())
                && !selected.contains(t.from.component_id.as_str())
                && !selected.contains(t.to.component_id.as_str())
        })
        .cloned()
        .collect();

    let outcome = DeleteOutcome::Removed {
        components: board.components().len() - components.len(),
        traces: board.traces().len() - traces.len(),
    };
    Ok((board.with_components(components).with_traces(traces), outcome))
}

fn merge_junction(board: &Board, component_id: &str) -> Option<(Board, DeleteOutcome)> {
    let junction = board.component(component_id).filter(|c| c.is_junction())?;
    let attached: Vec<&Trace> = board
        .traces()
        .iter()
        .filter(|t| t.touches_component(&junction.id))
        .collect();
    let [t1, t2] = attached.as_slice() else {
        return None;
    };

    let far_end = |t: &Trace| {
        if t.from.component_id == junction.id {
            t.to.clone()
        } else {
            t.from.clone()
        }
    };

    let trace_id = next_id(board, "trace");
    let mut merged = Trace::new(trace_id.clone(), far_end(t1), far_end(t2));
    merged.width = t1.width.max(t2.width);
    merged.color = t1.color.clone();

    let mut traces: Vec<Trace> = board
        .traces()
        .iter()
        .filter(|t| t.id != t1.id && t.id != t2.id)
        .cloned()
        .collect();
    traces.push(merged);
    let components: Vec<Component> = board
        .components()
        .iter()
        .filter(|c| c.id != component_id)
        .cloned()
        .collect();

    tracing::debug!("[Edit] Merged traces '{}' and '{}' into '{}'", t1.id, t2.id, trace_id);
    Some((
        board.with_components(components).with_traces(traces),
        DeleteOutcome::Merged { trace_id },
    ))
}

/// Drag a trace handle to `target` and propagate continuity
pub fn move_handle(board: &Board, trace_id: &str, end: TraceEnd, target: Vector2) -> EditResult<Board> {
    let trace = board
        .trace(trace_id)
        .ok_or_else(|| EditError::TraceNotFound(trace_id.to_string()))?;
    let pin = trace.pin(end).clone();
    drag_handle(board, trace_id, end, target).ok_or(EditError::PinNotFound(pin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::FootprintLibrary;
    use std::sync::Arc;

    const GRID: f64 = 25.4;

    fn two_resistors() -> Board {
        let components = vec![
            Component::part("R1", "resistor", Vector2::new(0.0, 0.0)),
            Component::part("R2", "resistor", Vector2::new(0.0, 254.0)),
        ];
        Board::new(Arc::new(FootprintLibrary::builtin()), components, Vec::new())
    }

    #[test]
    fn test_next_id_skips_used() {
        let board = two_resistors();
        let (board, id) = add_trace(&board, PinRef::new("R1", "1"), PinRef::new("R2", "1")).unwrap();
        assert_eq!(id, "trace_1");
        assert_eq!(next_id(&board, "trace"), "trace_2");
    }

    #[test]
    fn test_place_puts_first_pin_on_grid() {
        let board = two_resistors();
        let (board, id) = place_component(&board, "resistor", Vector2::new(260.0, 250.0), GRID).unwrap();
        let pin = board.pin_position(&PinRef::new(id.as_str(), "1")).unwrap();
        assert!((pin.x - 254.0).abs() < 1e-9);
        assert!((pin.y - 254.0).abs() < 1e-9);
        let placed = board.component(&id).unwrap();
        assert_eq!(placed.value.as_deref(), Some("10k"));
        assert!(placed.name.ends_with('3'));
    }

    #[test]
    fn test_move_rejects_locked() {
        let board = two_resistors();
        let board = update_component(
            &board,
            "R1",
            ComponentUpdate {
                locked: Some(true),
                ..ComponentUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(
            move_component(&board, "R1", Vector2::new(100.0, 100.0), GRID).unwrap_err(),
            EditError::Locked("R1".to_string())
        );
    }

    #[test]
    fn test_add_trace_requires_resolvable_pins() {
        let board = two_resistors();
        assert!(matches!(
            add_trace(&board, PinRef::new("R1", "1"), PinRef::new("R9", "1")),
            Err(EditError::PinNotFound(_))
        ));
        assert_eq!(
            add_trace(&board, PinRef::new("R1", "1"), PinRef::new("R1", "1")).unwrap_err(),
            EditError::SameEndpoint
        );
    }

    #[test]
    fn test_split_then_delete_merges_back() {
        let board = two_resistors();
        let (board, trace_id) = add_trace(&board, PinRef::new("R1", "2"), PinRef::new("R2", "2")).unwrap();
        let mut traces = board.traces().to_vec();
        traces[0].width = 12.0;
        traces[0].color = "#ff0000".to_string();
        let board = board.with_traces(traces);

        let (split, junction_id) = split_trace(&board, &trace_id, Vector2::new(60.0, 125.0), GRID).unwrap();
        assert_eq!(split.traces().len(), 2);
        assert!(split.traces().iter().all(|t| t.width == 12.0 && t.color == "#ff0000"));
        let node = split.pin_position(&PinRef::new(junction_id.as_str(), JUNCTION_PIN_ID)).unwrap();
        assert!((node.x - 63.5).abs() < 1e-9);
        assert!((node.y - 127.0).abs() < 1e-9);

        let (merged, outcome) = delete(&split, &[junction_id.clone()]).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Merged { .. }));
        assert!(merged.component(&junction_id).is_none());
        assert_eq!(merged.traces().len(), 1);
        let t = &merged.traces()[0];
        assert_eq!(t.from, PinRef::new("R1", "2"));
        assert_eq!(t.to, PinRef::new("R2", "2"));
        assert_eq!(t.width, 12.0);
    }

    #[test]
    fn test_delete_part_removes_attached_traces() {
        let board = two_resistors();
        let (board, _) = add_trace(&board, PinRef::new("R1", "1"), PinRef::new("R2", "1")).unwrap();
        let (board, outcome) = delete(&board, &["R1".to_string()]).unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed { components: 1, traces: 1 });
        assert!(board.traces().is_empty());
    }

    #[test]
    fn test_rotate_normalizes() {
        let board = two_resistors();
        let mut board = board;
        for _ in 0..4 {
            board = rotate_components(&board, &["R1".to_string()]).unwrap();
        }
        assert_eq!(board.component("R1").unwrap().rotation, 0.0);
    }

    #[test]
    fn test_continuity_mode_only_on_junctions() {
        let board = two_resistors();
        assert_eq!(
            set_continuity_mode(&board, "R1", ContinuityMode::Independent).unwrap_err(),
            EditError::NotAJunction("R1".to_string())
        );
    }

    #[test]
    fn test_update_trace_rejects_bad_width() {
        let board = two_resistors();
        let (board, id) = add_trace(&board, PinRef::new("R1", "1"), PinRef::new("R2", "1")).unwrap();
        let update = TraceUpdate {
            width: Some(0.0),
            ..TraceUpdate::default()
        };
        assert_eq!(update_trace(&board, &id, update).unwrap_err(), EditError::InvalidWidth(0.0));
    }
}
