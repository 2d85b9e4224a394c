//! Tangent continuity across two-trace junctions
//!
//! When a junction joins exactly two traces, the handle of one trace at the
//! junction is mirrored onto the other so the pair reads as one smooth
//! path: the sibling handle becomes the exact negation of the reference.
//! Only junction components take part, and `Independent` ones opt out;
//! part pins never propagate.
//!
//! Every pass reads the incoming snapshot only and returns a new one, so no
//! reader ever sees a half-rewritten trace list.

use crate::draw::curve::control_points;
use crate::draw::geometry::{Board, ContinuityMode, PinRef, Trace, TraceEnd, Vector2};
use std::collections::HashMap;

/// The edit that triggered propagation
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuityEdit {
    /// A component was moved; each of its pins is a candidate node
    ComponentMoved { component_id: String },
    /// A trace handle was dragged at `end`
    HandleDragged { trace_id: String, end: TraceEnd },
}

/// Effective handle of `trace` at `end`, relative to its pin
///
/// Manual offsets are returned as stored; automatic ones are derived from
/// the curve model. `None` if the trace dangles.
pub fn effective_offset(board: &Board, trace: &Trace, end: TraceEnd) -> Option<Vector2> {
    if let Some(offset) = trace.offset(end) {
        return Some(offset);
    }
    let (start, stop) = board.trace_endpoints(trace)?;
    let cp = control_points(start, stop, Some(trace));
    Some(match end {
        TraceEnd::From => cp.c1 - start,
        TraceEnd::To => cp.c2 - stop,
    })
}

/// Whether `node` mirrors handles: a junction not set to `Independent`
fn propagates(board: &Board, node: &PinRef) -> bool {
    board
        .component(&node.component_id)
        .and_then(|c| c.continuity())
        .is_some_and(|mode| mode != ContinuityMode::Independent)
}

/// Propagate mirrored handles for one edit, returning the new snapshot
///
/// Returns `board` unchanged (sharing its trace list) when no node needs
/// updating.
pub fn apply_continuity(board: &Board, edit: &ContinuityEdit) -> Board {
    let traces = board.traces();

    // node -> attached trace indices, in collection order
    let mut attached: HashMap<&PinRef, Vec<usize>> = HashMap::new();
    for (i, trace) in traces.iter().enumerate() {
        attached.entry(&trace.from).or_default().push(i);
        if trace.to != trace.from {
            attached.entry(&trace.to).or_default().push(i);
        }
    }

    // (node, reference trace index or None for "first attached")
    let nodes: Vec<(PinRef, Option<usize>)> = match edit {
        ContinuityEdit::ComponentMoved { component_id } => {
            let Some(component) = board.component(component_id) else {
                return board.clone();
            };
            board
                .pins_of(component)
                .into_iter()
                .map(|p| (p.pin_ref, None))
                .collect()
        }
        ContinuityEdit::HandleDragged { trace_id, end } => {
            let Some(index) = traces.iter().position(|t| &t.id == trace_id) else {
                return board.clone();
            };
            vec![(traces[index].pin(*end).clone(), Some(index))]
        }
    };

    let mut overrides: HashMap<usize, (TraceEnd, Vector2)> = HashMap::new();

    for (node, reference) in &nodes {
        if !propagates(board, node) {
            continue;
        }
        let Some(at_node) = attached.get(node) else {
            continue;
        };
        if at_node.len() != 2 {
            tracing::trace!("[Continuity] Node {} has degree {}, not propagating", node, at_node.len());
            continue;
        }

        let reference = reference.unwrap_or(at_node[0]);
        let Some(&sibling) = at_node.iter().find(|&&i| i != reference) else {
            continue;
        };

        let ref_trace = &traces[reference];
        let sib_trace = &traces[sibling];
        let (Some(ref_end), Some(sib_end)) = (ref_trace.end_at(node), sib_trace.end_at(node)) else {
            continue;
        };
        let Some(ref_offset) = effective_offset(board, ref_trace, ref_end) else {
            tracing::debug!("[Continuity] Trace '{}' dangles, skipping node {}", ref_trace.id, node);
            continue;
        };

        overrides.insert(sibling, (sib_end, -ref_offset));
    }

    if overrides.is_empty() {
        return board.clone();
    }

    let next: Vec<Trace> = traces
        .iter()
        .enumerate()
        .map(|(i, trace)| match overrides.get(&i) {
            Some(&(end, offset)) => {
                let mut updated = trace.clone();
                updated.set_offset(end, Some(offset));
                updated
            }
            None => trace.clone(),
        })
        .collect();

    tracing::debug!("[Continuity] {:?}: {} sibling handle(s) mirrored", edit, overrides.len());
    board.with_traces(next)
}

/// Set a dragged handle to `target` and propagate, as one snapshot
///
/// `target` is in board coordinates; the stored offset is relative to the
/// pin at `end`. Returns `None` if the trace is unknown or that end dangles.
pub fn drag_handle(board: &Board, trace_id: &str, end: TraceEnd, target: Vector2) -> Option<Board> {
    let trace = board.trace(trace_id)?;
    let pin_pos = board.pin_position(trace.pin(end))?;
    let offset = target - pin_pos;

    let traces: Vec<Trace> = board
        .traces()
        .iter()
        .map(|t| {
            let mut t = t.clone();
            if t.id == trace_id {
                t.set_offset(end, Some(offset));
            }
            t
        })
        .collect();

    // The intermediate snapshot is never published
    let staged = board.with_traces(traces);
    Some(apply_continuity(
        &staged,
        &ContinuityEdit::HandleDragged {
            trace_id: trace_id.to_string(),
            end,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::{Component, ComponentKind, FootprintLibrary};
    use std::sync::Arc;

    fn chain(mode: ContinuityMode) -> Board {
        let mut junction = Component::junction("J1", Vector2::new(100.0, 0.0));
        junction.kind = ComponentKind::Junction { continuity: mode };
        let components = vec![
            Component::part("A", "pin", Vector2::new(0.0, 0.0)),
            junction,
            Component::part("B", "pin", Vector2::new(200.0, 0.0)),
        ];
        let mut t1 = Trace::new("t1", PinRef::new("A", "p1"), PinRef::new("J1", "p1"));
        t1.c2_offset = Some(Vector2::new(-20.0, 10.0));
        let t2 = Trace::new("t2", PinRef::new("J1", "p1"), PinRef::new("B", "p1"));
        Board::new(Arc::new(FootprintLibrary::builtin()), components, vec![t1, t2])
    }

    #[test]
    fn test_move_mirrors_first_trace() {
        let board = chain(ContinuityMode::Smooth);
        let next = apply_continuity(
            &board,
            &ContinuityEdit::ComponentMoved {
                component_id: "J1".to_string(),
            },
        );
        assert_eq!(next.traces()[1].c1_offset, Some(Vector2::new(20.0, -10.0)));
        // Input snapshot untouched
        assert!(board.traces()[1].c1_offset.is_none());
    }

    #[test]
    fn test_handle_drag_mirrors_dragged_side() {
        let board = chain(ContinuityMode::Smooth);
        let j = board.pin_position(&PinRef::new("J1", "p1")).unwrap();
        let next = drag_handle(&board, "t2", TraceEnd::From, j + Vector2::new(30.0, 5.0)).unwrap();
        let c1 = next.traces()[1].c1_offset.unwrap();
        assert!((c1 - Vector2::new(30.0, 5.0)).length() < 1e-9);
        assert_eq!(next.traces()[0].c2_offset, Some(-c1));
    }

    #[test]
    fn test_independent_suppresses() {
        let board = chain(ContinuityMode::Independent);
        let next = apply_continuity(
            &board,
            &ContinuityEdit::ComponentMoved {
                component_id: "J1".to_string(),
            },
        );
        assert!(board.same_traces(&next));
    }

    #[test]
    fn test_linear_mirrors_exactly() {
        let board = chain(ContinuityMode::Linear);
        let mut traces = board.traces().to_vec();
        traces[1].c1_offset = Some(Vector2::new(0.0, 5.0));
        let board = board.with_traces(traces);

        let next = apply_continuity(
            &board,
            &ContinuityEdit::HandleDragged {
                trace_id: "t1".to_string(),
                end: TraceEnd::To,
            },
        );
        assert_eq!(next.traces()[1].c1_offset, Some(Vector2::new(20.0, -10.0)));
    }

    #[test]
    fn test_part_pins_do_not_propagate() {
        let board = chain(ContinuityMode::Smooth);
        let next = apply_continuity(
            &board,
            &ContinuityEdit::ComponentMoved {
                component_id: "A".to_string(),
            },
        );
        assert!(board.same_traces(&next));
    }

    #[test]
    fn test_auto_offset_is_materialized() {
        let board = chain(ContinuityMode::Smooth);
        let next = apply_continuity(
            &board,
            &ContinuityEdit::HandleDragged {
                trace_id: "t2".to_string(),
                end: TraceEnd::From,
            },
        );
        // t2 has no manual handle: its automatic tangent at J1 is mirrored
        let auto = effective_offset(&board, &board.traces()[1], TraceEnd::From).unwrap();
        assert_eq!(next.traces()[0].c2_offset, Some(-auto));
        assert!(next.traces()[1].c1_offset.is_none());
    }
}
