//! Query handlers: GetFootprints, GetPinPositions, GetTracePaths, HitTest
//!
//! Nothing is cached between requests; every answer is derived from the
//! published snapshot at the time of the call.

use crate::draw::curve::path_descriptor;
use crate::draw::geometry::{trace_at, PinIndex, PinRef, Vector2};
use crate::lsp::protocol::Response;
use crate::lsp::state::ServerState;
use crate::lsp::util::{parse_params, require_project, to_result};
use serde::Deserialize;

/// Handle GetFootprints request - lists the placeable library parts
pub fn handle_get_footprints(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    let library = state.library();
    let footprints: Vec<_> = library.iter().collect();
    to_result(id, &footprints)
}

/// Handle GetPinPositions request - every resolved pin with its global position
pub fn handle_get_pin_positions(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let pins: Vec<serde_json::Value> = state
        .board()
        .resolved_pins()
        .into_iter()
        .map(|p| {
            serde_json::json!({
                "pin": p.pin_ref,
                "position": p.position,
                "type": p.pin_type,
                "on_junction": p.on_junction
            })
        })
        .collect();
    Response::success(id, serde_json::Value::Array(pins))
}

/// Handle GetTracePaths request - curve geometry and DRC flag per trace
pub fn handle_get_trace_paths(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let board = state.board();
    let paths: Vec<serde_json::Value> = board
        .traces()
        .iter()
        .filter_map(|trace| {
            let (start, end) = board.trace_endpoints(trace)?;
            let curve = path_descriptor(start, end, Some(trace));
            let invalid = state
                .last_report
                .as_ref()
                .is_some_and(|r| r.is_invalid(&trace.id));
            Some(serde_json::json!({
                "id": trace.id,
                "d": curve.to_svg_path(),
                "start": curve.start,
                "c1": curve.c1,
                "c2": curve.c2,
                "end": curve.end,
                "width": trace.width,
                "color": trace.color,
                "invalid": invalid
            }))
        })
        .collect();
    Response::success(id, serde_json::Value::Array(paths))
}

/// Handle HitTest request - pin first, then topmost trace
pub fn handle_hit_test(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct HitTestParams {
        x: f64,
        y: f64,
        #[serde(default)]
        exclude_pin: Option<PinRef>,
    }

    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let params: HitTestParams = match parse_params(&id, params, "{x, y, exclude_pin?}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    let point = Vector2::new(params.x, params.y);
    let board = state.board();
    let config = &state.config;

    let index = PinIndex::build(board);
    let pin = index
        .pin_at(point, config.pin_hit_radius, params.exclude_pin.as_ref())
        .map(|p| p.pin_ref.clone());
    let trace = trace_at(board, point, config.trace_hit_radius, config.trace_hit_samples).map(|t| t.id.clone());

    Response::success(id, serde_json::json!({ "pin": pin, "trace": trace }))
}
