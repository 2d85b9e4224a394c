//! Edit handlers: PlaceComponent, MoveComponent, RotateComponent,
//! UpdateComponent, UpdateTrace, SetContinuityMode, AddTrace, SplitTrace,
//! DragHandle, Delete
//!
//! Every successful edit publishes exactly one new snapshot.

use crate::draw::edit::{self, ComponentUpdate, DeleteOutcome, TraceUpdate};
use crate::draw::geometry::{ContinuityMode, PinRef, TraceEnd, Vector2};
use crate::lsp::protocol::Response;
use crate::lsp::state::ServerState;
use crate::lsp::util::{edit_error_response, parse_params, require_project};
use serde::Deserialize;

macro_rules! params_or_return {
    ($state:expr, $id:expr, $params:expr, $expected:expr) => {{
        if let Err(response) = require_project($state, &$id) {
            return response;
        }
        match parse_params(&$id, $params, $expected) {
            Ok(p) => p,
            Err(response) => return response,
        }
    }};
}

/// Handle PlaceComponent request - places a library part at a pin target
pub fn handle_place_component(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct PlaceParams {
        footprint_id: String,
        x: f64,
        y: f64,
    }

    let params: PlaceParams = params_or_return!(state, id, params, "{footprint_id, x, y}");
    let target = Vector2::new(params.x, params.y);
    match edit::place_component(state.board(), &params.footprint_id, target, state.config.grid_unit) {
        Ok((board, component_id)) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok", "component_id": component_id }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle MoveComponent request - moves a component so its first pin lands on (x, y)
pub fn handle_move_component(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct MoveParams {
        component_id: String,
        x: f64,
        y: f64,
    }

    let params: MoveParams = params_or_return!(state, id, params, "{component_id, x, y}");
    let target = Vector2::new(params.x, params.y);
    match edit::move_component(state.board(), &params.component_id, target, state.config.grid_unit) {
        Ok(board) => {
            let position = board.component(&params.component_id).map(|c| c.position);
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok", "position": position }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle RotateComponent request - rotates components by +90 degrees
pub fn handle_rotate_component(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct RotateParams {
        component_ids: Vec<String>,
    }

    let params: RotateParams = params_or_return!(state, id, params, "{component_ids: string[]}");
    match edit::rotate_components(state.board(), &params.component_ids) {
        Ok(board) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok" }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle UpdateComponent request - edits name, value or lock
pub fn handle_update_component(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct UpdateParams {
        component_id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        clear_value: bool,
        #[serde(default)]
        locked: Option<bool>,
    }

    let params: UpdateParams = params_or_return!(state, id, params, "{component_id, name?, value?, locked?}");
    let update = ComponentUpdate {
        name: params.name,
        value: if params.clear_value { Some(None) } else { params.value.map(Some) },
        locked: params.locked,
    };
    match edit::update_component(state.board(), &params.component_id, update) {
        Ok(board) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok" }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle UpdateTrace request - edits width, colour or resets handles
pub fn handle_update_trace(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct UpdateParams {
        trace_id: String,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        reset_handles: bool,
    }

    let params: UpdateParams = params_or_return!(state, id, params, "{trace_id, width?, color?, reset_handles?}");
    let update = TraceUpdate {
        width: params.width,
        color: params.color,
        reset_handles: params.reset_handles,
    };
    match edit::update_trace(state.board(), &params.trace_id, update) {
        Ok(board) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok" }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle SetContinuityMode request - changes a junction's mode
pub fn handle_set_continuity_mode(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct ModeParams {
        component_id: String,
        mode: ContinuityMode,
    }

    let params: ModeParams =
        params_or_return!(state, id, params, "{component_id, mode: smooth|linear|independent}");
    match edit::set_continuity_mode(state.board(), &params.component_id, params.mode) {
        Ok(board) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok", "mode": params.mode }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle AddTrace request - routes a trace between two pins
pub fn handle_add_trace(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct AddTraceParams {
        from: PinRef,
        to: PinRef,
    }

    let params: AddTraceParams = params_or_return!(state, id, params, "{from: PinRef, to: PinRef}");
    match edit::add_trace(state.board(), params.from, params.to) {
        Ok((board, trace_id)) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok", "trace_id": trace_id }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle SplitTrace request - splices a junction into a trace
pub fn handle_split_trace(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct SplitParams {
        trace_id: String,
        x: f64,
        y: f64,
    }

    let params: SplitParams = params_or_return!(state, id, params, "{trace_id, x, y}");
    let point = Vector2::new(params.x, params.y);
    match edit::split_trace(state.board(), &params.trace_id, point, state.config.grid_unit) {
        Ok((board, junction_id)) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok", "junction_id": junction_id }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle DragHandle request - moves a control handle and mirrors its sibling
pub fn handle_drag_handle(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct DragParams {
        trace_id: String,
        end: TraceEnd,
        x: f64,
        y: f64,
    }

    let params: DragParams = params_or_return!(state, id, params, "{trace_id, end: from|to, x, y}");
    let target = Vector2::new(params.x, params.y);
    match edit::move_handle(state.board(), &params.trace_id, params.end, target) {
        Ok(board) => {
            state.publish(board);
            Response::success(id, serde_json::json!({ "status": "ok" }))
        }
        Err(e) => edit_error_response(id, e),
    }
}

/// Handle Delete request - removes components/traces, merging lone junctions
pub fn handle_delete(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct DeleteParams {
        ids: Vec<String>,
    }

    let params: DeleteParams = params_or_return!(state, id, params, "{ids: string[]}");
    match edit::delete(state.board(), &params.ids) {
        Ok((board, outcome)) => {
            state.publish(board);
            let result = match outcome {
                DeleteOutcome::Merged { trace_id } => {
                    serde_json::json!({ "status": "ok", "merged_trace_id": trace_id })
                }
                DeleteOutcome::Removed { components, traces } => serde_json::json!({
                    "status": "ok",
                    "removed_components": components,
                    "removed_traces": traces
                }),
            };
            Response::success(id, result)
        }
        Err(e) => edit_error_response(id, e),
    }
}
