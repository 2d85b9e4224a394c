//! Handler module declarations, re-exports and method dispatch

pub mod drc;
pub mod edit;
pub mod export;
pub mod file;
pub mod query;

// Re-export all handlers for convenient access
pub use drc::*;
pub use edit::*;
pub use export::*;
pub use file::*;
pub use query::*;

use crate::lsp::protocol::{error_codes, Request, Response};
use crate::lsp::state::ServerState;

/// Route one request to its handler
pub fn dispatch(state: &mut ServerState, request: Request) -> Response {
    let Request { id, method, params } = request;
    match method.as_str() {
        "Load" => handle_load(state, id, params),
        "New" => handle_new(state, id),
        "Save" => handle_save(state, id, params),
        "GetProject" => handle_get_project(state, id),
        "Close" => handle_close(state, id),
        "GetFootprints" => handle_get_footprints(state, id),
        "PlaceComponent" => handle_place_component(state, id, params),
        "MoveComponent" => handle_move_component(state, id, params),
        "RotateComponent" => handle_rotate_component(state, id, params),
        "UpdateComponent" => handle_update_component(state, id, params),
        "UpdateTrace" => handle_update_trace(state, id, params),
        "SetContinuityMode" => handle_set_continuity_mode(state, id, params),
        "AddTrace" => handle_add_trace(state, id, params),
        "SplitTrace" => handle_split_trace(state, id, params),
        "DragHandle" => handle_drag_handle(state, id, params),
        "Delete" => handle_delete(state, id, params),
        "GetPinPositions" => handle_get_pin_positions(state, id),
        "GetTracePaths" => handle_get_trace_paths(state, id),
        "HitTest" => handle_hit_test(state, id, params),
        "RunDRC" => handle_run_drc(state, id, params),
        "GetDRCReport" => handle_get_drc_report(state, id),
        "ExportGcode" => handle_export_gcode(state, id, params),
        "ExportSvg" => handle_export_svg(state, id, params),
        _ => Response::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        ),
    }
}

/// Parse and dispatch one input line; `None` for blank lines
pub fn handle_line(state: &mut ServerState, line: &str) -> Option<Response> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Request>(line) {
        Ok(request) => Some(dispatch(state, request)),
        Err(e) => {
            tracing::warn!("[Server] Failed to parse request: {}", e);
            Some(Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e)))
        }
    }
}
