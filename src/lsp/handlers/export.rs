//! Export handlers: ExportGcode, ExportSvg
//!
//! With `file_path` the output is written to disk; without it the text is
//! returned inline.

use crate::export::{gcode_to_file, gcode_to_string, svg_to_file, svg_to_string, GcodeOptions};
use crate::lsp::protocol::{error_codes, Response};
use crate::lsp::state::ServerState;
use crate::lsp::util::{parse_params, require_project};
use serde::Deserialize;

#[derive(Deserialize)]
struct ExportParams {
    #[serde(default)]
    file_path: Option<String>,
}

/// Handle ExportGcode request - GRBL program for drilling and milling
pub fn handle_export_gcode(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let params: ExportParams = match parse_params(&id, params, "{file_path?: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    let options = GcodeOptions::with_steps(state.config.export_steps);
    match params.file_path {
        Some(path) => match gcode_to_file(state.board(), &options, &path) {
            Ok(()) => Response::success(id, serde_json::json!({ "status": "ok", "file_path": path })),
            Err(e) => Response::error(id, error_codes::EXPORT_FAILED, format!("{:#}", e)),
        },
        None => Response::success(
            id,
            serde_json::json!({ "status": "ok", "gcode": gcode_to_string(state.board(), &options) }),
        ),
    }
}

/// Handle ExportSvg request - static image of the board
pub fn handle_export_svg(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let params: ExportParams = match parse_params(&id, params, "{file_path?: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    match params.file_path {
        Some(path) => match svg_to_file(state.board(), &path) {
            Ok(()) => Response::success(id, serde_json::json!({ "status": "ok", "file_path": path })),
            Err(e) => Response::error(id, error_codes::EXPORT_FAILED, format!("{:#}", e)),
        },
        None => match svg_to_string(state.board()) {
            Some(svg) => Response::success(id, serde_json::json!({ "status": "ok", "svg": svg })),
            None => Response::error(id, error_codes::EXPORT_FAILED, "Board is empty, nothing to export".to_string()),
        },
    }
}
