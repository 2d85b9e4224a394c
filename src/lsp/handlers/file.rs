//! File operations: Load, Save, GetProject, Close

use crate::lsp::protocol::{error_codes, Response};
use crate::lsp::state::ServerState;
use crate::lsp::util::{parse_params, require_project, to_result};
use crate::project::{load_project_file, save_project_file, Project};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;

/// Handle Load request - reads a project file and publishes it
pub fn handle_load(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct LoadParams {
        file_path: String,
    }

    let params: LoadParams = match parse_params(&id, params, "{file_path: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    tracing::info!("[Server] Loading project: {}", params.file_path);
    let start = Instant::now();

    let project = match load_project_file(&params.file_path) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("[Server] Load failed: {:#}", e);
            return Response::error(id, error_codes::LOAD_FAILED, format!("{:#}", e));
        }
    };

    let component_count = project.components.len();
    let trace_count = project.traces.len();
    let board = project.into_board(state.library());
    state.open(board, Some(PathBuf::from(&params.file_path)), Instant::now());

    tracing::info!(
        "[Server] Loaded {} components, {} traces in {:.2?}",
        component_count,
        trace_count,
        start.elapsed()
    );

    Response::success(
        id,
        serde_json::json!({
            "status": "ok",
            "file_path": params.file_path,
            "component_count": component_count,
            "trace_count": trace_count
        }),
    )
}

/// Handle New request - opens an empty project
pub fn handle_new(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let board = Project::new(Vec::new(), Vec::new()).into_board(state.library());
    state.open(board, None, Instant::now());
    Response::success(id, serde_json::json!({ "status": "ok" }))
}

/// Handle Save request - writes the published snapshot to disk
pub fn handle_save(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct SaveParams {
        #[serde(default)]
        file_path: Option<String>,
    }

    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let params: SaveParams = match parse_params(&id, params, "{file_path?: string}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    let Some(path) = params.file_path.map(PathBuf::from).or_else(|| state.project_path.clone()) else {
        return Response::error(
            id,
            error_codes::INVALID_PARAMS,
            "Project has no file yet, pass file_path".to_string(),
        );
    };

    let project = Project::from_board(state.board());
    if let Err(e) = save_project_file(&project, &path) {
        tracing::warn!("[Server] Save failed: {:#}", e);
        return Response::error(id, error_codes::SAVE_FAILED, format!("{:#}", e));
    }
    state.project_path = Some(path.clone());

    Response::success(
        id,
        serde_json::json!({
            "status": "ok",
            "file_path": path.to_string_lossy(),
            "component_count": project.components.len(),
            "trace_count": project.traces.len()
        }),
    )
}

/// Handle GetProject request - returns the published snapshot
pub fn handle_get_project(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    if let Err(response) = require_project(state, &id) {
        return response;
    }
    to_result(id, &Project::from_board(state.board()))
}

/// Handle Close request - drops the project
pub fn handle_close(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    state.close();
    tracing::info!("[Server] Project closed");
    Response::success(id, serde_json::json!({ "status": "ok" }))
}
