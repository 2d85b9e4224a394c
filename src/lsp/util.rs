//! Utility functions for the request handlers

use crate::draw::edit::EditError;
use crate::lsp::protocol::{error_codes, Response};
use crate::lsp::state::ServerState;
use serde::de::DeserializeOwned;

/// Deserialize request params, or build the INVALID_PARAMS response
pub fn parse_params<T: DeserializeOwned>(
    id: &Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    expected: &str,
) -> Result<T, Response> {
    // Absent params read as an empty object so all-optional structs parse
    let value = match params {
        None | Some(serde_json::Value::Null) => serde_json::Value::Object(serde_json::Map::new()),
        Some(v) => v,
    };
    serde_json::from_value(value).map_err(|e| {
        Response::error(
            id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Invalid params: expected {} ({})", expected, e),
        )
    })
}

/// Error response unless a project is open
pub fn require_project(state: &ServerState, id: &Option<serde_json::Value>) -> Result<(), Response> {
    if state.is_project_loaded() {
        Ok(())
    } else {
        Err(Response::error(
            id.clone(),
            error_codes::NO_PROJECT_LOADED,
            "No project loaded. Call Load first.".to_string(),
        ))
    }
}

pub fn edit_error_response(id: Option<serde_json::Value>, err: EditError) -> Response {
    let code = match err {
        EditError::ComponentNotFound(_)
        | EditError::TraceNotFound(_)
        | EditError::UnknownFootprint(_)
        | EditError::PinNotFound(_) => error_codes::NOT_FOUND,
        EditError::Locked(_) => error_codes::LOCKED,
        EditError::NotAJunction(_) | EditError::SameEndpoint | EditError::InvalidWidth(_) => {
            error_codes::INVALID_PARAMS
        }
    };
    Response::error(id, code, err.to_string())
}

/// Serialize a handler result, falling back to INTERNAL_ERROR
pub fn to_result<T: serde::Serialize>(id: Option<serde_json::Value>, value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(v) => Response::success(id, v),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to serialize result: {}", e)),
    }
}
