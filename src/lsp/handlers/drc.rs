//! DRC handlers: RunDRC, GetDRCReport, plus the drcComplete notification

use crate::draw::drc::{DesignRules, DrcReport, DrcStatus};
use crate::lsp::protocol::{Notification, Response};
use crate::lsp::state::ServerState;
use crate::lsp::util::{parse_params, require_project, to_result};
use serde::Deserialize;

/// Handle RunDRC request - runs Design Rule Check immediately
pub fn handle_run_drc(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct RunDRCParams {
        #[serde(default)]
        clearance: Option<f64>,
    }

    if let Err(response) = require_project(state, &id) {
        return response;
    }
    let params: RunDRCParams = match parse_params(&id, params, "{clearance?: number}") {
        Ok(p) => p,
        Err(response) => return response,
    };

    let rules = match params.clearance.filter(|c| c.is_finite() && *c >= 0.0) {
        Some(clearance) => DesignRules {
            clearance,
            ..state.design_rules.clone()
        },
        None => state.design_rules.clone(),
    };

    tracing::info!("[Server] Running DRC with clearance: {:.3}", rules.clearance);
    let report = state.run_drc_with(&rules);
    to_result(id, report)
}

/// Handle GetDRCReport request - returns the last completed report
pub fn handle_get_drc_report(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    match &state.last_report {
        Some(report) => to_result(id, report),
        None => Response::success(id, serde_json::json!({ "status": DrcStatus::None })),
    }
}

/// Notification emitted when a scheduled run completes
pub fn drc_complete_notification(report: &DrcReport) -> Notification {
    let result = serde_json::to_value(report).unwrap_or_else(|e| {
        tracing::warn!("[DRC] Failed to serialize report: {}", e);
        serde_json::json!({ "status": report.status })
    });
    Notification::new("drcComplete", result)
}
