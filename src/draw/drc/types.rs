//! DRC data types and structures
//!
//! Contains rule, violation and report definitions for clearance checking.

use crate::config::EngineConfig;
use crate::draw::geometry::{PinRef, Vector2};
use indexmap::IndexSet;
use serde::Serialize;

/// Design rules derived from the grid unit
#[derive(Clone, Debug, PartialEq)]
pub struct DesignRules {
    /// Minimum distance between unconnected copper
    pub clearance: f64,
    /// Points sampled per trace curve
    pub sample_count: usize,
    /// Upper bound on recorded violation markers
    pub max_markers: usize,
}

impl DesignRules {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            clearance: config.clearance(),
            sample_count: config.drc_samples,
            max_markers: config.max_markers,
        }
    }

    pub fn with_grid_unit(grid_unit: f64) -> Self {
        Self::from_config(&EngineConfig {
            grid_unit,
            ..EngineConfig::default()
        })
    }
}

impl Default for DesignRules {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// What collided
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Two unconnected traces came within clearance
    TraceTrace { trace_a: String, trace_b: String },
    /// A trace passed within clearance of a foreign pad
    TracePad { trace: String, pin: PinRef },
}

/// A single clearance violation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrcViolation {
    #[serde(flatten)]
    pub kind: ViolationKind,
    /// Where the marker is drawn
    pub location: Vector2,
    /// Distance of the colliding sample pair
    pub distance: f64,
}

impl DrcViolation {
    pub fn trace_ids(&self) -> Vec<&str> {
        match &self.kind {
            ViolationKind::TraceTrace { trace_a, trace_b } => vec![trace_a.as_str(), trace_b.as_str()],
            ViolationKind::TracePad { trace, .. } => vec![trace.as_str()],
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ViolationKind::TraceTrace { trace_a, trace_b } => {
                format!("Traces {} and {} violate clearance ({:.2})", trace_a, trace_b, self.distance)
            }
            ViolationKind::TracePad { trace, pin } => {
                format!("Trace {} passes too close to pad {} ({:.2})", trace, pin, self.distance)
            }
        }
    }
}

/// Aggregate outcome of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrcStatus {
    /// No traces on the board
    #[default]
    None,
    Pass,
    Fail,
}

/// Result of one DRC run
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrcReport {
    /// Flagged traces, in detection order
    pub invalid_trace_ids: IndexSet<String>,
    /// Marker positions, capped at `DesignRules::max_markers`
    pub markers: Vec<Vector2>,
    /// Every violation found, including those past the marker cap
    pub violations: Vec<DrcViolation>,
    pub status: DrcStatus,
    pub clearance: f64,
    pub elapsed_ms: f64,
}

impl DrcReport {
    pub fn is_invalid(&self, trace_id: &str) -> bool {
        self.invalid_trace_ids.contains(trace_id)
    }
}
