//! Engine configuration
//!
//! A single grid unit drives both drag snapping and the DRC clearance
//! threshold. Everything else is tuning for hit testing and export.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Runtime-tunable engine settings; missing fields fall back to defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Snap granularity in board units
    pub grid_unit: f64,
    /// Clearance as a fraction of the grid unit
    pub clearance_factor: f64,
    /// Quiet period before a scheduled DRC run fires
    pub drc_settle_ms: u64,
    /// Points sampled per trace for DRC
    pub drc_samples: usize,
    /// Violation markers kept per run
    pub max_markers: usize,
    /// Curve subdivisions per trace in exporters
    pub export_steps: usize,
    pub pin_hit_radius: f64,
    pub trace_hit_radius: f64,
    pub trace_hit_samples: usize,
    /// Pointer travel before a press on a trace becomes a split drag
    pub split_drag_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_unit: 25.4,
            clearance_factor: 0.45,
            drc_settle_ms: 800,
            drc_samples: 15,
            max_markers: 30,
            export_steps: 15,
            pin_hit_radius: 15.0,
            trace_hit_radius: 25.0,
            trace_hit_samples: 20,
            split_drag_threshold: 10.0,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.grid_unit.is_finite() && self.grid_unit > 0.0) {
            bail!("grid_unit must be positive, got {}", self.grid_unit);
        }
        if !(self.clearance_factor.is_finite() && self.clearance_factor >= 0.0) {
            bail!("clearance_factor must be non-negative, got {}", self.clearance_factor);
        }
        if self.drc_samples < 2 {
            bail!("drc_samples must be at least 2, got {}", self.drc_samples);
        }
        if self.export_steps == 0 {
            bail!("export_steps must be at least 1");
        }
        Ok(())
    }

    /// Minimum distance between unconnected copper
    pub fn clearance(&self) -> f64 {
        self.grid_unit * self.clearance_factor
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.drc_settle_ms)
    }
}
