//! Board geometry and validation engine
//!
//! # Module Structure
//! - `geometry` - Data model, footprint library, coordinate transform, board snapshots
//! - `curve` - Cubic Bezier model for routed traces
//! - `drc` - Clearance checking and its debounce scheduler
//! - `continuity` - Tangent mirroring across two-trace junctions
//! - `edit` - Snapshot-based editing operations

pub mod continuity;
pub mod curve;
pub mod drc;
pub mod edit;
pub mod geometry;
