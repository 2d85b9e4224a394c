//! Geometry module for the board model
//!
//! # Submodules
//! - `types` - Board data model (Vector2, Footprint, Component, Trace, ...)
//! - `library` - Footprint templates, including generated DIP/header parts
//! - `transform` - Component-local to board-global pin transform
//! - `board` - Immutable board snapshot and pin resolution
//! - `spatial` - R-tree pin index and hit testing

mod types;
mod library;
mod transform;
mod board;
mod spatial;

pub use types::{
    normalize_rotation,
    Component,
    ComponentKind,
    ContinuityMode,
    Footprint,
    PackageShape,
    PinDecoration,
    PinRef,
    PinTemplate,
    PinType,
    Trace,
    TraceEnd,
    ValueKind,
    Vector2,
    DEFAULT_TRACE_COLOR,
    DEFAULT_TRACE_WIDTH,
};

pub use library::{
    builtin_footprints,
    dip_footprint,
    header_footprint,
    junction_footprint,
    FootprintLibrary,
    JUNCTION_FOOTPRINT_ID,
    JUNCTION_PIN_ID,
    MAX_GENERATED_PINS,
};

pub use transform::{
    global_pos,
    position_for_pin_target,
    rotate,
    snap,
    snap_point,
};

pub use board::{Board, ResolvedPin};

pub use spatial::{trace_at, IndexedPin, PinIndex};
