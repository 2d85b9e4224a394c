//! Core board data model
//!
//! Footprints are immutable templates; components are placed instances of
//! them; traces connect two resolved pins. Pin positions are never stored,
//! they are derived through the coordinate transform on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point or vector in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Vector2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Vector2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn midpoint(self, other: Vector2) -> Vector2 {
        Vector2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

/// Electrical role of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    #[default]
    Io,
    Power,
    Ground,
}

/// Silkscreen decoration drawn next to a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDecoration {
    Plus,
    Notch,
}

/// Pin template on a footprint (offset is local to the unrotated outline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinTemplate {
    pub id: String,
    pub name: String,
    pub local_pos: Vector2,
    #[serde(rename = "type", default)]
    pub pin_type: PinType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<PinDecoration>,
}

/// Value kind a footprint advertises, used only for labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Resistance,
    Capacitance,
    Inductance,
    Voltage,
}

/// Package outline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageShape {
    #[default]
    Rect,
    Circle,
}

/// Immutable footprint template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footprint {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub pins: Vec<PinTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    #[serde(default)]
    pub shape: PackageShape,
}

impl Footprint {
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn pin(&self, pin_id: &str) -> Option<&PinTemplate> {
        self.pins.iter().find(|p| p.id == pin_id)
    }
}

/// How a junction treats the tangents of the two traces meeting at it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuityMode {
    /// Sibling handle becomes the exact negation of the edited one
    #[default]
    Smooth,
    /// Mirrors like `Smooth`; kept as a separate label for project files
    Linear,
    /// No propagation
    Independent,
}

/// What a placed component is: a library part or a synthetic junction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComponentKind {
    Part {
        #[serde(rename = "footprintId")]
        footprint_id: String,
    },
    Junction {
        #[serde(default)]
        continuity: ContinuityMode,
    },
}

/// Placed component instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ComponentKind,
    /// Board-global top-left of the unrotated bounding box
    pub position: Vector2,
    /// Degrees; normalized before use
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub locked: bool,
}

impl Component {
    pub fn part(id: impl Into<String>, footprint_id: impl Into<String>, position: Vector2) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: ComponentKind::Part {
                footprint_id: footprint_id.into(),
            },
            position,
            rotation: 0.0,
            value: None,
            locked: false,
        }
    }

    pub fn junction(id: impl Into<String>, position: Vector2) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: ComponentKind::Junction {
                continuity: ContinuityMode::default(),
            },
            position,
            rotation: 0.0,
            value: None,
            locked: false,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn is_junction(&self) -> bool {
        matches!(self.kind, ComponentKind::Junction { .. })
    }

    /// Continuity mode if this is a junction
    pub fn continuity(&self) -> Option<ContinuityMode> {
        match self.kind {
            ComponentKind::Junction { continuity } => Some(continuity),
            ComponentKind::Part { .. } => None,
        }
    }

    /// Rotation folded into [0, 360)
    pub fn normalized_rotation(&self) -> f64 {
        normalize_rotation(self.rotation)
    }
}

/// Fold any angle in degrees into [0, 360)
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Global pin identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRef {
    pub component_id: String,
    pub pin_id: String,
}

impl PinRef {
    pub fn new(component_id: impl Into<String>, pin_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            pin_id: pin_id.into(),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component_id, self.pin_id)
    }
}

/// Which end of a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceEnd {
    From,
    To,
}

/// Routed connection between two pins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub id: String,
    pub from: PinRef,
    pub to: PinRef,
    pub width: f64,
    pub color: String,
    /// First control point, relative to the `from` pin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c1_offset: Option<Vector2>,
    /// Second control point, relative to the `to` pin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c2_offset: Option<Vector2>,
}

pub const DEFAULT_TRACE_WIDTH: f64 = 8.0;
pub const DEFAULT_TRACE_COLOR: &str = "#FCD34D";

impl Trace {
    pub fn new(id: impl Into<String>, from: PinRef, to: PinRef) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            width: DEFAULT_TRACE_WIDTH,
            color: DEFAULT_TRACE_COLOR.to_string(),
            c1_offset: None,
            c2_offset: None,
        }
    }

    pub fn pin(&self, end: TraceEnd) -> &PinRef {
        match end {
            TraceEnd::From => &self.from,
            TraceEnd::To => &self.to,
        }
    }

    pub fn offset(&self, end: TraceEnd) -> Option<Vector2> {
        match end {
            TraceEnd::From => self.c1_offset,
            TraceEnd::To => self.c2_offset,
        }
    }

    pub fn set_offset(&mut self, end: TraceEnd, offset: Option<Vector2>) {
        match end {
            TraceEnd::From => self.c1_offset = offset,
            TraceEnd::To => self.c2_offset = offset,
        }
    }

    /// The end attached to `pin`, preferring `From` for self-loops
    pub fn end_at(&self, pin: &PinRef) -> Option<TraceEnd> {
        if &self.from == pin {
            Some(TraceEnd::From)
        } else if &self.to == pin {
            Some(TraceEnd::To)
        } else {
            None
        }
    }

    pub fn touches(&self, pin: &PinRef) -> bool {
        &self.from == pin || &self.to == pin
    }

    /// True if the two traces have any endpoint pin in common
    pub fn shares_endpoint(&self, other: &Trace) -> bool {
        self.from == other.from
            || self.from == other.to
            || self.to == other.from
            || self.to == other.to
    }

    pub fn touches_component(&self, component_id: &str) -> bool {
        self.from.component_id == component_id || self.to.component_id == component_id
    }
}
