//! Footprint library
//!
//! Holds the static part templates and generates parametric `dip_<N>` and
//! `header_<N>` footprints on lookup. The junction footprint is a system
//! template and is not listed with the user parts.

use super::types::{Footprint, PackageShape, PinTemplate, PinType, ValueKind, Vector2};
use indexmap::IndexMap;
use std::sync::OnceLock;

pub const JUNCTION_FOOTPRINT_ID: &str = "JUNCTION";
pub const JUNCTION_PIN_ID: &str = "p1";

/// Largest pin count accepted for generated `dip_<N>` / `header_<N>` parts
pub const MAX_GENERATED_PINS: usize = 64;

/// Standard 0.1 inch pitch
const PITCH: f64 = 25.4;
const PADDING: f64 = 25.4;

/// Footprint templates keyed by id, in insertion order
///
/// Generated parts are built on first lookup and kept, one slot per pin
/// count.
#[derive(Debug, Clone)]
pub struct FootprintLibrary {
    footprints: IndexMap<String, Footprint>,
    junction: Footprint,
    dips: Vec<OnceLock<Footprint>>,
    headers: Vec<OnceLock<Footprint>>,
}

impl FootprintLibrary {
    /// Empty library that still resolves the junction and generated parts
    pub fn new() -> Self {
        Self {
            footprints: IndexMap::new(),
            junction: junction_footprint(),
            dips: (0..MAX_GENERATED_PINS).map(|_| OnceLock::new()).collect(),
            headers: (0..MAX_GENERATED_PINS).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Library preloaded with the standard parts
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        for footprint in builtin_footprints() {
            lib.insert(footprint);
        }
        lib
    }

    pub fn insert(&mut self, footprint: Footprint) {
        self.footprints.insert(footprint.id.clone(), footprint);
    }

    /// Look up a footprint, generating DIP and header parts from their id
    pub fn get(&self, id: &str) -> Option<&Footprint> {
        if let Some(f) = self.footprints.get(id) {
            return Some(f);
        }
        if id == JUNCTION_FOOTPRINT_ID {
            return Some(&self.junction);
        }
        if let Some(count) = id.strip_prefix("dip_").and_then(parse_pin_count) {
            return Some(self.dips[count - 1].get_or_init(|| dip_footprint(count)));
        }
        if let Some(count) = id.strip_prefix("header_").and_then(parse_pin_count) {
            return Some(self.headers[count - 1].get_or_init(|| header_footprint(count)));
        }
        None
    }

    pub fn junction(&self) -> &Footprint {
        &self.junction
    }

    /// User-visible footprints (excludes the junction)
    pub fn iter(&self) -> impl Iterator<Item = &Footprint> {
        self.footprints.values()
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }
}

impl Default for FootprintLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_pin_count(s: &str) -> Option<usize> {
    s.parse::<usize>()
        .ok()
        .filter(|&n| n > 0 && n <= MAX_GENERATED_PINS)
}

fn pin(id: &str, name: &str, x: f64, y: f64, pin_type: PinType) -> PinTemplate {
    PinTemplate {
        id: id.to_string(),
        name: name.to_string(),
        local_pos: Vector2::new(x, y),
        pin_type,
        decoration: None,
    }
}

/// Single-pin splice point, pin at the center
pub fn junction_footprint() -> Footprint {
    Footprint {
        id: JUNCTION_FOOTPRINT_ID.to_string(),
        name: "Junction".to_string(),
        width: 25.4,
        height: 25.4,
        pins: vec![pin(JUNCTION_PIN_ID, "J", 12.7, 12.7, PinType::Io)],
        value_kind: None,
        shape: PackageShape::Circle,
    }
}

/// Dual in-line package, pins numbered counter-clockwise from top-left
pub fn dip_footprint(pin_count: usize) -> Footprint {
    let row_spacing = if pin_count >= 24 { 152.4 } else { 76.2 };
    let pins_per_row = pin_count.div_ceil(2);
    let width = row_spacing + PADDING * 2.0;
    let height = (pins_per_row.saturating_sub(1)) as f64 * PITCH + PADDING * 2.0;

    let mut pins = Vec::with_capacity(pin_count);
    for i in 0..pins_per_row {
        let n = (i + 1).to_string();
        pins.push(pin(&format!("p{}", n), &n, PADDING, PADDING + i as f64 * PITCH, PinType::Io));
    }
    for i in 0..pins_per_row {
        let index = pins_per_row + i;
        if index >= pin_count {
            break;
        }
        let n = (index + 1).to_string();
        let y = PADDING + (pins_per_row - 1 - i) as f64 * PITCH;
        pins.push(pin(&format!("p{}", n), &n, PADDING + row_spacing, y, PinType::Io));
    }

    Footprint {
        id: format!("dip_{}", pin_count),
        name: format!("DIP-{} IC", pin_count),
        width,
        height,
        pins,
        value_kind: None,
        shape: PackageShape::Rect,
    }
}

/// Single-row pin header
pub fn header_footprint(pin_count: usize) -> Footprint {
    let pins = (0..pin_count)
        .map(|i| {
            let n = (i + 1).to_string();
            pin(&format!("p{}", n), &n, PADDING, PADDING + i as f64 * PITCH, PinType::Io)
        })
        .collect();

    Footprint {
        id: format!("header_{}", pin_count),
        name: format!("{}-Pin Header", pin_count),
        width: PADDING * 2.0,
        height: (pin_count.saturating_sub(1)) as f64 * PITCH + PADDING * 2.0,
        pins,
        value_kind: None,
        shape: PackageShape::Rect,
    }
}

fn two_pin(
    id: &str,
    name: &str,
    size: (f64, f64),
    pins: [(&str, &str, f64, f64); 2],
    value_kind: Option<ValueKind>,
    shape: PackageShape,
) -> Footprint {
    Footprint {
        id: id.to_string(),
        name: name.to_string(),
        width: size.0,
        height: size.1,
        pins: pins
            .iter()
            .map(|(pid, pname, x, y)| pin(pid, pname, *x, *y, PinType::Io))
            .collect(),
        value_kind,
        shape,
    }
}

fn arduino_nano() -> Footprint {
    const LEFT: [(&str, PinType); 15] = [
        ("D13", PinType::Io),
        ("3V3", PinType::Power),
        ("REF", PinType::Io),
        ("A0", PinType::Io),
        ("A1", PinType::Io),
        ("A2", PinType::Io),
        ("A3", PinType::Io),
        ("A4", PinType::Io),
        ("A5", PinType::Io),
        ("A6", PinType::Io),
        ("A7", PinType::Io),
        ("5V", PinType::Power),
        ("RST", PinType::Io),
        ("GND", PinType::Ground),
        ("VIN", PinType::Power),
    ];
    const RIGHT: [(&str, PinType); 15] = [
        ("TX", PinType::Io),
        ("RX", PinType::Io),
        ("RST", PinType::Io),
        ("GND", PinType::Ground),
        ("D2", PinType::Io),
        ("D3", PinType::Io),
        ("D4", PinType::Io),
        ("D5", PinType::Io),
        ("D6", PinType::Io),
        ("D7", PinType::Io),
        ("D8", PinType::Io),
        ("D9", PinType::Io),
        ("D10", PinType::Io),
        ("D11", PinType::Io),
        ("D12", PinType::Io),
    ];

    let mut pins = Vec::with_capacity(30);
    for (column, (x, names)) in [(25.4, &LEFT), (177.8, &RIGHT)].into_iter().enumerate() {
        for (i, (name, pin_type)) in names.iter().enumerate() {
            let id = format!("p{}", column * 15 + i + 1);
            pins.push(pin(&id, name, x, PITCH * (i + 1) as f64, *pin_type));
        }
    }

    Footprint {
        id: "arduino_nano".to_string(),
        name: "Arduino Nano".to_string(),
        width: 203.2,
        height: 431.8,
        pins,
        value_kind: None,
        shape: PackageShape::Rect,
    }
}

/// Standard user-placeable parts
pub fn builtin_footprints() -> Vec<Footprint> {
    vec![
        arduino_nano(),
        two_pin(
            "resistor",
            "Resistor (0.4\")",
            (152.4, 50.8),
            [("1", "1", 25.4, 25.4), ("2", "2", 127.0, 25.4)],
            Some(ValueKind::Resistance),
            PackageShape::Rect,
        ),
        two_pin(
            "capacitor",
            "Electrolytic Cap",
            (50.8, 50.8),
            [("1", "+", 12.7, 25.4), ("2", "-", 38.1, 25.4)],
            Some(ValueKind::Capacitance),
            PackageShape::Circle,
        ),
        two_pin(
            "led",
            "LED 5mm",
            (50.8, 50.8),
            [("A", "A", 12.7, 25.4), ("K", "K", 38.1, 25.4)],
            None,
            PackageShape::Circle,
        ),
        two_pin(
            "diode",
            "Diode (0.3\")",
            (101.6, 38.1),
            [("A", "A", 25.4, 19.05), ("K", "K", 76.2, 19.05)],
            None,
            PackageShape::Rect,
        ),
        two_pin(
            "inductor",
            "Power Inductor",
            (76.2, 76.2),
            [("1", "1", 12.7, 38.1), ("2", "2", 63.5, 38.1)],
            Some(ValueKind::Inductance),
            PackageShape::Rect,
        ),
        Footprint {
            id: "transistor".to_string(),
            name: "TO-92 Transistor".to_string(),
            width: 76.2,
            height: 50.8,
            pins: vec![
                pin("1", "1", 12.7, 25.4, PinType::Io),
                pin("2", "2", 38.1, 25.4, PinType::Io),
                pin("3", "3", 63.5, 25.4, PinType::Io),
            ],
            value_kind: None,
            shape: PackageShape::Rect,
        },
        Footprint {
            id: "pin".to_string(),
            name: "Pin (Single Pad)".to_string(),
            width: 25.4,
            height: 25.4,
            pins: vec![pin("p1", "Pin", 12.7, 12.7, PinType::Io)],
            value_kind: None,
            shape: PackageShape::Rect,
        },
    ]
}
