//! GRBL G-code export
//!
//! Drills every physical pad, then mills each trace as a polyline through
//! the curve model. Junctions are splice points, not holes, so they are
//! never drilled.

use crate::draw::curve::point_at;
use crate::draw::geometry::Board;
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub struct GcodeOptions {
    /// Travel height
    pub z_safe: f64,
    /// Cut depth
    pub z_cut: f64,
    pub feed_rate: f64,
    pub spindle_speed: u32,
    /// Line segments per trace curve
    pub steps: usize,
}

impl Default for GcodeOptions {
    fn default() -> Self {
        Self {
            z_safe: 2.0,
            z_cut: -0.1,
            feed_rate: 200.0,
            spindle_speed: 1000,
            steps: 15,
        }
    }
}

impl GcodeOptions {
    pub fn with_steps(steps: usize) -> Self {
        Self {
            steps: steps.max(1),
            ..Self::default()
        }
    }
}

pub fn write_gcode<W: Write>(board: &Board, options: &GcodeOptions, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "(CircuitFlow GRBL Export)")?;
    writeln!(writer, "G21 (Units: Metric)")?;
    writeln!(writer, "G90 (Absolute Positioning)")?;
    writeln!(writer, "G0 Z5 (Lift Tool)")?;
    writeln!(writer, "M3 S{} (Spindle On)", options.spindle_speed)?;
    writeln!(writer, "G4 P1 (Wait 1s)")?;
    writeln!(writer)?;

    writeln!(writer, "(Drilling Pads)")?;
    let mut holes = 0usize;
    for component in board.components().iter().filter(|c| !c.is_junction()) {
        for pin in board.pins_of(component) {
            writeln!(writer, "G0 X{:.3} Y{:.3}", pin.position.x, pin.position.y)?;
            writeln!(writer, "G1 Z{} F{}", options.z_cut, options.feed_rate)?;
            writeln!(writer, "G0 Z{}", options.z_safe)?;
            holes += 1;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "(Milling Traces)")?;
    let steps = options.steps.max(1);
    let mut milled = 0usize;
    for trace in board.traces() {
        let Some((start, end)) = board.trace_endpoints(trace) else {
            tracing::debug!("[Export] Trace '{}' dangles, not milled", trace.id);
            continue;
        };

        writeln!(writer, "(Trace {})", trace.id)?;
        writeln!(writer, "G0 X{:.3} Y{:.3}", start.x, start.y)?;
        writeln!(writer, "G1 Z{} F{}", options.z_cut, options.feed_rate)?;
        for i in 1..=steps {
            let p = point_at(i as f64 / steps as f64, start, end, Some(trace));
            writeln!(writer, "G1 X{:.3} Y{:.3}", p.x, p.y)?;
        }
        writeln!(writer, "G0 Z{}", options.z_safe)?;
        milled += 1;
    }

    writeln!(writer)?;
    writeln!(writer, "M5 (Spindle Off)")?;
    writeln!(writer, "G0 X0 Y0 (Return Home)")?;
    write!(writer, "M30 (End Program)")?;

    tracing::info!("[Export] G-code: {} holes, {} traces milled", holes, milled);
    Ok(())
}

pub fn gcode_to_string(board: &Board, options: &GcodeOptions) -> String {
    let mut buffer = Vec::with_capacity(4096);
    // Writing into a Vec cannot fail
    let _ = write_gcode(board, options, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::{Component, FootprintLibrary, PinRef, Trace, Vector2};
    use std::sync::Arc;

    fn board() -> Board {
        Board::new(
            Arc::new(FootprintLibrary::builtin()),
            vec![
                Component::part("R1", "resistor", Vector2::new(0.0, 0.0)),
                Component::junction("J1", Vector2::new(300.0, 0.0)),
            ],
            vec![Trace::new("t1", PinRef::new("R1", "2"), PinRef::new("J1", "p1"))],
        )
    }

    #[test]
    fn test_junctions_are_not_drilled() {
        let out = gcode_to_string(&board(), &GcodeOptions::default());
        let drill_section = out.split("(Milling Traces)").next().unwrap();
        assert_eq!(drill_section.matches("G1 Z-0.1 F200").count(), 2);
        assert!(drill_section.contains("G0 X25.400 Y25.400"));
        assert!(!drill_section.contains("X312.700"));
    }

    #[test]
    fn test_trace_is_milled_to_its_end() {
        let out = gcode_to_string(&board(), &GcodeOptions::with_steps(4));
        let milling = out.split("(Trace t1)").nth(1).unwrap();
        let cuts: Vec<&str> = milling.lines().filter(|l| l.starts_with("G1 X")).collect();
        assert_eq!(cuts.len(), 4);
        assert_eq!(cuts[3], "G1 X312.700 Y12.700");
        assert!(out.ends_with("M30 (End Program)"));
    }
}
