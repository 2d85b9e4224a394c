//! Static SVG export
//!
//! One `<path>` per trace from the curve model's path descriptor, and a
//! silkscreen outline, name tag and pin rings per part. Junctions are not
//! drawn.

use crate::draw::curve::path_descriptor;
use crate::draw::geometry::{Board, PinType, Vector2};
use std::io::{self, Write};

pub const SVG_PADDING: f64 = 100.0;
/// Extent used along an axis that has no spread (e.g. a single pad)
pub const SVG_DEFAULT_EXTENT: f64 = 500.0;

const BACKGROUND: &str = "#050C07";
const SILKSCREEN: &str = "#10b981";
const LABEL: &str = "#888";
const PIN_FILL: &str = "#18181b";

fn pin_color(pin_type: PinType) -> &'static str {
    match pin_type {
        PinType::Power => "#ef4444",
        PinType::Ground => "#3b82f6",
        PinType::Io => "#FCD34D",
    }
}

/// Board-space rectangle covered by parts and trace endpoints
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportBounds {
    pub min: Vector2,
    pub max: Vector2,
}

impl ExportBounds {
    fn include(bounds: &mut Option<ExportBounds>, p: Vector2) {
        match bounds {
            Some(b) => {
                b.min = Vector2::new(b.min.x.min(p.x), b.min.y.min(p.y));
                b.max = Vector2::new(b.max.x.max(p.x), b.max.y.max(p.y));
            }
            None => *bounds = Some(ExportBounds { min: p, max: p }),
        }
    }

    pub fn of(board: &Board) -> Option<ExportBounds> {
        let mut bounds = None;
        for component in board.components().iter().filter(|c| !c.is_junction()) {
            let Some(footprint) = board.footprint_for(component) else {
                continue;
            };
            Self::include(&mut bounds, component.position);
            Self::include(
                &mut bounds,
                component.position + Vector2::new(footprint.width, footprint.height),
            );
        }
        for trace in board.traces() {
            if let Some((start, end)) = board.trace_endpoints(trace) {
                Self::include(&mut bounds, start);
                Self::include(&mut bounds, end);
            }
        }
        bounds
    }

    /// Padded `(x, y, width, height)` view box
    pub fn view_box(&self) -> (f64, f64, f64, f64) {
        let extent = |span: f64| if span > 0.0 { span } else { SVG_DEFAULT_EXTENT };
        (
            self.min.x - SVG_PADDING,
            self.min.y - SVG_PADDING,
            extent(self.max.x - self.min.x) + SVG_PADDING * 2.0,
            extent(self.max.y - self.min.y) + SVG_PADDING * 2.0,
        )
    }
}

/// Write the board as a standalone SVG document
///
/// Returns `Ok(false)` without writing anything if the board has nothing
/// drawable.
pub fn write_svg<W: Write>(board: &Board, writer: &mut W) -> io::Result<bool> {
    let Some(bounds) = ExportBounds::of(board) else {
        return Ok(false);
    };
    let (x, y, width, height) = bounds.view_box();

    write!(
        writer,
        r#"<svg width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
        x = x,
        y = y,
        w = width,
        h = height
    )?;
    write!(
        writer,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
        x, y, width, height, BACKGROUND
    )?;
    writeln!(writer)?;

    for trace in board.traces() {
        let Some((start, end)) = board.trace_endpoints(trace) else {
            continue;
        };
        let d = path_descriptor(start, end, Some(trace)).to_svg_path();
        write!(writer, r#"<path d="{}" stroke=""#, d)?;
        write_escaped_attr(writer, &trace.color)?;
        writeln!(
            writer,
            r#"" stroke-width="{}" fill="none" stroke-linecap="round" />"#,
            trace.width
        )?;
    }

    for component in board.components().iter().filter(|c| !c.is_junction()) {
        let Some(footprint) = board.footprint_for(component) else {
            continue;
        };
        let (w, h) = (footprint.width, footprint.height);
        write!(
            writer,
            r#"<g transform="translate({}, {}) rotate({}, {}, {})">"#,
            component.position.x,
            component.position.y,
            component.normalized_rotation(),
            w / 2.0,
            h / 2.0
        )?;
        write!(
            writer,
            r#"<rect width="{}" height="{}" fill="none" stroke="{}" stroke-width="2" rx="4" />"#,
            w, h, SILKSCREEN
        )?;
        write!(
            writer,
            r#"<text x="{}" y="-10" text-anchor="middle" fill="{}" font-family="monospace" font-size="12">"#,
            w / 2.0,
            LABEL
        )?;
        write_escaped_text(writer, &component.name)?;
        write!(writer, "</text></g><g>")?;
        for pin in board.pins_of(component) {
            write!(
                writer,
                r#"<circle cx="{}" cy="{}" r="8" fill="{}" stroke="{}" stroke-width="1.5" />"#,
                pin.position.x,
                pin.position.y,
                PIN_FILL,
                pin_color(pin.pin_type)
            )?;
        }
        writeln!(writer, "</g>")?;
    }

    write!(writer, "</svg>")?;
    Ok(true)
}

/// SVG document as a string, `None` for an empty board
pub fn svg_to_string(board: &Board) -> Option<String> {
    let mut buffer = Vec::with_capacity(4096);
    match write_svg(board, &mut buffer) {
        Ok(true) => Some(String::from_utf8_lossy(&buffer).into_owned()),
        _ => None,
    }
}

/// Escapes special XML characters in attribute values
fn write_escaped_attr<W: Write>(writer: &mut W, input: &str) -> io::Result<()> {
    write_escaped(writer, input, true)
}

fn write_escaped_text<W: Write>(writer: &mut W, input: &str) -> io::Result<()> {
    write_escaped(writer, input, false)
}

fn write_escaped<W: Write>(writer: &mut W, input: &str, quotes: bool) -> io::Result<()> {
    let mut last = 0;
    for (idx, ch) in input.char_indices() {
        let entity = match ch {
            '&' => Some(b"&amp;" as &[u8]),
            '<' => Some(b"&lt;" as &[u8]),
            '>' => Some(b"&gt;" as &[u8]),
            '"' if quotes => Some(b"&quot;" as &[u8]),
            '\'' if quotes => Some(b"&apos;" as &[u8]),
            _ => None,
        };

        if let Some(bytes) = entity {
            if last < idx {
                writer.write_all(input[last..idx].as_bytes())?;
            }
            writer.write_all(bytes)?;
            last = idx + ch.len_utf8();
        }
    }

    if last < input.len() {
        writer.write_all(input[last..].as_bytes())?;
    }
    Ok(())
}
