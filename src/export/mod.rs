//! Board exporters
//!
//! Both exporters read path shape exclusively through the curve model.

mod gcode;
mod svg;

pub use gcode::{gcode_to_string, write_gcode, GcodeOptions};
pub use svg::{svg_to_string, write_svg, ExportBounds, SVG_DEFAULT_EXTENT, SVG_PADDING};

use crate::draw::geometry::Board;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a G-code program to disk
pub fn gcode_to_file<P: AsRef<Path>>(board: &Board, options: &GcodeOptions, path: P) -> Result<()> {
    let file = File::create(&path).context("Failed to create G-code file")?;
    let mut writer = BufWriter::new(file);
    write_gcode(board, options, &mut writer).context("Failed to write G-code")?;
    writer.flush().context("Failed to flush G-code writer")?;
    Ok(())
}

/// Write an SVG document to disk; fails if the board has nothing to draw
pub fn svg_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if ExportBounds::of(board).is_none() {
        anyhow::bail!("Board is empty, nothing to export");
    }
    let file = File::create(&path).context("Failed to create SVG file")?;
    let mut writer = BufWriter::new(file);
    write_svg(board, &mut writer).context("Failed to write SVG")?;
    writer.flush().context("Failed to flush SVG writer")?;
    Ok(())
}
